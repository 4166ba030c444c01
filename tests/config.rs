// ABOUTME: Integration tests for configuration file discovery.
// ABOUTME: convoy.yml and convoy.yaml lookup against real directories.

use convoy::config::Config;
use convoy::error::Error;
use tempfile::TempDir;

const MINIMAL: &str = "cluster: prod\nunits:\n  api: {}\n";

#[test]
fn discovers_convoy_yml() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("convoy.yml"), MINIMAL).unwrap();

    let config = Config::discover(dir.path()).unwrap();
    assert_eq!(config.cluster, "prod");
    assert_eq!(config.units.len(), 1);
}

#[test]
fn falls_back_to_convoy_yaml() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("convoy.yaml"), MINIMAL).unwrap();

    assert!(Config::discover(dir.path()).is_ok());
}

#[test]
fn yml_wins_over_yaml() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("convoy.yml"), MINIMAL).unwrap();
    std::fs::write(
        dir.path().join("convoy.yaml"),
        "cluster: other\nunits:\n  api: {}\n",
    )
    .unwrap();

    let config = Config::discover(dir.path()).unwrap();
    assert_eq!(config.cluster, "prod");
}

#[test]
fn missing_config_reports_the_directory() {
    let dir = TempDir::new().unwrap();
    let err = Config::discover(dir.path()).unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound(path) if path == dir.path()));
}

#[test]
fn malformed_yaml_surfaces_a_parse_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("convoy.yml"), "cluster: [unclosed").unwrap();

    assert!(matches!(
        Config::discover(dir.path()).unwrap_err(),
        Error::Yaml(_)
    ));
}
