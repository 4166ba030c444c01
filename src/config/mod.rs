// ABOUTME: Configuration types and parsing for convoy.yml.
// ABOUTME: Handles YAML parsing, unit kinds, and dependency declarations.

use crate::error::{Error, Result};
use crate::graph::UnknownDependency;
use crate::types::{ImageRef, UnitName};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "convoy.yml";
pub const CONFIG_FILENAME_ALT: &str = "convoy.yaml";

/// Project configuration: the cluster, the units, and how strict to be
/// about dependencies naming unknown units.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub cluster: String,

    #[serde(default)]
    pub unknown_dependencies: UnknownDependency,

    pub units: BTreeMap<UnitName, UnitConfig>,
}

/// What kind of thing a unit is. The kind is decided once at config-load
/// time; only `service` units are deployable through the container
/// orchestration path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// A containerized service behind the orchestration control plane.
    #[default]
    Service,
    /// An infrastructure stack brought up/down by an external tool.
    Stack,
}

/// One unit's declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitConfig {
    #[serde(default)]
    pub kind: UnitKind,

    #[serde(default)]
    pub depends_on: Vec<UnitName>,

    /// Default image for deploys of this unit, overridable per invocation.
    #[serde(default, deserialize_with = "deserialize_image_ref")]
    pub image: Option<ImageRef>,

    #[serde(default = "default_deploy_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Lower health-check thresholds during rollouts of this unit.
    #[serde(default, rename = "unsafe")]
    pub unsafe_mode: bool,
}

fn default_deploy_timeout() -> Duration {
    crate::deploy::DEFAULT_TIMEOUT
}

impl Config {
    /// Parse a configuration from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Find and parse `convoy.yml` (or `convoy.yaml`) in `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        for filename in [CONFIG_FILENAME, CONFIG_FILENAME_ALT] {
            let path = dir.join(filename);
            if path.is_file() {
                let text = std::fs::read_to_string(&path)?;
                return Self::from_yaml(&text);
            }
        }
        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    fn validate(&self) -> Result<()> {
        if self.cluster.trim().is_empty() {
            return Err(Error::InvalidConfig("cluster must not be empty".into()));
        }
        if self.units.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one unit must be declared".into(),
            ));
        }
        Ok(())
    }

    /// The declared dependency map the graph builder consumes.
    pub fn dependency_map(&self) -> BTreeMap<UnitName, Vec<UnitName>> {
        self.units
            .iter()
            .map(|(name, unit)| (name.clone(), unit.depends_on.clone()))
            .collect()
    }

    pub fn unit(&self, name: &UnitName) -> Option<&UnitConfig> {
        self.units.get(name)
    }
}

fn deserialize_image_ref<'de, D>(deserializer: D) -> std::result::Result<Option<ImageRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value {
        Some(text) => ImageRef::parse(&text)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
