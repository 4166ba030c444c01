// ABOUTME: Container image reference parsing and tag rewriting.
// ABOUTME: Handles formats like nginx, nginx:tag, registry:port/image:tag@digest.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("invalid character in image reference: {0}")]
    InvalidChar(char),
}

/// A parsed container image reference.
///
/// Deploys rewrite the tag while keeping the repository, so the parts are
/// kept separate rather than re-parsed on every rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    registry: Option<String>,
    name: String,
    tag: Option<String>,
    digest: Option<String>,
}

fn valid_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '-' | '_' | '@')
}

/// The first path component is a registry host if it contains a dot or a
/// port, or is "localhost". Otherwise the whole input is the repository name
/// (e.g. "library/nginx").
fn split_registry(input: &str) -> (Option<String>, String) {
    match input.split_once('/') {
        Some((host, rest))
            if host.contains('.') || host.contains(':') || host == "localhost" =>
        {
            (Some(host.to_string()), rest.to_string())
        }
        _ => (None, input.to_string()),
    }
}

impl ImageRef {
    pub fn parse(input: &str) -> Result<Self, ParseImageRefError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseImageRefError::Empty);
        }
        if let Some(c) = input.chars().find(|&c| !valid_char(c)) {
            return Err(ParseImageRefError::InvalidChar(c));
        }

        let (rest, digest) = match input.split_once('@') {
            Some((rest, digest)) => (rest, Some(digest.to_string())),
            None => (input, None),
        };

        // The last colon separates the tag unless it belongs to a registry
        // port (in which case a slash follows it).
        let (rest, mut tag) = match rest.rsplit_once(':') {
            Some((before, after)) if !after.contains('/') => (before, Some(after.to_string())),
            _ => (rest, None),
        };

        if tag.is_none() && digest.is_none() {
            tag = Some("latest".to_string());
        }

        let (registry, name) = split_registry(rest);

        Ok(Self {
            registry,
            name,
            tag,
            digest,
        })
    }

    /// Same repository, different tag. Drops any digest since a digest pins
    /// the old content.
    pub fn with_tag(&self, tag: &str) -> Self {
        Self {
            registry: self.registry.clone(),
            name: self.name.clone(),
            tag: Some(tag.to_string()),
            digest: None,
        }
    }

    pub fn registry(&self) -> Option<&str> {
        self.registry.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(registry) = &self.registry {
            write!(f, "{registry}/")?;
        }
        write!(f, "{}", self.name)?;
        if let Some(tag) = &self.tag {
            write!(f, ":{tag}")?;
        }
        if let Some(digest) = &self.digest {
            write!(f, "@{digest}")?;
        }
        Ok(())
    }
}
