// ABOUTME: Validated unit name for deployable units.
// ABOUTME: Ensures names follow RFC 1123 label requirements.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UnitNameError {
    #[error("unit name cannot be empty")]
    Empty,

    #[error("unit name exceeds maximum length of 63 characters")]
    TooLong,

    #[error("unit name cannot start with a hyphen")]
    StartsWithHyphen,

    #[error("unit name cannot end with a hyphen")]
    EndsWithHyphen,

    #[error("unit name must be lowercase")]
    NotLowercase,

    #[error("invalid character in unit name: '{0}'")]
    InvalidChar(char),
}

/// Name of an independently deployable unit (app or infra stack).
///
/// Unit names double as the name of the primary container inside the unit's
/// task definition, so they must be valid DNS labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitName(String);

impl UnitName {
    pub fn new(value: &str) -> Result<Self, UnitNameError> {
        if value.is_empty() {
            return Err(UnitNameError::Empty);
        }

        if value.len() > 63 {
            return Err(UnitNameError::TooLong);
        }

        if value.starts_with('-') {
            return Err(UnitNameError::StartsWithHyphen);
        }

        if value.ends_with('-') {
            return Err(UnitNameError::EndsWithHyphen);
        }

        for c in value.chars() {
            if c.is_ascii_uppercase() {
                return Err(UnitNameError::NotLowercase);
            }
            if !c.is_ascii_lowercase() && !c.is_ascii_digit() && c != '-' {
                return Err(UnitNameError::InvalidChar(c));
            }
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UnitName {
    type Err = UnitNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for UnitName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for UnitName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::new(&value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_names() {
        assert!(UnitName::new("api").is_ok());
        assert!(UnitName::new("billing-worker").is_ok());
        assert!(UnitName::new("svc2").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(UnitName::new(""), Err(UnitNameError::Empty)));
    }

    #[test]
    fn rejects_uppercase() {
        assert!(matches!(
            UnitName::new("Api"),
            Err(UnitNameError::NotLowercase)
        ));
    }

    #[test]
    fn rejects_leading_and_trailing_hyphens() {
        assert!(matches!(
            UnitName::new("-api"),
            Err(UnitNameError::StartsWithHyphen)
        ));
        assert!(matches!(
            UnitName::new("api-"),
            Err(UnitNameError::EndsWithHyphen)
        ));
    }

    #[test]
    fn rejects_invalid_characters() {
        assert!(matches!(
            UnitName::new("api_v2"),
            Err(UnitNameError::InvalidChar('_'))
        ));
    }

    #[test]
    fn rejects_too_long() {
        let name = "a".repeat(64);
        assert!(matches!(UnitName::new(&name), Err(UnitNameError::TooLong)));
    }
}
