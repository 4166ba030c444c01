// ABOUTME: Revision selector for redeploying known task definition revisions.
// ABOUTME: Parses "latest", "current", or an explicit revision number.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RevisionSelectorError {
    #[error("unknown revision selector: {0} (expected \"latest\", \"current\", or a revision number)")]
    Unknown(String),
}

/// Which registered revision a redeploy should target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionSelector {
    /// The highest revision registered in the family.
    Latest,
    /// The revision the service is currently running.
    Current,
    /// An explicit revision number.
    Revision(u64),
}

impl RevisionSelector {
    pub fn parse(input: &str) -> Result<Self, RevisionSelectorError> {
        match input.trim() {
            "latest" => Ok(Self::Latest),
            "current" => Ok(Self::Current),
            other => other
                .parse::<u64>()
                .map(Self::Revision)
                .map_err(|_| RevisionSelectorError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for RevisionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Current => write!(f, "current"),
            Self::Revision(n) => write!(f, "{n}"),
        }
    }
}

impl std::str::FromStr for RevisionSelector {
    type Err = RevisionSelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
