// ABOUTME: Deployment request describing one unit's rolling update.
// ABOUTME: Unit, cluster, image, timeout, and the unsafe-mode flag.

use std::time::Duration;

use crate::types::{ImageRef, UnitName};

/// Default time to wait for a new revision to converge.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// How the unit's container image should change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSpec {
    /// Keep the repository, swap the tag.
    Tag(String),
    /// Replace the image reference wholesale.
    Explicit(ImageRef),
}

/// Everything needed to roll one unit to a new revision.
#[derive(Debug, Clone)]
pub struct DeployRequest {
    /// Unit being deployed. Also names the service and its primary container.
    pub unit: UnitName,
    /// Cluster the service runs in.
    pub cluster: String,
    /// Desired image change. `None` for redeploys of existing revisions.
    pub image: Option<ImageSpec>,
    /// How long to wait for convergence before rolling back.
    pub timeout: Duration,
    /// Lower target-group health-check thresholds during the rollout.
    /// Faster convergence feedback, less health-check confidence.
    pub unsafe_mode: bool,
}

impl DeployRequest {
    pub fn new(unit: UnitName, cluster: impl Into<String>) -> Self {
        Self {
            unit,
            cluster: cluster.into(),
            image: None,
            timeout: DEFAULT_TIMEOUT,
            unsafe_mode: false,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.image = Some(ImageSpec::Tag(tag.into()));
        self
    }

    pub fn with_image(mut self, image: ImageRef) -> Self {
        self.image = Some(ImageSpec::Explicit(image));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn unsafe_mode(mut self, enabled: bool) -> Self {
        self.unsafe_mode = enabled;
        self
    }
}
