// ABOUTME: Capability traits consumed from the cloud control plane.
// ABOUTME: ContainerService, LoadBalancer, LogStore, Clock, plus shared types.

mod clock;
mod container_service;
mod error;
mod load_balancer;
mod log_store;
mod types;

pub use clock::{Clock, TokioClock};
pub use container_service::{ContainerService, ContainerServiceError};
pub use error::{CloudError, CloudErrorKind};
pub use load_balancer::{LoadBalancer, LoadBalancerError};
pub use log_store::{LogStore, LogStoreError};
pub use types::*;
