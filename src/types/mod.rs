// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent ARN confusion at compile time.

mod arn;
mod image_ref;
mod revision;
mod unit_name;

pub use arn::{ServiceArn, TargetGroupArn, TaskArn, TaskDefinitionArn};
pub use image_ref::{ImageRef, ParseImageRefError};
pub use revision::{RevisionSelector, RevisionSelectorError};
pub use unit_name::{UnitName, UnitNameError};
