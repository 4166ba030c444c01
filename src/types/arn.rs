// ABOUTME: Phantom-typed resource identifiers for compile-time type safety.
// ABOUTME: Prevents accidental swapping of service, task definition, and target group ARNs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Marker types for phantom type parameters.
/// Using empty enums prevents instantiation and requires no trait bounds.
pub enum ServiceMarker {}
pub enum TaskDefinitionMarker {}
pub enum TargetGroupMarker {}
pub enum TaskMarker {}

/// A type-safe resource identifier that prevents accidental mixing.
///
/// Using phantom types, this ensures you can't pass a `TargetGroupArn`
/// where a `TaskDefinitionArn` is expected, catching bugs at compile time.
#[must_use = "ARNs reference live resources and should not be ignored"]
pub struct Arn<T> {
    value: String,
    _marker: PhantomData<T>,
}

impl<T> Arn<T> {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            _marker: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_inner(self) -> String {
        self.value
    }
}

// Manual trait implementations that don't require T to implement the trait.
// This is necessary because T is only used as a phantom type marker.

impl<T> std::fmt::Debug for Arn<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arn").field("value", &self.value).finish()
    }
}

impl<T> Clone for Arn<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Arn<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Arn<T> {}

impl<T> Hash for Arn<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> std::fmt::Display for Arn<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for Arn<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Arn<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(value))
    }
}

pub type ServiceArn = Arn<ServiceMarker>;
pub type TaskDefinitionArn = Arn<TaskDefinitionMarker>;
pub type TargetGroupArn = Arn<TargetGroupMarker>;
pub type TaskArn = Arn<TaskMarker>;
