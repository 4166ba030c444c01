// ABOUTME: Library root for convoy - exposes public types for embedding and testing.
// ABOUTME: The CLI binary is in main.rs.

pub mod cloud;
pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod graph;
pub mod output;
pub mod types;
