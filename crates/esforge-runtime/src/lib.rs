//! esforge runtime: runs generator families concurrently over one schema and
//! writes their manifests.

pub mod manifest;
pub mod orchestrator;
pub mod types;

pub use manifest::{digest, Manifest};
pub use orchestrator::Orchestrator;
pub use types::*;
