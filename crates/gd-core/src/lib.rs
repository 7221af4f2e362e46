//! grad-drive/crates/gd-core/src/lib.rs
//!
//! The central domain logic and interface definitions for GradDrive.

pub mod analytics;
pub mod audit;
pub mod error;
pub mod models;
pub mod traits;

#[cfg(test)]
mod test_support;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;
