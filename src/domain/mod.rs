//! Domain layer for Style Guardian
//!
//! Domain Model - Pure values for style enforcement
//! - Contains the violation, report and error types shared by every layer
//! - Independent of file systems, terminals and configuration formats

pub mod violations;

// Re-export main domain types for convenience
pub use violations::*;
