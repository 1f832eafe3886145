//! # VoiceCal Domain
//!
//! Business domain types and models for VoiceCal.
//!
//! This crate contains:
//! - Domain data types (Transcript, ParsedMoment, Action, etc.)
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants and the date/time extractor
//!
//! ## Architecture
//! - No dependencies on other VoiceCal crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
// Re-export the date/time extractor
pub use utils::datetime_parser::extract_moment;
