//! # VoiceCal API
//!
//! Binary crate wiring: explicit context construction and the interactive
//! session loop driving one command through the pipeline per iteration.

pub mod context;
pub mod session;

pub use context::AppContext;
