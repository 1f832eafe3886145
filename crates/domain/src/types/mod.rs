//! Domain data types
//!
//! One transcript flows through the pipeline per session iteration and is
//! consumed exactly once; every other type here is the structured form it
//! takes on the way to the calendar provider.

pub mod action;
pub mod moment;
pub mod transcript;

pub use action::{Action, EventDraft};
pub use moment::ParsedMoment;
pub use transcript::Transcript;
