//! Structured actions derived from a generated reply

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_EVENT_DURATION_MINUTES;
use crate::types::moment::ParsedMoment;

/// Event fields assembled by the interpreter for a create action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDraft {
    pub summary: String,
    pub start: ParsedMoment,
    pub end: ParsedMoment,
    pub description: Option<String>,
}

impl EventDraft {
    /// Draft spanning the default duration from `start`.
    pub fn with_default_duration(summary: impl Into<String>, start: ParsedMoment) -> Self {
        Self {
            summary: summary.into(),
            start,
            end: start.plus_minutes(DEFAULT_EVENT_DURATION_MINUTES),
            description: None,
        }
    }
}

/// The structured intent extracted from one generated reply.
///
/// Consumed exactly once by the calendar gateway; every variant resolves to
/// exactly one user-facing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Create(EventDraft),
    Fetch { max_results: u32 },
    Unrecognized,
}
