//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

/// Timezone attached to event start/end when the parsed moment is ambiguous.
pub const DEFAULT_TIMEZONE: &str = "Asia/Kolkata";

/// Default number of events returned by a list query.
pub const DEFAULT_MAX_RESULTS: u32 = 10;

/// Default event length when the command names only a start time.
pub const DEFAULT_EVENT_DURATION_MINUTES: i64 = 60;

/// Case-insensitive sentinel that ends the interactive session.
pub const EXIT_SENTINEL: &str = "exit";

/// Calendar the assistant reads and writes.
pub const PRIMARY_CALENDAR_ID: &str = "primary";
