//! Application constants for utilkit
//!
//! Default values and well-known names shared across modules.

// =============================================================================
// CSV
// =============================================================================

/// Minimum buffer size used for reading and writing CSV records
pub const DEFAULT_BUFFER_SIZE: usize = 4 * 1024;

/// Label used in errors for writers without a backing file
pub const STREAM_LABEL: &str = "<stream>";

// =============================================================================
// Logging
// =============================================================================

/// Structured field carrying an error
pub const LOG_ERROR_KEY: &str = "err";

/// Structured field naming the event being timed
pub const LOG_EVENT_SOURCE_KEY: &str = "event_source";

/// Structured field carrying elapsed seconds
pub const LOG_ELAPSED_TIME_KEY: &str = "elapsed_time";

/// Structured field carrying a file path
pub const LOG_PATH_KEY: &str = "path";

/// Decimal places used when logging elapsed seconds
pub const LOG_ELAPSED_PRECISION: usize = 6;

/// Filter target for this crate's own events
pub const LOG_TARGET: &str = "utilkit";

// =============================================================================
// Signals
// =============================================================================

/// Exit status when a shutdown signal is delivered a second time (128 + SIGINT)
pub const FORCED_EXIT_CODE: i32 = 130;

// =============================================================================
// Dates
// =============================================================================

/// chrono format for YYYY-MM-DD
pub const ISO8601_DATE: &str = "%Y-%m-%d";

/// chrono format for YYYY-MM-DDTHH:MM:SSZ
pub const ISO8601_DATETIME: &str = "%Y-%m-%dT%H:%M:%SZ";
