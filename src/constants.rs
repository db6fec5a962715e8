//! Constants used throughout the application
//!
//! This module centralizes magic strings and default values to improve
//! maintainability and consistency.

/// Date format for task dates and deadlines (YYYY-MM-DD)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format for created_at columns and reminders.
/// Fixed-width UTC so that lexicographic order equals chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Actor recorded on audit entries when none is configured
pub const DEFAULT_AUDIT_ACTOR: &str = "system@taskdeck.local";

/// Capacity of the change-notification broadcast channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// How far ahead the Upcoming view looks, in days
pub const UPCOMING_WINDOW_DAYS: i64 = 90;

/// Header comment written at the top of generated config files
pub const CONFIG_GENERATED: &str =
    "# taskdeck configuration file\n# Generated automatically - edit as needed\n\n";
