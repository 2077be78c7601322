//! Logical keys under which the app's records are persisted.

/// The full checklist item collection, stored as one JSON array.
pub const CHECKLIST_ITEMS: &str = "checklist_items";

/// The daily reset marker: `{ "lastResetDate": "YYYY-MM-DD" }`.
pub const DAILY_RESET: &str = "daily_reset";

/// The single app settings record.
pub const SETTINGS: &str = "settings";
