//! Daily checklist core: the cycle state machine and its persistence
//! contract.
//!
//! An ordered collection of recurring items is confirmed once per day
//! (optionally with a photo) and atomically reset when the local calendar
//! date changes, while a coordinator keeps the external reminder and
//! background wake-up aligned with the configured daily time.  UI,
//! notification delivery, and background execution live outside this
//! crate behind the seam traits in [`photos`] and [`schedule`].

pub mod checklist;
pub mod error;
pub mod keys;
pub mod maintenance;
pub mod marker;
pub mod photos;
pub mod reset;
pub mod schedule;
pub mod schema;
pub mod settings;

pub use checklist::ChecklistRepository;
pub use error::{CoreError, Result};
pub use maintenance::clear_all_data;
pub use marker::ResetMarkerStore;
pub use photos::{FsPhotoStore, PhotoLibrary, PhotoStore};
pub use reset::DailyResetEngine;
pub use schedule::{
    BackgroundTaskRegistrar, DAILY_RESET_TASK, NotificationScheduler, ReminderContent,
    ScheduleCoordinator, next_occurrence,
};
pub use schema::{AppSettings, ChecklistItem, DailyReset, DailyTime, NotificationSettings};
pub use settings::{NotificationsPatch, SettingsPatch, SettingsRepository};
