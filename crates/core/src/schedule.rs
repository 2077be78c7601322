//! Keeps the external reminder notification and background wake-up
//! aligned with the configured daily time.
//!
//! This is the only place the daily time matters.  The foreground reset
//! decision in [`reset`](crate::reset) runs on calendar-date change alone.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDateTime};
use tracing::{debug, info};

use crate::schema::DailyTime;
use crate::settings::SettingsRepository;

/// Identifier under which the daily reset wake-up is registered with the
/// OS background task collaborator.
pub const DAILY_RESET_TASK: &str = "daily-reset-task";

const BACKGROUND_MINIMUM_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// What the daily reminder shows when it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderContent {
    pub title: String,
    pub body: String,
}

impl Default for ReminderContent {
    fn default() -> Self {
        Self {
            title: "Checklist reminder".to_string(),
            body: "Time to run today's checklist".to_string(),
        }
    }
}

/// External local-notification collaborator.
#[async_trait]
pub trait NotificationScheduler: Send + Sync {
    async fn cancel_all(&self) -> Result<()>;
    async fn schedule_daily(&self, hour: u8, minute: u8, content: &ReminderContent) -> Result<()>;
}

/// External OS background-task collaborator.  The task body registered
/// under [`DAILY_RESET_TASK`] is expected to call
/// [`DailyResetEngine::run_scheduled_reset`](crate::reset::DailyResetEngine::run_scheduled_reset)
/// when the OS wakes it.
#[async_trait]
pub trait BackgroundTaskRegistrar: Send + Sync {
    async fn register(&self, task_id: &str, minimum_interval_secs: u64) -> Result<()>;
    async fn unregister(&self, task_id: &str) -> Result<()>;
}

/// The next future occurrence of `time` in local wall-clock terms: today
/// if it has not passed yet, else tomorrow.
pub fn next_occurrence(time: DailyTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date().and_time(time.to_naive_time());
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// Recomputes the external schedule from current settings.
///
/// Must run after every settings mutation touching the daily time or the
/// notification toggle, and once at every app startup.  The cancel and
/// reschedule below are two non-atomic external calls; dying between them
/// leaves nothing scheduled until the next resync, which startup
/// guarantees.
#[derive(Clone)]
pub struct ScheduleCoordinator {
    settings: SettingsRepository,
    notifications: Arc<dyn NotificationScheduler>,
    background: Arc<dyn BackgroundTaskRegistrar>,
    reminder: ReminderContent,
}

impl ScheduleCoordinator {
    pub fn new(
        settings: SettingsRepository,
        notifications: Arc<dyn NotificationScheduler>,
        background: Arc<dyn BackgroundTaskRegistrar>,
    ) -> Self {
        Self {
            settings,
            notifications,
            background,
            reminder: ReminderContent::default(),
        }
    }

    pub fn with_reminder(mut self, reminder: ReminderContent) -> Self {
        self.reminder = reminder;
        self
    }

    pub async fn resync(&self) -> Result<()> {
        let settings = self.settings.get().await;
        let time = settings.daily_time;

        // Cancel first so triggers never accumulate; scheduling is
        // replace, not add.
        self.notifications.cancel_all().await?;
        if settings.notifications.enabled {
            self.notifications
                .schedule_daily(time.hour(), time.minute(), &self.reminder)
                .await?;
            info!(time = %time, "daily reminder scheduled");
        } else {
            debug!("notifications disabled, reminders cancelled");
        }

        // The background wake-up runs regardless of the reminder toggle:
        // the reset must still happen for users who turned reminders off.
        let first_fire = next_occurrence(time, Local::now().naive_local());
        self.background
            .register(DAILY_RESET_TASK, BACKGROUND_MINIMUM_INTERVAL_SECS)
            .await?;
        debug!(%first_fire, "background reset task registered");

        Ok(())
    }
}
