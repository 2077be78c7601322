//! App settings repository: a single record merged over defaults.

use std::sync::Arc;

use lastcheck_store::{KeyValueStore, get_json, put_json};
use tracing::{info, warn};

use crate::error::Result;
use crate::keys;
use crate::schema::{AppSettings, DailyTime};

/// Partial settings update.  `None` fields are left as stored; the
/// `notifications` sub-object merges one level deep.
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub daily_time: Option<DailyTime>,
    pub notifications: Option<NotificationsPatch>,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationsPatch {
    pub enabled: Option<bool>,
}

impl SettingsPatch {
    pub fn daily_time(time: DailyTime) -> Self {
        Self {
            daily_time: Some(time),
            ..Self::default()
        }
    }

    pub fn notifications_enabled(enabled: bool) -> Self {
        Self {
            notifications: Some(NotificationsPatch {
                enabled: Some(enabled),
            }),
            ..Self::default()
        }
    }
}

#[derive(Clone)]
pub struct SettingsRepository {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current settings.  Missing fields in the stored record surface as
    /// their defaults (serde fills them field by field); a missing or
    /// unreadable record degrades to full defaults.
    pub async fn get(&self) -> AppSettings {
        match get_json::<AppSettings>(self.store.as_ref(), keys::SETTINGS).await {
            Ok(Some(settings)) => settings,
            Ok(None) => AppSettings::default(),
            Err(err) => {
                warn!(%err, "failed to load settings, using defaults");
                AppSettings::default()
            }
        }
    }

    /// Shallow-merge `patch` into the stored record and persist.  Returns
    /// the merged settings.
    ///
    /// Callers must follow any update that touches the daily time or the
    /// notification toggle with a schedule resync.
    pub async fn update(&self, patch: SettingsPatch) -> Result<AppSettings> {
        let mut settings = get_json::<AppSettings>(self.store.as_ref(), keys::SETTINGS)
            .await?
            .unwrap_or_default();

        if let Some(time) = patch.daily_time {
            settings.daily_time = time;
        }
        if let Some(notifications) = patch.notifications {
            if let Some(enabled) = notifications.enabled {
                settings.notifications.enabled = enabled;
            }
        }

        put_json(self.store.as_ref(), keys::SETTINGS, &settings).await?;
        info!(daily_time = %settings.daily_time, notifications = settings.notifications.enabled, "settings updated");
        Ok(settings)
    }
}
