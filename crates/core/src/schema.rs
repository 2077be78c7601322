use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One recurring thing the user verifies before leaving home.
///
/// Field names follow the persisted wire format (camelCase, ISO-8601
/// timestamps).  Optional fields are omitted when absent and tolerated
/// when missing, so records written by older schema revisions still load.
///
/// Invariants maintained by the repository:
/// - `is_checked == true` iff `checked_at` is present;
/// - `photo_uri` present implies `is_checked == true`;
/// - `order` values are exactly `{0..N-1}` across the collection at rest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    /// Opaque unique id, assigned at creation, immutable.
    pub id: String,
    pub name: String,
    /// Dense position within the collection; defines display order.
    pub order: u32,
    pub is_checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<DateTime<Utc>>,
    /// Opaque reference to a stored photo.  The core manages its
    /// lifecycle by reference and never reads the bytes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_uri: Option<String>,
    /// Whether confirmation must be accompanied by a photo.  Consulted by
    /// the external capture flow, not by the state machine itself.
    #[serde(default)]
    pub requires_photo: bool,
    pub created_at: DateTime<Utc>,
}

impl ChecklistItem {
    pub fn new(name: impl Into<String>, order: u32, requires_photo: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            order,
            is_checked: false,
            checked_at: None,
            photo_uri: None,
            requires_photo,
            created_at: Utc::now(),
        }
    }

    pub fn mark_checked(&mut self, photo_uri: Option<String>) {
        self.is_checked = true;
        self.checked_at = Some(Utc::now());
        self.photo_uri = photo_uri;
    }

    pub fn clear_check(&mut self) {
        self.is_checked = false;
        self.checked_at = None;
        self.photo_uri = None;
    }
}

/// Wall-clock time of day, serialized as `"HH:MM"` (24-hour).
///
/// Governs only the external reminder notification and background
/// wake-up.  The foreground reset decision never consults it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTime {
    hour: u8,
    minute: u8,
}

impl DailyTime {
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self { hour, minute })
    }

    /// Parse `"HH:MM"` (also accepts `"H:M"`).
    pub fn parse(s: &str) -> Option<Self> {
        let (hour, minute) = s.trim().split_once(':')?;
        Self::new(hour.parse().ok()?, minute.parse().ok()?)
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour.into(), self.minute.into(), 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for DailyTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for DailyTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DailyTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid daily time '{raw}', expected HH:MM"))
        })
    }
}

/// The single app settings record.
///
/// Every field carries a serde default so a partially-written or
/// schema-evolved record surfaces missing fields as their defaults,
/// field by field, rather than failing to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    /// When the daily reminder fires and the background wake-up is aligned.
    pub daily_time: DailyTime,
    pub notifications: NotificationSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            daily_time: DailyTime { hour: 4, minute: 0 },
            notifications: NotificationSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub enabled: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Marker record gating reset idempotence: the most recent local calendar
/// date on which a reset ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReset {
    pub last_reset_date: NaiveDate,
}
