//! The persisted `lastResetDate` marker gating reset idempotence.

use std::sync::Arc;

use chrono::NaiveDate;
use lastcheck_store::{KeyValueStore, get_json, put_json};
use tracing::warn;

use crate::error::Result;
use crate::keys;
use crate::schema::DailyReset;

#[derive(Clone)]
pub struct ResetMarkerStore {
    store: Arc<dyn KeyValueStore>,
}

impl ResetMarkerStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The most recent local calendar date a reset ran, or `None` before
    /// the first reset.  An unreadable marker also reads as `None`: a
    /// broken marker must trigger a reset, not wedge the decision.
    pub async fn last_reset_date(&self) -> Option<NaiveDate> {
        match get_json::<DailyReset>(self.store.as_ref(), keys::DAILY_RESET).await {
            Ok(marker) => marker.map(|m| m.last_reset_date),
            Err(err) => {
                warn!(%err, "failed to load reset marker, treating as unset");
                None
            }
        }
    }

    pub async fn set_last_reset_date(&self, date: NaiveDate) -> Result<()> {
        let marker = DailyReset {
            last_reset_date: date,
        };
        put_json(self.store.as_ref(), keys::DAILY_RESET, &marker).await?;
        Ok(())
    }
}
