//! Full data wipe.

use lastcheck_store::KeyValueStore;
use tracing::info;

use crate::error::Result;
use crate::keys;

/// Remove every persisted record — items, reset marker, and settings —
/// returning the app to first-run state.  Settings re-materialize as
/// defaults on the next read.
pub async fn clear_all_data(store: &dyn KeyValueStore) -> Result<()> {
    for key in [keys::CHECKLIST_ITEMS, keys::DAILY_RESET, keys::SETTINGS] {
        store.remove(key).await?;
    }
    info!("cleared all persisted app data");
    Ok(())
}
