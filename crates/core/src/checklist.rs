//! Checklist item repository: CRUD, ordering, and the check/uncheck
//! state transition over the whole persisted collection.

use std::sync::Arc;

use lastcheck_store::{KeyValueStore, get_json, put_json};
use tracing::{debug, info, warn};

use crate::error::{CoreError, Result};
use crate::keys;
use crate::schema::ChecklistItem;

/// Owns the persisted `checklist_items` collection.
///
/// Every mutation is a read-entire-collection → transform →
/// write-entire-collection cycle.  Two concurrent mutations race at the
/// granularity of the whole collection and the last writer wins; the app
/// is single-user and the UI serializes actions, so no locking is layered
/// on top.  Callers that need stronger guarantees must add their own
/// serialization.
#[derive(Clone)]
pub struct ChecklistRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ChecklistRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All items, unsorted.  Callers sort by `order` for display.
    ///
    /// A failed or corrupt read degrades to an empty collection: the list
    /// screen stays available even when the store is broken.
    pub async fn list(&self) -> Vec<ChecklistItem> {
        match get_json::<Vec<ChecklistItem>>(self.store.as_ref(), keys::CHECKLIST_ITEMS).await {
            Ok(Some(items)) => items,
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%err, "failed to load checklist items, returning empty list");
                Vec::new()
            }
        }
    }

    /// Strict load for mutation paths.  Unlike [`list`](Self::list) a
    /// failed read is an error here: degrading to an empty collection
    /// inside a mutation would rewrite the store with the items missing.
    async fn load(&self) -> Result<Vec<ChecklistItem>> {
        let items = get_json::<Vec<ChecklistItem>>(self.store.as_ref(), keys::CHECKLIST_ITEMS)
            .await?
            .unwrap_or_default();
        Ok(items)
    }

    async fn save(&self, items: &[ChecklistItem]) -> Result<()> {
        put_json(self.store.as_ref(), keys::CHECKLIST_ITEMS, items).await?;
        Ok(())
    }

    /// Append a new item at the end of the list.
    pub async fn create(&self, name: &str, requires_photo: bool) -> Result<ChecklistItem> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidInput(
                "item name must not be empty".to_string(),
            ));
        }

        let mut items = self.load().await?;
        let item = ChecklistItem::new(name, items.len() as u32, requires_photo);
        items.push(item.clone());
        self.save(&items).await?;

        info!(id = %item.id, name = %item.name, "created checklist item");
        Ok(item)
    }

    /// Remove an item and renumber the survivors to 0..N-1, preserving
    /// their relative order.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut items = self.load().await?;
        let position = items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| CoreError::NotFound(id.to_string()))?;
        items.remove(position);
        renumber(&mut items);
        self.save(&items).await?;

        info!(%id, remaining = items.len(), "deleted checklist item");
        Ok(())
    }

    /// Mark an item confirmed for today, optionally attaching a photo
    /// reference.  The only operation that flips `is_checked` to true.
    pub async fn check(&self, id: &str, photo_uri: Option<String>) -> Result<()> {
        let mut items = self.load().await?;
        let item = find_mut(&mut items, id)?;
        item.mark_checked(photo_uri);
        self.save(&items).await?;

        debug!(%id, "checked item");
        Ok(())
    }

    /// Revert an item to unconfirmed, clearing its check timestamp and
    /// photo reference.  The photo file itself is reclaimed by the next
    /// daily purge.
    pub async fn uncheck(&self, id: &str) -> Result<()> {
        let mut items = self.load().await?;
        let item = find_mut(&mut items, id)?;
        item.clear_check();
        self.save(&items).await?;

        debug!(%id, "unchecked item");
        Ok(())
    }

    pub async fn set_photo_requirement(&self, id: &str, requires_photo: bool) -> Result<()> {
        let mut items = self.load().await?;
        let item = find_mut(&mut items, id)?;
        item.requires_photo = requires_photo;
        self.save(&items).await?;
        Ok(())
    }

    /// Rearrange the collection to match `ids` and renumber to 0..N-1.
    /// The sequence must contain exactly the stored ids, each once.
    pub async fn reorder(&self, ids: &[String]) -> Result<()> {
        let mut items = self.load().await?;
        if ids.len() != items.len() {
            return Err(CoreError::InvalidInput(format!(
                "reorder sequence has {} ids but the collection has {} items",
                ids.len(),
                items.len()
            )));
        }

        let mut reordered = Vec::with_capacity(ids.len());
        for id in ids {
            let position = items.iter().position(|item| item.id == *id).ok_or_else(|| {
                CoreError::InvalidInput(format!(
                    "unknown or duplicate item id '{id}' in reorder sequence"
                ))
            })?;
            reordered.push(items.remove(position));
        }
        renumber(&mut reordered);
        self.save(&reordered).await
    }

    /// Rewrite every item unconfirmed, preserving id, name, order, photo
    /// requirement, and creation time.  Called by the daily reset engine.
    pub async fn reset_all_checks(&self) -> Result<()> {
        let mut items = self.load().await?;
        for item in &mut items {
            item.clear_check();
        }
        self.save(&items).await?;

        info!(count = items.len(), "cleared check state on all items");
        Ok(())
    }
}

fn renumber(items: &mut [ChecklistItem]) {
    for (index, item) in items.iter_mut().enumerate() {
        item.order = index as u32;
    }
}

fn find_mut<'a>(items: &'a mut [ChecklistItem], id: &str) -> Result<&'a mut ChecklistItem> {
    items
        .iter_mut()
        .find(|item| item.id == id)
        .ok_or_else(|| CoreError::NotFound(id.to_string()))
}
