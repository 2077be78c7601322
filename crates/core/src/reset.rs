//! The daily reset engine.
//!
//! Each calendar day is either not-yet-reset or reset, decided by
//! comparing the device's local calendar date against the persisted
//! marker.  The configured daily time plays no part here: it only governs
//! the external reminder and background wake-up (see
//! [`schedule`](crate::schedule)).  A user who opens the app at 23:59 and
//! again at 00:01 gets a reset even with the daily time set to 04:00.

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::checklist::ChecklistRepository;
use crate::error::Result;
use crate::marker::ResetMarkerStore;
use crate::photos::PhotoLibrary;

#[derive(Clone)]
pub struct DailyResetEngine {
    items: ChecklistRepository,
    marker: ResetMarkerStore,
    photos: PhotoLibrary,
}

impl DailyResetEngine {
    pub fn new(items: ChecklistRepository, marker: ResetMarkerStore, photos: PhotoLibrary) -> Self {
        Self {
            items,
            marker,
            photos,
        }
    }

    /// Run on app startup and whenever the list screen becomes visible.
    /// Resets once per local calendar day; returns whether a reset ran.
    pub async fn check_and_reset_if_needed(&self) -> Result<bool> {
        self.check_and_reset_on(Local::now().date_naive()).await
    }

    /// Date-parameterized variant of
    /// [`check_and_reset_if_needed`](Self::check_and_reset_if_needed) for
    /// callers that already know "today".
    pub async fn check_and_reset_on(&self, today: NaiveDate) -> Result<bool> {
        let last = self.marker.last_reset_date().await;
        if last == Some(today) {
            debug!(%today, "already reset today");
            return Ok(false);
        }

        info!(%today, ?last, "calendar day changed, resetting checklist");
        self.reset_daily_checks_on(today).await?;
        Ok(true)
    }

    /// Unconditionally perform the reset for the current local date.
    pub async fn reset_daily_checks(&self) -> Result<()> {
        self.reset_daily_checks_on(Local::now().date_naive()).await
    }

    /// The reset itself, strictly ordered:
    ///
    /// 1. purge the photo directory (every file, regardless of item
    ///    state; per-file failures never abort);
    /// 2. rewrite every item unconfirmed;
    /// 3. advance the marker to `today`.
    ///
    /// A crash between (1) and (2) leaves photos deleted but items still
    /// marked checked with dangling photo refs — an accepted window.  The
    /// reverse order would instead leave unchecked items while old photos
    /// keep consuming storage.
    pub async fn reset_daily_checks_on(&self, today: NaiveDate) -> Result<()> {
        let purged = self.photos.purge_all().await;
        self.items.reset_all_checks().await?;
        self.marker.set_last_reset_date(today).await?;

        info!(%today, purged, "daily reset complete");
        Ok(())
    }

    /// Body for the OS background task: runs the reset and reports
    /// success to the scheduler protocol instead of propagating errors.
    pub async fn run_scheduled_reset(&self) -> bool {
        match self.reset_daily_checks().await {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "scheduled daily reset failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photos::{FsPhotoStore, PhotoStore};
    use lastcheck_store::MemoryStore;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        store: Arc<MemoryStore>,
        items: ChecklistRepository,
        marker: ResetMarkerStore,
        photos: PhotoLibrary,
        engine: DailyResetEngine,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let items = ChecklistRepository::new(store.clone());
        let marker = ResetMarkerStore::new(store.clone());
        let photos = PhotoLibrary::new(
            Arc::new(FsPhotoStore),
            dir.path().join("photos").to_string_lossy().into_owned(),
        );
        let engine = DailyResetEngine::new(items.clone(), marker.clone(), photos.clone());
        Fixture {
            _dir: dir,
            store,
            items,
            marker,
            photos,
            engine,
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    async fn seed_photo(fixture: &Fixture, name: &str) -> String {
        let store = FsPhotoStore;
        store.create_dir(fixture.photos.dir()).await.unwrap();
        let path = format!("{}/{name}", fixture.photos.dir());
        tokio::fs::write(&path, b"jpeg").await.unwrap();
        path
    }

    #[tokio::test]
    async fn first_run_with_no_marker_resets() {
        let fixture = fixture();
        fixture.items.create("stove", false).await.unwrap();

        let reset = fixture
            .engine
            .check_and_reset_on(date("2024-01-01"))
            .await
            .unwrap();

        assert!(reset);
        assert_eq!(
            fixture.marker.last_reset_date().await,
            Some(date("2024-01-01"))
        );
    }

    #[tokio::test]
    async fn same_day_reset_is_idempotent() {
        let fixture = fixture();
        let item = fixture.items.create("stove", false).await.unwrap();

        let today = date("2024-01-01");
        assert!(fixture.engine.check_and_reset_on(today).await.unwrap());

        // Check an item after the reset; a second same-day call must not
        // touch it.
        fixture.items.check(&item.id, None).await.unwrap();
        assert!(!fixture.engine.check_and_reset_on(today).await.unwrap());

        let items = fixture.items.list().await;
        assert!(items[0].is_checked);
    }

    #[tokio::test]
    async fn crossing_midnight_triggers_reset() {
        let fixture = fixture();
        let item = fixture.items.create("iron", false).await.unwrap();

        assert!(
            fixture
                .engine
                .check_and_reset_on(date("2024-01-01"))
                .await
                .unwrap()
        );
        fixture
            .items
            .check(&item.id, Some("file://x.jpg".to_string()))
            .await
            .unwrap();

        let reset = fixture
            .engine
            .check_and_reset_on(date("2024-01-02"))
            .await
            .unwrap();

        assert!(reset);
        let items = fixture.items.list().await;
        assert!(!items[0].is_checked);
        assert!(items[0].checked_at.is_none());
        assert!(items[0].photo_uri.is_none());
        assert_eq!(
            fixture.marker.last_reset_date().await,
            Some(date("2024-01-02"))
        );
    }

    #[tokio::test]
    async fn reset_purges_photos_of_unchecked_items_and_strays() {
        let fixture = fixture();
        let checked = fixture.items.create("door", true).await.unwrap();
        fixture.items.create("window", false).await.unwrap();

        let attached = seed_photo(&fixture, "attached.jpg").await;
        fixture
            .items
            .check(&checked.id, Some(attached.clone()))
            .await
            .unwrap();
        // Files no item references.
        seed_photo(&fixture, "orphan.jpg").await;
        seed_photo(&fixture, "stray.tmp").await;

        fixture
            .engine
            .reset_daily_checks_on(date("2024-03-10"))
            .await
            .unwrap();

        let store = FsPhotoStore;
        assert!(
            store
                .list_files(fixture.photos.dir())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn reset_fails_when_item_rewrite_fails_and_marker_stays() {
        let fixture = fixture();
        fixture.items.create("stove", false).await.unwrap();
        fixture.store.set_unavailable(true);

        let result = fixture.engine.reset_daily_checks_on(date("2024-05-05")).await;

        assert!(result.is_err());
        fixture.store.set_unavailable(false);
        // Step (3) never ran, so the next check still resets.
        assert!(fixture.marker.last_reset_date().await.is_none());
        assert!(
            fixture
                .engine
                .check_and_reset_on(date("2024-05-05"))
                .await
                .unwrap()
        );
    }

    /// The foreground decision runs on calendar date alone; the
    /// configured daily time must have no influence on it.
    #[tokio::test]
    async fn reset_decision_ignores_configured_daily_time() {
        use crate::schema::DailyTime;
        use crate::settings::{SettingsPatch, SettingsRepository};

        let fixture = fixture();
        let settings = SettingsRepository::new(fixture.store.clone());
        fixture.items.create("stove", false).await.unwrap();

        for raw in ["00:00", "23:59"] {
            settings
                .update(SettingsPatch::daily_time(DailyTime::parse(raw).unwrap()))
                .await
                .unwrap();
            fixture
                .marker
                .set_last_reset_date(date("2024-01-01"))
                .await
                .unwrap();

            assert!(
                fixture
                    .engine
                    .check_and_reset_on(date("2024-01-02"))
                    .await
                    .unwrap()
            );
            assert!(
                !fixture
                    .engine
                    .check_and_reset_on(date("2024-01-02"))
                    .await
                    .unwrap()
            );
        }
    }

    #[tokio::test]
    async fn run_scheduled_reset_reports_outcome() {
        let fixture = fixture();
        fixture.items.create("stove", false).await.unwrap();

        assert!(fixture.engine.run_scheduled_reset().await);

        fixture.store.set_unavailable(true);
        assert!(!fixture.engine.run_scheduled_reset().await);
    }

    /// The end-to-end scenario: create A/B/C, delete B, check C with a
    /// photo, cross midnight.
    #[tokio::test]
    async fn full_daily_cycle_scenario() {
        let fixture = fixture();
        // Today's reset already happened.
        fixture
            .marker
            .set_last_reset_date(date("2024-01-01"))
            .await
            .unwrap();

        let a = fixture.items.create("A", false).await.unwrap();
        let b = fixture.items.create("B", false).await.unwrap();
        let c = fixture.items.create("C", false).await.unwrap();
        assert_eq!((a.order, b.order, c.order), (0, 1, 2));

        fixture.items.delete(&b.id).await.unwrap();
        let mut items = fixture.items.list().await;
        items.sort_by_key(|item| item.order);
        assert_eq!((items[0].name.as_str(), items[0].order), ("A", 0));
        assert_eq!((items[1].name.as_str(), items[1].order), ("C", 1));

        fixture
            .items
            .check(&c.id, Some("file://x.jpg".to_string()))
            .await
            .unwrap();
        // Same day: nothing to reset, the check survives.
        assert!(
            !fixture
                .engine
                .check_and_reset_on(date("2024-01-01"))
                .await
                .unwrap()
        );
        let mut items = fixture.items.list().await;
        items.sort_by_key(|item| item.order);
        assert!(items[1].is_checked);
        assert_eq!(items[1].photo_uri.as_deref(), Some("file://x.jpg"));

        // Midnight passes.
        assert!(
            fixture
                .engine
                .check_and_reset_on(date("2024-01-02"))
                .await
                .unwrap()
        );
        for item in fixture.items.list().await {
            assert!(!item.is_checked);
            assert!(item.checked_at.is_none());
            assert!(item.photo_uri.is_none());
        }
    }
}
