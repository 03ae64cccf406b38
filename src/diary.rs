//! Diary - the root context
//!
//! Owns the record store, the pet profile, the walk tracker, the calendar
//! filter and the location provider. Every mutation of the object graph
//! goes through here.
//!
//! ```text
//! start_walk:  tracker.begin_start ─▶ (unlock) provider.await ─▶ tracker.start
//! finish_walk: tracker.begin_finish ─▶ (unlock) provider.await ─▶ tracker.finish ─▶ store.append
//! ```
//!
//! Locks are never held across the provider await. A second walk call made
//! while a location request is outstanding sees the pending marker and is
//! rejected. If a walk call is dropped mid-request the marker is cleared,
//! so the tracker is never left waiting on a fix that will not arrive.

use crate::config::Config;
use crate::index::{weight_series, CalendarIndex, CalendarMonth, WeightSeries, YearMonth};
use crate::profile::{NewPlace, NewVaccination, PlaceId, Profile, ProfileError, VaccinationId};
use crate::storage::{
    Clock, NewRecord, Record, RecordStore, RecordType, StoreError, SystemClock,
};
use crate::walk::{
    Fix, LocationProvider, PendingFix, WalkError, WalkStart, WalkState, WalkTracker,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::RwLock;

/// Errors surfaced to the collaborator
#[derive(Debug, Error)]
pub enum DiaryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Walk(#[from] WalkError),

    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Coarse classification of a [`DiaryError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    LocationUnavailable,
    InvalidState,
    ParseFailure,
    Invalid,
}

impl DiaryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DiaryError::Walk(WalkError::LocationUnavailable(_)) => ErrorKind::LocationUnavailable,
            DiaryError::Walk(_) => ErrorKind::InvalidState,
            DiaryError::Store(StoreError::ParseFailure(_)) => ErrorKind::ParseFailure,
            DiaryError::Store(_) | DiaryError::Profile(_) => ErrorKind::Invalid,
        }
    }
}

pub type DiaryResult<T> = std::result::Result<T, DiaryError>;

/// Snapshot of the walk tracker for the walk screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkStatus {
    pub state: WalkState,
    pub pending: Option<PendingFix>,
}

impl WalkStatus {
    pub fn is_tracking(&self) -> bool {
        matches!(self.state, WalkState::Tracking(_))
    }
}

fn lock_tracker(tracker: &Mutex<WalkTracker>) -> MutexGuard<'_, WalkTracker> {
    tracker.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An outstanding location request on the walk tracker.
///
/// Dropping it unresolved (the walk call was cancelled) clears the
/// tracker's pending marker.
struct PendingRequest<'a> {
    tracker: &'a Mutex<WalkTracker>,
    armed: bool,
}

impl<'a> PendingRequest<'a> {
    fn begin(
        tracker: &'a Mutex<WalkTracker>,
        begin: impl FnOnce(&mut WalkTracker) -> Result<(), WalkError>,
    ) -> Result<Self, WalkError> {
        begin(&mut lock_tracker(tracker))?;
        Ok(Self {
            tracker,
            armed: true,
        })
    }

    /// Hand the request to `resolve`, which must settle the pending marker
    fn resolve<T>(mut self, resolve: impl FnOnce(&mut WalkTracker) -> T) -> T {
        let mut tracker = lock_tracker(self.tracker);
        self.armed = false;
        resolve(&mut tracker)
    }
}

impl Drop for PendingRequest<'_> {
    fn drop(&mut self) {
        if self.armed {
            lock_tracker(self.tracker).abandon();
            tracing::warn!("Walk request cancelled before a location fix arrived");
        }
    }
}

/// The pet-care diary
pub struct Diary {
    store: RwLock<RecordStore>,
    profile: RwLock<Profile>,
    tracker: Mutex<WalkTracker>,
    calendar: RwLock<CalendarIndex>,
    location: Arc<dyn LocationProvider>,
    clock: Arc<dyn Clock>,
    config: Config,
}

impl std::fmt::Debug for Diary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diary")
            .field("location", &self.location.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Diary {
    pub fn new(config: Config, profile: Profile, location: Arc<dyn LocationProvider>) -> Self {
        Self::with_clock(config, profile, location, Arc::new(SystemClock))
    }

    pub fn with_clock(
        config: Config,
        profile: Profile,
        location: Arc<dyn LocationProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let store = RecordStore::with_clock(config.diary.store_config(), clock.clone());
        let calendar = CalendarIndex::new(config.diary.max_markers);

        tracing::info!(
            provider = location.name(),
            pet = %profile.name,
            "Diary opened"
        );

        Self {
            store: RwLock::new(store),
            profile: RwLock::new(profile),
            tracker: Mutex::new(WalkTracker::new()),
            calendar: RwLock::new(calendar),
            location,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Today according to the diary clock
    pub fn today(&self) -> NaiveDate {
        self.clock.now().date()
    }

    // ========================================================================
    // Records
    // ========================================================================

    /// Append a record from an entry form
    pub async fn log(&self, draft: NewRecord) -> DiaryResult<Record> {
        let mut store = self.store.write().await;
        let record = store.append(draft)?;
        Ok(record.clone())
    }

    /// Append a batch of drafts, skipping the ones that fail
    pub async fn import(
        &self,
        drafts: impl Into<crate::storage::DraftBatch>,
    ) -> crate::storage::ImportResult {
        let mut store = self.store.write().await;
        crate::storage::import_drafts(&mut store, drafts)
    }

    /// All records, newest first
    pub async fn records(&self) -> Vec<Record> {
        let store = self.store.read().await;
        store.iter().cloned().collect()
    }

    /// The home screen's recent list
    pub async fn recent(&self) -> Vec<Record> {
        self.recent_n(self.config.diary.recent_count).await
    }

    pub async fn recent_n(&self, n: usize) -> Vec<Record> {
        let store = self.store.read().await;
        store.iter().take(n).cloned().collect()
    }

    pub async fn records_of(&self, record_type: RecordType) -> Vec<Record> {
        let store = self.store.read().await;
        store.by_type(record_type).into_iter().cloned().collect()
    }

    /// Walk history (tracked walks only)
    pub async fn walks(&self) -> Vec<Record> {
        let store = self.store.read().await;
        store.walks_with_route().into_iter().cloned().collect()
    }

    // ========================================================================
    // Views
    // ========================================================================

    pub async fn records_for_day(&self, date: NaiveDate) -> Vec<Record> {
        let store = self.store.read().await;
        let calendar = self.calendar.read().await;
        calendar
            .records_for_day(&store, date)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn calendar_month(&self, month: YearMonth) -> CalendarMonth {
        let store = self.store.read().await;
        let calendar = self.calendar.read().await;
        calendar.month(&store, month, self.today())
    }

    /// Flip a record type in the calendar filter; returns the new state
    pub async fn toggle_type(&self, record_type: RecordType) -> bool {
        self.calendar.write().await.toggle_type(record_type)
    }

    pub async fn enabled_types(&self) -> Vec<RecordType> {
        self.calendar.read().await.enabled_types()
    }

    pub async fn weight_series(&self) -> WeightSeries {
        let store = self.store.read().await;
        weight_series(&store)
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(&self.config.diary.date_format).to_string()
    }

    pub fn format_timestamp(&self, timestamp: NaiveDateTime) -> String {
        timestamp
            .format(&self.config.diary.timestamp_format)
            .to_string()
    }

    /// Walking-directions link for a tracked walk
    pub fn walk_map_url(&self, record: &Record) -> Option<String> {
        record
            .walk_route()
            .map(|route| route.map_url(&self.config.walk.map_url))
    }

    // ========================================================================
    // Walks
    // ========================================================================

    pub async fn walk_status(&self) -> WalkStatus {
        let tracker = lock_tracker(&self.tracker);
        WalkStatus {
            state: *tracker.state(),
            pending: tracker.pending(),
        }
    }

    /// One-shot position lookup, independent of the tracker
    pub async fn current_location(&self) -> DiaryResult<Fix> {
        self.location.current_fix().await.map_err(|e| {
            tracing::warn!(provider = self.location.name(), "Location lookup failed: {}", e);
            DiaryError::Walk(WalkError::LocationUnavailable(e))
        })
    }

    /// `Idle → Tracking` from the current position
    pub async fn start_walk(&self) -> DiaryResult<WalkStart> {
        let request = PendingRequest::begin(&self.tracker, WalkTracker::begin_start)?;

        let fix = self.location.current_fix().await;

        let start = request.resolve(|tracker| match fix {
            Ok(fix) => tracker.start(fix),
            Err(e) => {
                tracker.abandon();
                tracing::warn!("Walk not started: {}", e);
                Err(WalkError::LocationUnavailable(e))
            }
        })?;
        Ok(start)
    }

    /// `Tracking → Idle` at the current position; appends the walk record
    pub async fn finish_walk(&self) -> DiaryResult<Record> {
        let request = PendingRequest::begin(&self.tracker, WalkTracker::begin_finish)?;

        let fix = self.location.current_fix().await;

        let draft = request.resolve(|tracker| match fix {
            Ok(fix) => tracker.finish(fix),
            Err(e) => {
                tracker.abandon();
                tracing::warn!("Walk still in progress, finish failed: {}", e);
                Err(WalkError::LocationUnavailable(e))
            }
        })?;

        self.log(draft).await
    }

    // ========================================================================
    // Profile
    // ========================================================================

    pub async fn profile(&self) -> Profile {
        self.profile.read().await.clone()
    }

    /// Edit the profile. The edit is applied to a copy and only committed
    /// if the result still validates.
    pub async fn update_profile<F>(&self, edit: F) -> DiaryResult<Profile>
    where
        F: FnOnce(&mut Profile),
    {
        let mut profile = self.profile.write().await;
        let mut updated = profile.clone();
        edit(&mut updated);
        updated.validate()?;

        *profile = updated;
        tracing::info!(pet = %profile.name, "Profile updated");
        Ok(profile.clone())
    }

    pub async fn add_vaccination(&self, draft: NewVaccination) -> VaccinationId {
        let now = self.clock.now();
        self.profile.write().await.add_vaccination(draft, now)
    }

    pub async fn delete_vaccination(&self, id: VaccinationId) -> bool {
        self.profile.write().await.delete_vaccination(id)
    }

    pub async fn add_place(&self, draft: NewPlace) -> DiaryResult<PlaceId> {
        let now = self.clock.now();
        Ok(self.profile.write().await.add_place(draft, now)?)
    }

    pub async fn delete_place(&self, id: PlaceId) -> bool {
        self.profile.write().await.delete_place(id)
    }
}
