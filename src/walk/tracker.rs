//! Walk tracker state machine
//!
//! One walk at a time. A walk starts from a location fix, finishes from a
//! second fix, and only then materializes as a record. The tracker never
//! talks to storage: `finish` hands back a [`NewRecord`] and the caller
//! appends it.
//!
//! Location requests are asynchronous, so the tracker also remembers that a
//! request is outstanding (`begin_start` / `begin_finish`). A second request
//! before the first resolves is rejected instead of queued.

use super::location::Fix;
use super::{Location, WalkError};
use crate::storage::NewRecord;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Where and when the current walk began
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkStart {
    pub location: Location,
    pub started_at: NaiveDateTime,
}

/// Tracker state
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum WalkState {
    #[default]
    Idle,
    Tracking(WalkStart),
}

/// Which transition an outstanding location request will feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingFix {
    Start,
    Finish,
}

#[derive(Debug, Default)]
pub struct WalkTracker {
    state: WalkState,
    pending: Option<PendingFix>,
}

impl WalkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &WalkState {
        &self.state
    }

    pub fn is_tracking(&self) -> bool {
        matches!(self.state, WalkState::Tracking(_))
    }

    /// The walk in progress, if any
    pub fn current(&self) -> Option<&WalkStart> {
        match &self.state {
            WalkState::Tracking(start) => Some(start),
            WalkState::Idle => None,
        }
    }

    pub fn pending(&self) -> Option<PendingFix> {
        self.pending
    }

    /// Reserve the tracker for a start-of-walk location request
    pub fn begin_start(&mut self) -> Result<(), WalkError> {
        if self.pending.is_some() {
            return Err(WalkError::RequestPending);
        }
        if self.is_tracking() {
            return Err(WalkError::AlreadyTracking);
        }
        self.pending = Some(PendingFix::Start);
        Ok(())
    }

    /// Reserve the tracker for an end-of-walk location request
    pub fn begin_finish(&mut self) -> Result<(), WalkError> {
        if self.pending.is_some() {
            return Err(WalkError::RequestPending);
        }
        if !self.is_tracking() {
            return Err(WalkError::NotTracking);
        }
        self.pending = Some(PendingFix::Finish);
        Ok(())
    }

    /// Drop an outstanding request after the location lookup failed.
    /// The walk state itself is left untouched.
    pub fn abandon(&mut self) {
        if let Some(kind) = self.pending.take() {
            tracing::debug!(?kind, "Abandoned pending location request");
        }
    }

    /// `Idle → Tracking`
    pub fn start(&mut self, fix: Fix) -> Result<WalkStart, WalkError> {
        if self.is_tracking() {
            return Err(WalkError::AlreadyTracking);
        }

        let start = WalkStart {
            location: fix.location,
            started_at: fix.at,
        };
        self.state = WalkState::Tracking(start);
        self.pending = None;

        tracing::info!(location = %fix.location, at = %fix.at, "Walk started");
        Ok(start)
    }

    /// `Tracking → Idle`, producing the walk record draft
    pub fn finish(&mut self, fix: Fix) -> Result<NewRecord, WalkError> {
        let start = match self.state {
            WalkState::Tracking(start) => start,
            WalkState::Idle => return Err(WalkError::NotTracking),
        };

        let duration = walk_minutes(start.started_at, fix.at);
        let distance = start.location.distance_to(&fix.location);

        let memo = format!("開始: {}\n終了: {}", start.location, fix.location);
        let record = NewRecord::walk(start.location, fix.location, duration, distance)
            .at(fix.at)
            .memo(memo);

        self.state = WalkState::Idle;
        self.pending = None;

        tracing::info!(duration, distance_km = distance, "Walk finished");
        Ok(record)
    }
}

/// Whole minutes between two instants, rounded, never negative.
///
/// Device clocks are not guaranteed monotonic, so an end time before the
/// start clamps to zero.
pub(crate) fn walk_minutes(start: NaiveDateTime, end: NaiveDateTime) -> u32 {
    let millis = (end - start).num_milliseconds();
    if millis <= 0 {
        return 0;
    }
    (millis as f64 / 60_000.0).round() as u32
}
