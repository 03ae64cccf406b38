//! # Pawdiary
//!
//! Pet-care diary core - logs a dog's daily care events and derives the
//! views a diary app shows from them.
//!
//! ## Features
//!
//! - **Record log**: Append-only, newest first, strictly increasing ids
//! - **Walk tracking**: Two-fix walk sessions with haversine distance
//! - **Calendar**: Month grid with per-type filtering and day markers
//! - **Weight chart**: Chronological weight series
//! - **Profile**: Vaccinations, places, food types and social links
//!
//! ## Modules
//!
//! - [`storage`]: Record types and the record store
//! - [`index`]: Calendar and weight views derived from the store
//! - [`walk`]: Geo distance, location provider seam and walk tracker
//! - [`profile`]: The pet profile aggregate
//! - [`diary`]: Root context tying everything together
//! - [`config`]: TOML configuration and logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pawdiary::{Config, Diary, NewRecord, Profile, ToiletKind, Condition};
//! use pawdiary::walk::NoLocation;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let diary = Diary::new(Config::default(), Profile::new("ポチ"), Arc::new(NoLocation));
//!
//!     diary.log(NewRecord::toilet(ToiletKind::Pee, Some(Condition::Good))).await?;
//!     diary.log(NewRecord::weight(5.2)).await?;
//!
//!     for record in diary.records_for_day(diary.today()).await {
//!         println!("{}", record.summary());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod diary;
pub mod index;
pub mod profile;
pub mod storage;
pub mod walk;

// Re-export top-level types for convenience
pub use storage::{
    Condition, NewRecord, Payload, Record, RecordId, RecordStore, RecordType, StoreConfig,
    StoreError, StoreResult, ToiletKind,
};

pub use index::{
    weight_series, CalendarIndex, CalendarMonth, TypeFilter, WeightPoint, WeightSeries,
    YearMonth,
};

pub use walk::{distance_km, Fix, Location, LocationProvider, WalkError, WalkTracker};

pub use profile::{Profile, ProfileError};

pub use diary::{Diary, DiaryError, DiaryResult, ErrorKind, WalkStatus};

pub use config::{Config, ConfigError, DiaryConfig, LoggingConfig, WalkConfig};
