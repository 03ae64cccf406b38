//! Derived views over the record store
//!
//! - **filter**: The enabled record-type set
//! - **calendar**: Month grid and day lookups with type filtering
//! - **weight**: Chronological weight series for charting
//!
//! Views hold no records of their own. Everything is recomputed from the
//! store on each call.

pub mod calendar;
pub mod filter;
pub mod weight;

pub use calendar::{
    days_in_month, is_leap_year, start_weekday, CalendarCell, CalendarDay, CalendarIndex,
    CalendarMonth, DayMarker, YearMonth, DEFAULT_MAX_MARKERS,
};
pub use filter::TypeFilter;
pub use weight::{weight_series, WeightPoint, WeightSeries};
