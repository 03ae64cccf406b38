//! Calendar Index - day → records view with type filtering
//!
//! The index keeps only the enabled-type filter and the marker limit. It
//! never holds records of its own; every lookup goes back to the
//! [`RecordStore`], so a calendar can't go stale.
//!
//! # Grid layout
//! ```text
//!  Su Mo Tu We Th Fr Sa
//!   .  .  .  1  2  3  4     <- start_weekday padding cells, then days
//!   5  6  7 ...
//! ```

use crate::index::TypeFilter;
use crate::storage::{Record, RecordId, RecordStore, RecordType};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default number of markers drawn in a day cell
pub const DEFAULT_MAX_MARKERS: usize = 3;

/// A calendar month (month is 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Create a month, returning None if `month` is outside 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn first_day(&self) -> NaiveDate {
        // Month is validated on construction
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn days_in_month(&self) -> u32 {
        match self.month {
            2 => {
                if is_leap_year(self.year) {
                    29
                } else {
                    28
                }
            }
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// Weekday of the 1st, Sunday = 0
    pub fn start_weekday(&self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Every day of the month in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let first = self.first_day();
        first.iter_days().take(self.days_in_month() as usize)
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}年{}月", self.year, self.month)
    }
}

/// Proleptic Gregorian leap year
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in a month, None for an invalid month
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    YearMonth::new(year, month).map(|ym| ym.days_in_month())
}

/// Weekday of the first of the month (Sunday = 0), None for an invalid month
pub fn start_weekday(year: i32, month: u32) -> Option<u32> {
    YearMonth::new(year, month).map(|ym| ym.start_weekday())
}

/// A coloured dot drawn in a day cell
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayMarker {
    pub record_id: RecordId,
    pub record_type: RecordType,
    pub color: &'static str,
}

/// One day of the month grid
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day: u32,
    pub is_today: bool,
    /// At most `max_markers`, in store order
    pub markers: Vec<DayMarker>,
    /// All records on this day that pass the filter
    pub record_count: usize,
}

/// A grid cell: leading padding or a real day
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CalendarCell {
    Padding,
    Day(CalendarDay),
}

/// Month grid handed to the calendar renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonth {
    pub month: YearMonth,
    pub days_in_month: u32,
    pub start_weekday: u32,
    pub cells: Vec<CalendarCell>,
}

impl CalendarMonth {
    /// The day cells only, skipping padding
    pub fn days(&self) -> impl Iterator<Item = &CalendarDay> {
        self.cells.iter().filter_map(|cell| match cell {
            CalendarCell::Day(day) => Some(day),
            CalendarCell::Padding => None,
        })
    }

    pub fn leading_padding(&self) -> usize {
        self.cells
            .iter()
            .take_while(|cell| matches!(cell, CalendarCell::Padding))
            .count()
    }
}

/// Filtered calendar view over a record store
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarIndex {
    filter: TypeFilter,
    max_markers: usize,
}

impl Default for CalendarIndex {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_MARKERS)
    }
}

impl CalendarIndex {
    pub fn new(max_markers: usize) -> Self {
        Self {
            filter: TypeFilter::all(),
            max_markers,
        }
    }

    pub fn filter(&self) -> &TypeFilter {
        &self.filter
    }

    pub fn max_markers(&self) -> usize {
        self.max_markers
    }

    /// Add or remove a type from the enabled set; returns the new state
    pub fn toggle_type(&mut self, record_type: RecordType) -> bool {
        let enabled = self.filter.toggle(record_type);
        tracing::debug!(%record_type, enabled, "Calendar filter toggled");
        enabled
    }

    pub fn set_enabled(&mut self, record_type: RecordType, enabled: bool) {
        self.filter.set(record_type, enabled);
    }

    pub fn is_enabled(&self, record_type: RecordType) -> bool {
        self.filter.contains(record_type)
    }

    pub fn enabled_types(&self) -> Vec<RecordType> {
        self.filter.enabled().collect()
    }

    /// Records on `date` that pass the filter, in store order
    pub fn records_for_day<'s>(&self, store: &'s RecordStore, date: NaiveDate) -> Vec<&'s Record> {
        store.by_date_and_types(date, &self.filter)
    }

    /// Build the month grid
    pub fn month(&self, store: &RecordStore, month: YearMonth, today: NaiveDate) -> CalendarMonth {
        let start_weekday = month.start_weekday();
        let days_in_month = month.days_in_month();

        let mut cells = Vec::with_capacity(start_weekday as usize + days_in_month as usize);
        cells.extend((0..start_weekday).map(|_| CalendarCell::Padding));

        for date in month.days() {
            let records = self.records_for_day(store, date);
            let markers = records
                .iter()
                .take(self.max_markers)
                .map(|r| DayMarker {
                    record_id: r.id,
                    record_type: r.record_type(),
                    color: r.record_type().color(),
                })
                .collect();

            cells.push(CalendarCell::Day(CalendarDay {
                date,
                day: date.day(),
                is_today: date == today,
                markers,
                record_count: records.len(),
            }));
        }

        tracing::debug!(
            %month,
            days_in_month,
            start_weekday,
            "Generated calendar month"
        );

        CalendarMonth {
            month,
            days_in_month,
            start_weekday,
            cells,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Condition, ManualClock, NewRecord, StoreConfig, ToiletKind};
    use chrono::Duration;
    use std::sync::Arc;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store_at(date: NaiveDate) -> (RecordStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(date.and_hms_opt(7, 0, 0).unwrap()));
        (
            RecordStore::with_clock(StoreConfig::default(), clock.clone()),
            clock,
        )
    }

    #[test]
    fn test_month_arithmetic() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(1900, 2), Some(28));
        assert_eq!(days_in_month(2000, 2), Some(29));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 13), None);

        // 2024-05-01 was a Wednesday, 2024-09-01 a Sunday
        assert_eq!(start_weekday(2024, 5), Some(3));
        assert_eq!(start_weekday(2024, 9), Some(0));
    }

    #[test]
    fn test_thirty_day_month_starting_wednesday() {
        let april = YearMonth::new(2026, 4).unwrap();
        assert_eq!(april.days_in_month(), 30);
        assert_eq!(april.start_weekday(), 3);

        let store = RecordStore::default();
        let grid = CalendarIndex::default().month(&store, april, day(2026, 4, 15));

        assert_eq!(grid.days_in_month, 30);
        assert_eq!(grid.start_weekday, 3);
        assert_eq!(grid.leading_padding(), 3);
        assert_eq!(grid.cells.len(), 33);
        assert_eq!(grid.days().count(), 30);
        assert_eq!(grid.days().filter(|d| d.is_today).count(), 1);
    }

    #[test]
    fn test_navigation_rolls_year() {
        let dec = YearMonth::new(2024, 12).unwrap();
        assert_eq!(dec.next(), YearMonth::new(2025, 1).unwrap());
        assert_eq!(dec.next().previous(), dec);
        assert_eq!(YearMonth::of(day(2024, 3, 9)).to_string(), "2024年3月");
    }

    #[test]
    fn test_toggle_restores_day_view() {
        let today = day(2024, 5, 1);
        let (mut store, _clock) = store_at(today);
        store
            .append(NewRecord::toilet(ToiletKind::Pee, Some(Condition::Good)))
            .unwrap();
        store.append(NewRecord::food("ドライフード")).unwrap();
        store.append(NewRecord::weight(5.2)).unwrap();

        let mut index = CalendarIndex::default();
        let before: Vec<RecordId> = index.records_for_day(&store, today).iter().map(|r| r.id).collect();

        index.toggle_type(RecordType::Food);
        let during = index.records_for_day(&store, today);
        assert_eq!(during.len(), 2);
        assert!(during.iter().all(|r| r.record_type() != RecordType::Food));

        index.toggle_type(RecordType::Food);
        let after: Vec<RecordId> = index.records_for_day(&store, today).iter().map(|r| r.id).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_marker_cap_keeps_records_retrievable() {
        let today = day(2024, 5, 20);
        let (mut store, clock) = store_at(today);
        for _ in 0..5 {
            store.append(NewRecord::food("ドライフード")).unwrap();
            clock.advance(Duration::minutes(1));
        }

        let index = CalendarIndex::default();
        let grid = index.month(&store, YearMonth::of(today), today);
        let cell = grid.days().find(|d| d.date == today).unwrap();

        assert_eq!(cell.markers.len(), 3);
        assert_eq!(cell.record_count, 5);
        assert_eq!(cell.markers[0].color, RecordType::Food.color());
        assert_eq!(index.records_for_day(&store, today).len(), 5);

        // Markers follow store order (newest first)
        let newest = store.all()[0].id;
        assert_eq!(cell.markers[0].record_id, newest);
    }

    #[test]
    fn test_records_outside_month_ignored() {
        let today = day(2024, 5, 31);
        let (mut store, clock) = store_at(today);
        store.append(NewRecord::trimming()).unwrap();
        clock.advance(Duration::days(1));
        store.append(NewRecord::trimming()).unwrap();

        let grid = CalendarIndex::default().month(&store, YearMonth::of(today), today);
        let total: usize = grid.days().map(|d| d.record_count).sum();
        assert_eq!(total, 1);
    }
}
