//! Type filter - the set of record types a view shows
//!
//! Starts with every type enabled. Toggling is its own inverse, so turning
//! a type off and on again restores exactly the previous view.

use crate::storage::RecordType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeFilter {
    enabled: BTreeSet<RecordType>,
}

impl Default for TypeFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl TypeFilter {
    /// Every record type enabled
    pub fn all() -> Self {
        Self {
            enabled: RecordType::all().iter().copied().collect(),
        }
    }

    /// Nothing enabled
    pub fn none() -> Self {
        Self {
            enabled: BTreeSet::new(),
        }
    }

    /// Flip one type; returns whether it is enabled afterwards
    pub fn toggle(&mut self, record_type: RecordType) -> bool {
        if self.enabled.remove(&record_type) {
            false
        } else {
            self.enabled.insert(record_type);
            true
        }
    }

    pub fn set(&mut self, record_type: RecordType, enabled: bool) {
        if enabled {
            self.enabled.insert(record_type);
        } else {
            self.enabled.remove(&record_type);
        }
    }

    pub fn contains(&self, record_type: RecordType) -> bool {
        self.enabled.contains(&record_type)
    }

    /// Enabled types in declaration order
    pub fn enabled(&self) -> impl Iterator<Item = RecordType> + '_ {
        self.enabled.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}

impl FromIterator<RecordType> for TypeFilter {
    fn from_iter<I: IntoIterator<Item = RecordType>>(iter: I) -> Self {
        Self {
            enabled: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_everything() {
        let filter = TypeFilter::default();
        for t in RecordType::all() {
            assert!(filter.contains(*t));
        }
        assert_eq!(filter.enabled().count(), 6);
    }

    #[test]
    fn test_toggle_is_involution() {
        let mut filter = TypeFilter::default();
        let before = filter.clone();

        assert!(!filter.toggle(RecordType::Walk));
        assert!(!filter.contains(RecordType::Walk));
        assert!(filter.toggle(RecordType::Walk));
        assert_eq!(filter, before);
    }

    #[test]
    fn test_set_and_collect() {
        let mut filter: TypeFilter = [RecordType::Weight].into_iter().collect();
        assert!(filter.contains(RecordType::Weight));
        assert!(!filter.contains(RecordType::Food));

        filter.set(RecordType::Weight, false);
        assert!(filter.is_empty());
        assert!(TypeFilter::none().is_empty());
    }

    #[test]
    fn test_serializes_as_list() {
        let filter: TypeFilter = [RecordType::Walk, RecordType::Toilet].into_iter().collect();
        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(json, r#"["toilet","walk"]"#);
    }
}
