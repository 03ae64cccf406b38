//! Core data types for the diary record log
//!
//! This module defines the types every view is derived from:
//! - `Record`: one logged care event, immutable once appended
//! - `NewRecord`: a draft handed to the store by the collaborator
//! - `Payload`: the type-specific part of a record
//! - `RecordType`, `ToiletKind` and `Condition`: closed enumerations

use crate::walk::{directions_url, Location};
use chrono::{NaiveDate, NaiveDateTime};
use serde::de::IntoDeserializer;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Record identifier, strictly increasing in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of care event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Toilet,
    Food,
    Walk,
    Weight,
    Vaccination,
    Trimming,
}

impl RecordType {
    /// Get all record types for iteration
    pub fn all() -> &'static [RecordType] {
        &[
            RecordType::Toilet,
            RecordType::Food,
            RecordType::Walk,
            RecordType::Weight,
            RecordType::Vaccination,
            RecordType::Trimming,
        ]
    }

    /// Display name
    pub fn label(&self) -> &'static str {
        match self {
            RecordType::Toilet => "トイレ",
            RecordType::Food => "ごはん",
            RecordType::Walk => "散歩",
            RecordType::Weight => "体重",
            RecordType::Vaccination => "予防接種",
            RecordType::Trimming => "トリミング",
        }
    }

    /// Marker colour used by list rows and calendar cells
    pub fn color(&self) -> &'static str {
        match self {
            RecordType::Toilet => "#3b82f6",
            RecordType::Food => "#f97316",
            RecordType::Walk => "#22c55e",
            RecordType::Weight => "#a855f7",
            RecordType::Vaccination => "#ef4444",
            RecordType::Trimming => "#ec4899",
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            RecordType::Toilet => "toilet",
            RecordType::Food => "food",
            RecordType::Walk => "walk",
            RecordType::Weight => "weight",
            RecordType::Vaccination => "vaccination",
            RecordType::Trimming => "trimming",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordType::all()
            .iter()
            .copied()
            .find(|t| t.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown record type: {}", s))
    }
}

/// Toilet sub-kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ToiletKind {
    #[serde(rename = "おしっこ")]
    Pee,
    #[serde(rename = "うんち")]
    Poop,
}

impl ToiletKind {
    pub fn label(&self) -> &'static str {
        match self {
            ToiletKind::Pee => "おしっこ",
            ToiletKind::Poop => "うんち",
        }
    }
}

/// Condition noted with a toilet record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Good,
    Normal,
    Bad,
}

impl Condition {
    pub fn emoji(&self) -> &'static str {
        match self {
            Condition::Good => "😊",
            Condition::Normal => "😐",
            Condition::Bad => "😰",
        }
    }
}

/// Decode an optional form field, treating an empty or blank string as
/// absent. Entry forms send `""` for every field left unset.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(text) if !text.trim().is_empty() => T::deserialize(text.into_deserializer()).map(Some),
        _ => Ok(None),
    }
}

/// Type-specific part of a record.
///
/// Each variant carries only its own schema, so a food record can never hold
/// a toilet condition or walk coordinates. Serialized with the record type
/// as the `type` tag and the payload string as `subType`; every variant
/// emits `subType`, including the computed walk summary.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Payload {
    Toilet {
        #[serde(rename = "subType", default, deserialize_with = "blank_as_none")]
        kind: Option<ToiletKind>,
        #[serde(default, deserialize_with = "blank_as_none")]
        condition: Option<Condition>,
    },
    Food {
        #[serde(rename = "subType", default)]
        food: String,
    },
    Walk {
        #[serde(rename = "startLocation", default)]
        start_location: Option<Location>,
        #[serde(rename = "endLocation", default)]
        end_location: Option<Location>,
        /// Minutes
        #[serde(default)]
        duration: Option<u32>,
        /// Kilometres
        #[serde(default)]
        distance: Option<f64>,
    },
    Weight {
        /// Raw entry in kilograms, kept as typed by the user
        #[serde(rename = "subType", default)]
        weight: String,
    },
    Vaccination {
        #[serde(rename = "subType", default, deserialize_with = "blank_as_none")]
        vaccine: Option<String>,
    },
    Trimming,
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.record_type().as_str())?;
        map.serialize_entry("subType", &self.sub_type())?;

        match self {
            Payload::Toilet {
                condition: Some(condition),
                ..
            } => map.serialize_entry("condition", condition)?,
            Payload::Walk {
                start_location,
                end_location,
                duration,
                distance,
            } => {
                if let Some(start) = start_location {
                    map.serialize_entry("startLocation", start)?;
                }
                if let Some(end) = end_location {
                    map.serialize_entry("endLocation", end)?;
                }
                if let Some(duration) = duration {
                    map.serialize_entry("duration", duration)?;
                }
                if let Some(distance) = distance {
                    map.serialize_entry("distance", distance)?;
                }
            }
            _ => {}
        }
        map.end()
    }
}

impl Payload {
    pub fn record_type(&self) -> RecordType {
        match self {
            Payload::Toilet { .. } => RecordType::Toilet,
            Payload::Food { .. } => RecordType::Food,
            Payload::Walk { .. } => RecordType::Walk,
            Payload::Weight { .. } => RecordType::Weight,
            Payload::Vaccination { .. } => RecordType::Vaccination,
            Payload::Trimming => RecordType::Trimming,
        }
    }

    /// The short payload string shown next to the type name
    pub fn sub_type(&self) -> String {
        match self {
            Payload::Toilet { kind, .. } => kind.map(|k| k.label().to_string()).unwrap_or_default(),
            Payload::Food { food } => food.clone(),
            Payload::Walk {
                duration: Some(duration),
                distance: Some(distance),
                ..
            } => format!("{:.2}km / {}分", distance, duration),
            Payload::Walk { .. } => String::new(),
            Payload::Weight { weight } => weight.clone(),
            Payload::Vaccination { vaccine } => vaccine.clone().unwrap_or_default(),
            Payload::Trimming => String::new(),
        }
    }

    pub fn condition(&self) -> Option<Condition> {
        match self {
            Payload::Toilet { condition, .. } => *condition,
            _ => None,
        }
    }
}

/// Start and end of a tracked walk
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalkRoute {
    pub start_location: Location,
    pub end_location: Location,
    pub duration: u32,
    pub distance: f64,
}

impl WalkRoute {
    /// Walking-directions deep link for an external map service
    pub fn map_url(&self, base: &str) -> String {
        directions_url(base, &self.start_location, &self.end_location)
    }
}

/// A logged diary event
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Record {
    pub id: RecordId,
    /// Calendar day (local), the grouping key for calendar views
    pub date: NaiveDate,
    /// Local date-time of the event
    pub timestamp: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(flatten)]
    pub payload: Payload,
}

impl Record {
    pub fn record_type(&self) -> RecordType {
        self.payload.record_type()
    }

    pub fn sub_type(&self) -> String {
        self.payload.sub_type()
    }

    pub fn condition(&self) -> Option<Condition> {
        self.payload.condition()
    }

    /// Route data, present only for walks captured by the tracker
    pub fn walk_route(&self) -> Option<WalkRoute> {
        match self.payload {
            Payload::Walk {
                start_location: Some(start_location),
                end_location: Some(end_location),
                duration,
                distance,
            } => Some(WalkRoute {
                start_location,
                end_location,
                duration: duration.unwrap_or(0),
                distance: distance.unwrap_or_else(|| start_location.distance_to(&end_location)),
            }),
            _ => None,
        }
    }

    /// One-line description: type name, payload and condition emoji
    pub fn summary(&self) -> String {
        let mut line = self.record_type().label().to_string();
        let sub_type = self.sub_type();

        if !sub_type.is_empty() {
            match self.record_type() {
                RecordType::Weight => line.push_str(&format!(" ({}kg)", sub_type)),
                _ => line.push_str(&format!(" ({})", sub_type)),
            }
        }
        if let Some(condition) = self.condition() {
            line.push(' ');
            line.push_str(condition.emoji());
        }
        line
    }
}

/// A record draft as produced by an entry form or the walk tracker.
///
/// The store fills in the id (when absent) and the timestamp (when absent).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    /// Event time; defaults to the store clock
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "blank_as_none")]
    pub at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "blank_as_none")]
    pub memo: Option<String>,
    #[serde(flatten)]
    pub payload: Payload,
}

impl NewRecord {
    pub fn new(payload: Payload) -> Self {
        Self {
            id: None,
            at: None,
            memo: None,
            payload,
        }
    }

    pub fn toilet(kind: ToiletKind, condition: Option<Condition>) -> Self {
        Self::new(Payload::Toilet {
            kind: Some(kind),
            condition,
        })
    }

    pub fn food(food: impl Into<String>) -> Self {
        Self::new(Payload::Food { food: food.into() })
    }

    /// Weight in kilograms
    pub fn weight(kg: f64) -> Self {
        Self::new(Payload::Weight {
            weight: kg.to_string(),
        })
    }

    /// Weight exactly as entered in a form field
    pub fn weight_entry(raw: impl Into<String>) -> Self {
        Self::new(Payload::Weight { weight: raw.into() })
    }

    /// A tracked walk between two points
    pub fn walk(start: Location, end: Location, duration: u32, distance: f64) -> Self {
        Self::new(Payload::Walk {
            start_location: Some(start),
            end_location: Some(end),
            duration: Some(duration),
            distance: Some(distance),
        })
    }

    /// A walk logged by hand, without route data
    pub fn manual_walk() -> Self {
        Self::new(Payload::Walk {
            start_location: None,
            end_location: None,
            duration: None,
            distance: None,
        })
    }

    pub fn vaccination(vaccine: Option<String>) -> Self {
        Self::new(Payload::Vaccination { vaccine })
    }

    pub fn trimming() -> Self {
        Self::new(Payload::Trimming)
    }

    /// Builder: set event time
    pub fn at(mut self, at: NaiveDateTime) -> Self {
        self.at = Some(at);
        self
    }

    /// Builder: date an event-form entry (calendar reminders) at midnight
    pub fn on_day(self, date: NaiveDate) -> Self {
        self.at(date.and_time(chrono::NaiveTime::MIN))
    }

    /// Builder: set memo; blank text is dropped
    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        let memo = memo.into();
        self.memo = if memo.trim().is_empty() { None } else { Some(memo) };
        self
    }

    /// Builder: supply an explicit id
    pub fn id(mut self, id: RecordId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Parse a weight entry in kilograms.
///
/// Returns `None` for anything that is not a finite decimal number.
pub fn parse_weight(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(payload: Payload) -> Record {
        let ts = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        Record {
            id: RecordId(1),
            date: ts.date(),
            timestamp: ts,
            memo: None,
            payload,
        }
    }

    #[test]
    fn test_record_type_parse() {
        assert_eq!("toilet".parse::<RecordType>(), Ok(RecordType::Toilet));
        assert_eq!(" Weight ".parse::<RecordType>(), Ok(RecordType::Weight));
        assert!("nap".parse::<RecordType>().is_err());
        assert_eq!(RecordType::Trimming.to_string(), "trimming");
    }

    #[test]
    fn test_summary() {
        let toilet = sample(Payload::Toilet {
            kind: Some(ToiletKind::Pee),
            condition: Some(Condition::Good),
        });
        assert_eq!(toilet.summary(), "トイレ (おしっこ) 😊");

        let weight = sample(Payload::Weight {
            weight: "5.2".to_string(),
        });
        assert_eq!(weight.summary(), "体重 (5.2kg)");

        assert_eq!(sample(Payload::Trimming).summary(), "トリミング");
    }

    #[test]
    fn test_walk_sub_type() {
        let draft = NewRecord::walk(Location::new(35.0, 135.0), Location::new(35.01, 135.01), 10, 1.4283);
        assert_eq!(draft.payload.sub_type(), "1.43km / 10分");
        assert_eq!(NewRecord::manual_walk().payload.sub_type(), "");
    }

    #[test]
    fn test_walk_route_only_with_locations() {
        let tracked = sample(
            NewRecord::walk(Location::new(35.0, 135.0), Location::new(35.01, 135.01), 10, 1.2)
                .payload,
        );
        let route = tracked.walk_route().unwrap();
        assert_eq!(route.duration, 10);
        assert!(route.map_url(crate::walk::DEFAULT_MAP_URL).contains("travelmode=walking"));

        assert!(sample(NewRecord::manual_walk().payload).walk_route().is_none());
    }

    #[test]
    fn test_record_json_shape() {
        let record = sample(Payload::Toilet {
            kind: Some(ToiletKind::Poop),
            condition: Some(Condition::Normal),
        });
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["type"], "toilet");
        assert_eq!(json["subType"], "うんち");
        assert_eq!(json["condition"], "normal");
        assert_eq!(json["date"], "2024-05-01");
    }

    #[test]
    fn test_sub_type_emitted_for_every_type() {
        let walk = sample(
            NewRecord::walk(Location::new(35.0, 135.0), Location::new(35.01, 135.01), 10, 1.4283)
                .payload,
        );
        let json = serde_json::to_value(&walk).unwrap();
        assert_eq!(json["type"], "walk");
        assert_eq!(json["subType"], "1.43km / 10分");
        assert_eq!(json["duration"], 10);
        assert!(json.get("startLocation").is_some());

        let json = serde_json::to_value(sample(Payload::Trimming)).unwrap();
        assert_eq!(json["type"], "trimming");
        assert_eq!(json["subType"], "");

        let json = serde_json::to_value(sample(NewRecord::manual_walk().payload)).unwrap();
        assert_eq!(json["subType"], "");
        assert!(json.get("startLocation").is_none());

        let decoded: Record = serde_json::from_value(serde_json::to_value(&walk).unwrap()).unwrap();
        assert_eq!(decoded.sub_type(), "1.43km / 10分");
        assert!(decoded.walk_route().is_some());
    }

    #[test]
    fn test_blank_form_fields_are_absent() {
        let draft: NewRecord = serde_json::from_str(
            r#"{"type": "toilet", "subType": "", "condition": "", "memo": "", "time": ""}"#,
        )
        .unwrap();
        assert_eq!(
            draft.payload,
            Payload::Toilet {
                kind: None,
                condition: None
            }
        );
        assert_eq!(draft.memo, None);
        assert_eq!(draft.at, None);

        let draft: NewRecord =
            serde_json::from_str(r#"{"type": "vaccination", "subType": " ", "at": ""}"#).unwrap();
        assert_eq!(draft.payload, Payload::Vaccination { vaccine: None });

        let draft: NewRecord = serde_json::from_str(
            r#"{"type": "toilet", "subType": "うんち", "condition": "bad", "at": "2024-05-01T07:30:00"}"#,
        )
        .unwrap();
        assert_eq!(draft.payload.sub_type(), "うんち");
        assert_eq!(draft.payload.condition(), Some(Condition::Bad));
        assert!(draft.at.is_some());

        let bad: Result<NewRecord, _> =
            serde_json::from_str(r#"{"type": "toilet", "subType": "げり"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_draft_from_form_json() {
        let draft: NewRecord = serde_json::from_str(
            r#"{"type": "weight", "subType": "5.4", "memo": "after walk", "at": "2024-05-02T18:00:00"}"#,
        )
        .unwrap();

        assert_eq!(draft.payload.record_type(), RecordType::Weight);
        assert_eq!(draft.payload.sub_type(), "5.4");
        assert_eq!(draft.memo.as_deref(), Some("after walk"));
        assert!(draft.id.is_none());
    }

    #[test]
    fn test_blank_memo_dropped() {
        assert_eq!(NewRecord::trimming().memo("   ").memo, None);
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight("5.2"), Some(5.2));
        assert_eq!(parse_weight(" 12 "), Some(12.0));
        assert_eq!(parse_weight("heavy"), None);
        assert_eq!(parse_weight("NaN"), None);
        assert_eq!(parse_weight(""), None);
    }
}
