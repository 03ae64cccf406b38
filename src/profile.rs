//! Pet profile
//!
//! The profile aggregate edited during onboarding and from the "my dog"
//! screen: identity, food types offered in the entry form, vaccination
//! history, social handles and frequently used places.

use crate::storage::IdGenerator;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Food type every new profile starts with
pub const DEFAULT_FOOD_TYPE: &str = "ドライフード";

/// Breeds offered as one-tap choices during onboarding
pub const POPULAR_BREEDS: &[&str] = &[
    "トイプードル",
    "柴犬",
    "チワワ",
    "ミニチュアダックスフンド",
    "ポメラニアン",
    "フレンチブルドッグ",
    "ゴールデンレトリバー",
    "ラブラドールレトリバー",
    "その他",
];

/// Profile errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ProfileResult<T> = std::result::Result<T, ProfileError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "オス")]
    Male,
    #[serde(rename = "メス")]
    Female,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "オス",
            Gender::Female => "メス",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Gender::Male => "♂️",
            Gender::Female => "♀️",
        }
    }
}

/// Social media handles (without the leading `@`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLinks {
    #[serde(default)]
    pub twitter: String,
    #[serde(default)]
    pub instagram: String,
    #[serde(default)]
    pub facebook: String,
}

impl SocialLinks {
    fn link(base: &str, handle: &str) -> Option<String> {
        let handle = handle.trim().trim_start_matches('@');
        if handle.is_empty() {
            None
        } else {
            Some(format!("{}{}", base, urlencoding::encode(handle)))
        }
    }

    pub fn twitter_url(&self) -> Option<String> {
        Self::link("https://twitter.com/", &self.twitter)
    }

    pub fn instagram_url(&self) -> Option<String> {
        Self::link("https://instagram.com/", &self.instagram)
    }

    pub fn facebook_url(&self) -> Option<String> {
        Self::link("https://facebook.com/", &self.facebook)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VaccinationId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VaccineKind {
    #[serde(rename = "狂犬病")]
    Rabies,
    #[serde(rename = "混合ワクチン")]
    Combination,
    #[serde(rename = "ノミダニ")]
    FleaTick,
}

impl VaccineKind {
    pub fn all() -> &'static [VaccineKind] {
        &[
            VaccineKind::Rabies,
            VaccineKind::Combination,
            VaccineKind::FleaTick,
        ]
    }

    /// Value stored in records and forms
    pub fn value(&self) -> &'static str {
        match self {
            VaccineKind::Rabies => "狂犬病",
            VaccineKind::Combination => "混合ワクチン",
            VaccineKind::FleaTick => "ノミダニ",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            VaccineKind::Rabies => "狂犬病ワクチン",
            VaccineKind::Combination => "混合ワクチン",
            VaccineKind::FleaTick => "ノミダニ予防薬",
        }
    }
}

/// A vaccination in the pet's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vaccination {
    pub id: VaccinationId,
    #[serde(rename = "type")]
    pub kind: VaccineKind,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_date: Option<NaiveDate>,
    /// Opaque data URI of the certificate photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Vaccination form contents before an id is assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVaccination {
    #[serde(rename = "type")]
    pub kind: VaccineKind,
    pub date: NaiveDate,
    #[serde(default)]
    pub next_date: Option<NaiveDate>,
    #[serde(default)]
    pub photo: Option<String>,
}

impl NewVaccination {
    pub fn new(kind: VaccineKind, date: NaiveDate) -> Self {
        Self {
            kind,
            date,
            next_date: None,
            photo: None,
        }
    }

    pub fn next_date(mut self, date: NaiveDate) -> Self {
        self.next_date = Some(date);
        self
    }

    pub fn photo(mut self, data_uri: impl Into<String>) -> Self {
        self.photo = Some(data_uri.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceKind {
    Hospital,
    Trimming,
    Hotel,
    Dogrun,
    Other,
}

impl PlaceKind {
    pub fn all() -> &'static [PlaceKind] {
        &[
            PlaceKind::Hospital,
            PlaceKind::Trimming,
            PlaceKind::Hotel,
            PlaceKind::Dogrun,
            PlaceKind::Other,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            PlaceKind::Hospital => "🏥 動物病院",
            PlaceKind::Trimming => "✂️ トリミングサロン",
            PlaceKind::Hotel => "🏨 ペットホテル",
            PlaceKind::Dogrun => "🐕 ドッグラン",
            PlaceKind::Other => "📍 その他",
        }
    }
}

/// A frequently used place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: PlaceId,
    #[serde(rename = "type")]
    pub kind: PlaceKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// Place form contents before an id is assigned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlace {
    #[serde(rename = "type")]
    pub kind: PlaceKind,
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub memo: Option<String>,
}

impl NewPlace {
    pub fn new(kind: PlaceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            phone: None,
            address: None,
            memo: None,
        }
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }
}

/// The pet profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub breed: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
    /// Opaque data URI
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default = "default_food_types")]
    pub food_types: Vec<String>,
    #[serde(default)]
    pub vaccinations: Vec<Vaccination>,
    #[serde(default, rename = "socialMedia")]
    pub social: SocialLinks,
    #[serde(default)]
    pub places: Vec<Place>,
    #[serde(skip)]
    ids: IdGenerator,
}

fn default_food_types() -> Vec<String> {
    vec![DEFAULT_FOOD_TYPE.to_string()]
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            breed: String::new(),
            gender: None,
            birthday: None,
            photo: None,
            food_types: default_food_types(),
            vaccinations: Vec::new(),
            social: SocialLinks::default(),
            places: Vec::new(),
            ids: IdGenerator::new(),
        }
    }
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn breed(mut self, breed: impl Into<String>) -> Self {
        self.breed = breed.into();
        self
    }

    pub fn gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn birthday(mut self, birthday: NaiveDate) -> Self {
        self.birthday = Some(birthday);
        self
    }

    /// Onboarding needs at least a name
    pub fn validate(&self) -> ProfileResult<()> {
        if self.name.trim().is_empty() {
            return Err(ProfileError::Validation("name is required".to_string()));
        }
        Ok(())
    }

    /// Add a food type; blank input is ignored. Returns whether it was added.
    pub fn add_food_type(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.food_types.push(name.to_string());
        true
    }

    pub fn remove_food_type(&mut self, index: usize) -> Option<String> {
        (index < self.food_types.len()).then(|| self.food_types.remove(index))
    }

    /// Add a vaccination, assigning an id derived from `now`
    pub fn add_vaccination(&mut self, draft: NewVaccination, now: NaiveDateTime) -> VaccinationId {
        let id = VaccinationId(self.next_id(now));
        self.vaccinations.push(Vaccination {
            id,
            kind: draft.kind,
            date: draft.date,
            next_date: draft.next_date,
            photo: draft.photo,
        });
        tracing::info!(id = id.0, kind = draft.kind.value(), "Added vaccination");
        id
    }

    pub fn delete_vaccination(&mut self, id: VaccinationId) -> bool {
        let before = self.vaccinations.len();
        self.vaccinations.retain(|v| v.id != id);
        self.vaccinations.len() != before
    }

    /// Vaccinations due on or after `today`, soonest first
    pub fn upcoming_vaccinations(&self, today: NaiveDate) -> Vec<&Vaccination> {
        let mut due: Vec<&Vaccination> = self
            .vaccinations
            .iter()
            .filter(|v| v.next_date.is_some_and(|next| next >= today))
            .collect();
        due.sort_by_key(|v| v.next_date);
        due
    }

    /// Add a place, assigning an id derived from `now`
    pub fn add_place(&mut self, draft: NewPlace, now: NaiveDateTime) -> ProfileResult<PlaceId> {
        if draft.name.trim().is_empty() {
            return Err(ProfileError::Validation("place name is required".to_string()));
        }

        let id = PlaceId(self.next_id(now));
        self.places.push(Place {
            id,
            kind: draft.kind,
            name: draft.name,
            phone: draft.phone,
            address: draft.address,
            memo: draft.memo,
        });
        tracing::info!(id = id.0, "Added place");
        Ok(id)
    }

    pub fn delete_place(&mut self, id: PlaceId) -> bool {
        let before = self.places.len();
        self.places.retain(|p| p.id != id);
        self.places.len() != before
    }

    pub fn places_of(&self, kind: PlaceKind) -> Vec<&Place> {
        self.places.iter().filter(|p| p.kind == kind).collect()
    }

    fn next_id(&mut self, now: NaiveDateTime) -> i64 {
        // Profiles loaded from JSON carry ids the generator has not seen
        let seen = self
            .vaccinations
            .iter()
            .map(|v| v.id.0)
            .chain(self.places.iter().map(|p| p.id.0))
            .max()
            .unwrap_or(0);
        if seen > self.ids.last() {
            self.ids.claim(seen);
        }
        self.ids.next_at(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn now() -> NaiveDateTime {
        date(5, 1).and_hms_opt(10, 0, 0).unwrap()
    }

    #[test]
    fn test_defaults_and_validation() {
        let profile = Profile::default();
        assert_eq!(profile.food_types, vec!["ドライフード".to_string()]);
        assert!(profile.validate().is_err());

        let profile = Profile::new("ポチ").breed("柴犬").gender(Gender::Male);
        assert!(profile.validate().is_ok());
        assert_eq!(profile.gender.map(|g| g.label()), Some("オス"));
    }

    #[test]
    fn test_food_types() {
        let mut profile = Profile::new("ポチ");
        assert!(profile.add_food_type("  ウェットフード "));
        assert!(!profile.add_food_type("   "));
        assert_eq!(profile.food_types.len(), 2);
        assert_eq!(profile.food_types[1], "ウェットフード");

        assert_eq!(profile.remove_food_type(0).as_deref(), Some("ドライフード"));
        assert_eq!(profile.remove_food_type(5), None);
        assert_eq!(profile.food_types, vec!["ウェットフード".to_string()]);
    }

    #[test]
    fn test_vaccinations() {
        let mut profile = Profile::new("ポチ");
        let rabies = profile.add_vaccination(
            NewVaccination::new(VaccineKind::Rabies, date(4, 1)).next_date(date(12, 1)),
            now(),
        );
        let mixed = profile.add_vaccination(
            NewVaccination::new(VaccineKind::Combination, date(4, 2)).next_date(date(6, 1)),
            now(),
        );
        profile.add_vaccination(NewVaccination::new(VaccineKind::FleaTick, date(4, 3)), now());
        assert_ne!(rabies, mixed);

        let upcoming: Vec<VaccinationId> = profile
            .upcoming_vaccinations(date(5, 1))
            .iter()
            .map(|v| v.id)
            .collect();
        assert_eq!(upcoming, vec![mixed, rabies]);
        assert_eq!(profile.upcoming_vaccinations(date(7, 1)).len(), 1);

        assert!(profile.delete_vaccination(rabies));
        assert!(!profile.delete_vaccination(rabies));
        assert_eq!(profile.vaccinations.len(), 2);
    }

    #[test]
    fn test_places() {
        let mut profile = Profile::new("ポチ");
        let vet = profile
            .add_place(
                NewPlace::new(PlaceKind::Hospital, "○○動物病院").phone("03-1234-5678"),
                now(),
            )
            .unwrap();
        profile
            .add_place(NewPlace::new(PlaceKind::Dogrun, "代々木ドッグラン"), now())
            .unwrap();
        assert!(profile
            .add_place(NewPlace::new(PlaceKind::Other, " "), now())
            .is_err());

        assert_eq!(profile.places_of(PlaceKind::Hospital).len(), 1);
        assert_eq!(PlaceKind::Hospital.label(), "🏥 動物病院");
        assert!(profile.delete_place(vet));
        assert!(profile.places_of(PlaceKind::Hospital).is_empty());
    }

    #[test]
    fn test_ids_continue_after_deserialize() {
        let json = r#"{
            "name": "ハナ",
            "vaccinations": [{"id": 9999999999999, "type": "狂犬病", "date": "2024-04-01"}]
        }"#;
        let mut profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.food_types, vec!["ドライフード".to_string()]);

        let id = profile.add_vaccination(NewVaccination::new(VaccineKind::FleaTick, date(5, 1)), now());
        assert!(id.0 > 9999999999999);
    }

    #[test]
    fn test_social_links() {
        let social = SocialLinks {
            twitter: "@pochi_dog".to_string(),
            instagram: "ポチ".to_string(),
            facebook: String::new(),
        };
        assert_eq!(
            social.twitter_url().as_deref(),
            Some("https://twitter.com/pochi_dog")
        );
        assert_eq!(
            social.instagram_url().as_deref(),
            Some("https://instagram.com/%E3%83%9D%E3%83%81")
        );
        assert_eq!(social.facebook_url(), None);
    }

    #[test]
    fn test_reference_data() {
        assert_eq!(VaccineKind::all().len(), 3);
        assert_eq!(VaccineKind::FleaTick.label(), "ノミダニ予防薬");
        assert_eq!(PlaceKind::all().len(), 5);
        assert!(POPULAR_BREEDS.contains(&"柴犬"));

        let json = serde_json::to_string(&VaccineKind::Rabies).unwrap();
        assert_eq!(json, "\"狂犬病\"");
    }
}
