use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A university as returned by the directory service.
///
/// Field names follow the wire format of the remote service so the same
/// shape is used for responses and for the persisted favorites blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct University {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub alpha_two_code: String,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub web_pages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_province: Option<String>,
}

impl University {
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        alpha_two_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            alpha_two_code: alpha_two_code.into(),
            domains: Vec::new(),
            web_pages: Vec::new(),
            state_province: None,
        }
    }

    pub fn key(&self) -> UniversityKey {
        UniversityKey::new(&self.name, &self.country)
    }

    /// Two records are the same university when name and country match.
    pub fn same_as(&self, other: &University) -> bool {
        self.name == other.name && self.country == other.country
    }
}

/// Identity pair `(name, country)`. The remote service has no stable id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UniversityKey {
    pub name: String,
    pub country: String,
}

impl UniversityKey {
    pub fn new(name: &str, country: &str) -> Self {
        Self {
            name: name.to_string(),
            country: country.to_string(),
        }
    }

    pub fn matches(&self, university: &University) -> bool {
        self.name == university.name && self.country == university.country
    }
}

impl fmt::Display for UniversityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.country)
    }
}

/// A university saved by the user.
///
/// `id` and `added_at` are assigned by the favorites store when the record
/// is created and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteUniversity {
    #[serde(flatten)]
    pub university: University,
    pub id: String,
    #[serde(rename = "addedAt")]
    pub added_at: DateTime<Utc>,
}

impl FavoriteUniversity {
    pub(crate) fn new(university: University, id: String, added_at: DateTime<Utc>) -> Self {
        Self {
            university,
            id,
            added_at,
        }
    }

    pub fn key(&self) -> UniversityKey {
        self.university.key()
    }

    pub fn matches(&self, university: &University) -> bool {
        self.university.same_as(university)
    }
}

/// A directory result annotated with whether it is currently a favorite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub university: University,
    pub is_favorite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> University {
        University {
            name: "Université de Lomé".to_string(),
            country: "Togo".to_string(),
            alpha_two_code: "TG".to_string(),
            domains: vec!["univ-lome.tg".to_string()],
            web_pages: vec!["https://univ-lome.tg/".to_string()],
            state_province: None,
        }
    }

    #[test]
    fn test_same_as_ignores_everything_but_name_and_country() {
        let a = sample();
        let mut b = sample();
        b.alpha_two_code = "XX".to_string();
        b.domains.clear();
        b.state_province = Some("Maritime".to_string());
        assert!(a.same_as(&b));

        b.country = "Ghana".to_string();
        assert!(!a.same_as(&b));
    }

    #[test]
    fn test_key_matches_and_display() {
        let key = sample().key();
        assert!(key.matches(&sample()));
        assert_eq!(key.to_string(), "Université de Lomé (Togo)");
    }

    #[test]
    fn test_favorite_serializes_flat_with_added_at() {
        let added_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let favorite = FavoriteUniversity::new(sample(), "fav-1".to_string(), added_at);

        let value = serde_json::to_value(&favorite).unwrap();
        assert_eq!(value["name"], "Université de Lomé");
        assert_eq!(value["alpha_two_code"], "TG");
        assert_eq!(value["web_pages"][0], "https://univ-lome.tg/");
        assert_eq!(value["id"], "fav-1");
        assert_eq!(value["addedAt"], "2024-03-01T12:00:00Z");
        assert!(value.get("state_province").is_none());
    }

    #[test]
    fn test_favorite_reads_javascript_timestamps() {
        let json = r#"{
            "name": "MIT",
            "country": "United States",
            "alpha_two_code": "US",
            "domains": ["mit.edu"],
            "web_pages": ["http://web.mit.edu/"],
            "state_province": "Massachusetts",
            "id": "MIT-United States-1700000000000",
            "addedAt": "2024-01-15T08:30:00.123Z"
        }"#;

        let favorite: FavoriteUniversity = serde_json::from_str(json).unwrap();
        assert_eq!(favorite.university.state_province.as_deref(), Some("Massachusetts"));
        assert_eq!(
            favorite.added_at,
            Utc.with_ymd_and_hms(2024, 1, 15, 8, 30, 0).unwrap()
                + chrono::Duration::milliseconds(123)
        );
    }
}
