//! Athlete registration and the athlete directory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::id::new_id;
use crate::storage::{CollectionKey, Identified, Record, Repository, Store};

/// Shown when name, age or sport is missing.
pub const MISSING_FIELDS: &str = "Please enter name, age and sport.";

/// Shown when consent was not given.
pub const MISSING_CONSENT: &str = "Please provide consent to proceed.";

/// A registered athlete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AthleteProfile {
    /// `u_`-prefixed id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Free-form gender.
    #[serde(default)]
    pub gender: String,
    /// Free-form location.
    #[serde(default)]
    pub location: String,
    /// Primary sport.
    pub sport: String,
    /// Always `true`; registration is refused without consent.
    pub consent_given: bool,
    /// When the athlete registered.
    pub created_at: DateTime<Utc>,
}

impl Record for AthleteProfile {
    const COLLECTION: CollectionKey = CollectionKey::Users;
}

impl Identified for AthleteProfile {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Registration form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewAthlete {
    /// Display name.
    pub name: String,
    /// Age in years; 0 means not provided.
    pub age: u32,
    /// Free-form gender.
    pub gender: String,
    /// Free-form location.
    pub location: String,
    /// Primary sport.
    pub sport: String,
    /// Whether the consent box was ticked.
    pub consent: bool,
}

impl NewAthlete {
    /// Validate the form and build a profile.
    ///
    /// # Errors
    ///
    /// Returns a validation error if name, age or sport is missing, or if
    /// consent was not given.
    pub fn into_profile(self) -> Result<AthleteProfile> {
        let name = self.name.trim();
        let sport = self.sport.trim();

        if name.is_empty() || self.age == 0 || sport.is_empty() {
            return Err(Error::validation(MISSING_FIELDS));
        }
        if !self.consent {
            return Err(Error::validation(MISSING_CONSENT));
        }

        Ok(AthleteProfile {
            id: new_id("u_"),
            name: name.to_string(),
            age: self.age,
            gender: self.gender.trim().to_string(),
            location: self.location.trim().to_string(),
            sport: sport.to_string(),
            consent_given: true,
            created_at: Utc::now(),
        })
    }
}

/// Filters for the athlete table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AthleteFilter {
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Exact sport.
    pub sport: Option<String>,
}

impl AthleteFilter {
    /// Whether `athlete` passes the filter. Blank criteria match everything.
    #[must_use]
    pub fn matches(&self, athlete: &AthleteProfile) -> bool {
        if let Some(name) = self.name.as_deref().map(str::trim) {
            if !name.is_empty()
                && !athlete
                    .name
                    .to_lowercase()
                    .contains(&name.to_lowercase())
            {
                return false;
            }
        }
        if let Some(sport) = self.sport.as_deref() {
            if !sport.is_empty() && athlete.sport != sport {
                return false;
            }
        }
        true
    }
}

/// The registered athletes collection.
#[derive(Debug)]
pub struct Athletes<'a> {
    repo: Repository<'a, AthleteProfile>,
}

impl<'a> Athletes<'a> {
    /// Open the athletes collection in `store`.
    #[must_use]
    pub fn new(store: &'a Store) -> Self {
        Self {
            repo: Repository::new(store),
        }
    }

    /// Register an athlete.
    ///
    /// Nothing is written unless the form validates.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, or a storage error.
    pub fn register(&self, form: NewAthlete) -> Result<AthleteProfile> {
        let profile = self.repo.append(form.into_profile()?)?;
        info!(id = %profile.id, sport = %profile.sport, "athlete registered");
        Ok(profile)
    }

    /// Every athlete, in registration order.
    #[must_use]
    pub fn list(&self) -> Vec<AthleteProfile> {
        self.repo.list()
    }

    /// Number of registered athletes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.repo.len()
    }

    /// Whether nobody has registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repo.is_empty()
    }

    /// Athletes passing `filter`.
    #[must_use]
    pub fn filter(&self, filter: &AthleteFilter) -> Vec<AthleteProfile> {
        self.list()
            .into_iter()
            .filter(|a| filter.matches(a))
            .collect()
    }

    /// Distinct sports, in the order they first appear.
    #[must_use]
    pub fn sports(&self) -> Vec<String> {
        let mut sports: Vec<String> = Vec::new();
        for athlete in self.list() {
            if !athlete.sport.is_empty() && !sports.contains(&athlete.sport) {
                sports.push(athlete.sport);
            }
        }
        sports
    }

    /// Delete every athlete.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn clear(&self) -> Result<bool> {
        self.repo.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, age: u32, sport: &str, consent: bool) -> NewAthlete {
        NewAthlete {
            name: name.to_string(),
            age,
            gender: "F".to_string(),
            location: " Pune ".to_string(),
            sport: sport.to_string(),
            consent,
        }
    }

    #[test]
    fn test_register_valid_appends_one() {
        let store = Store::in_memory();
        let athletes = Athletes::new(&store);

        let profile = athletes
            .register(form("  Asha ", 14, "archery", true))
            .unwrap();

        assert_eq!(athletes.len(), 1);
        assert!(profile.id.starts_with("u_"));
        assert_eq!(profile.name, "Asha");
        assert_eq!(profile.location, "Pune");
        assert!(profile.consent_given);
        assert_eq!(athletes.list()[0], profile);
    }

    #[test]
    fn test_register_invalid_inputs_write_nothing() {
        let store = Store::in_memory();
        let athletes = Athletes::new(&store);
        athletes.register(form("Asha", 14, "archery", true)).unwrap();

        let cases = [
            (form("", 14, "archery", true), MISSING_FIELDS),
            (form("   ", 14, "archery", true), MISSING_FIELDS),
            (form("Ravi", 0, "archery", true), MISSING_FIELDS),
            (form("Ravi", 12, "", true), MISSING_FIELDS),
            (form("Ravi", 12, "boxing", false), MISSING_CONSENT),
        ];
        for (input, message) in cases {
            let err = athletes.register(input).unwrap_err();
            assert!(err.is_validation());
            assert_eq!(err.to_string(), message);
        }

        assert_eq!(athletes.len(), 1);
    }

    #[test]
    fn test_missing_fields_reported_before_consent() {
        let err = form("", 0, "", false).into_profile().unwrap_err();
        assert_eq!(err.to_string(), MISSING_FIELDS);
    }

    #[test]
    fn test_filter_by_name_and_sport() {
        let store = Store::in_memory();
        let athletes = Athletes::new(&store);
        athletes.register(form("Asha Rao", 14, "archery", true)).unwrap();
        athletes.register(form("Ravi", 15, "boxing", true)).unwrap();
        athletes.register(form("Rashid", 16, "archery", true)).unwrap();

        let by_name = athletes.filter(&AthleteFilter {
            name: Some("RA".to_string()),
            sport: None,
        });
        assert_eq!(by_name.len(), 3);

        let by_both = athletes.filter(&AthleteFilter {
            name: Some("ra".to_string()),
            sport: Some("archery".to_string()),
        });
        let names: Vec<&str> = by_both.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Asha Rao", "Rashid"]);

        let blank = athletes.filter(&AthleteFilter {
            name: Some(String::new()),
            sport: Some(String::new()),
        });
        assert_eq!(blank.len(), 3);
    }

    #[test]
    fn test_sports_distinct_in_first_seen_order() {
        let store = Store::in_memory();
        let athletes = Athletes::new(&store);
        athletes.register(form("A", 14, "boxing", true)).unwrap();
        athletes.register(form("B", 14, "archery", true)).unwrap();
        athletes.register(form("C", 14, "boxing", true)).unwrap();

        assert_eq!(athletes.sports(), vec!["boxing", "archery"]);
    }

    #[test]
    fn test_profile_serialization_round_trip() {
        let profile = form("Asha", 14, "archery", true).into_profile().unwrap();
        let json = serde_json::to_string(&profile).unwrap();
        let back: AthleteProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile, back);
    }
}
