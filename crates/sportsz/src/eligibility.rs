//! Static eligibility and training guidance per sport.

/// Guidance for one sport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligibility {
    /// Lowercase sport name.
    pub sport: &'static str,
    /// Minimum age to start structured training.
    pub min_age: u32,
    /// Training and diet notes.
    pub note: &'static str,
}

/// Every sport with guidance.
pub const TABLE: [Eligibility; 8] = [
    Eligibility {
        sport: "basketball",
        min_age: 14,
        note: "Emphasis on height and vertical leap. Diet: high-protein, carbs around training.",
    },
    Eligibility {
        sport: "boxing",
        min_age: 12,
        note: "Cardio and strength. Diet: lean proteins and controlled weight management.",
    },
    Eligibility {
        sport: "archery",
        min_age: 10,
        note: "Focus on posture, eye alignment, steady hands. Diet: balanced for focus.",
    },
    Eligibility {
        sport: "marathon",
        min_age: 16,
        note: "High mileage training, endurance fuel (carbohydrate-rich).",
    },
    Eligibility {
        sport: "wrestling",
        min_age: 12,
        note: "Strength, weight classes; controlled diet, protein.",
    },
    Eligibility {
        sport: "football",
        min_age: 10,
        note: "Agility, endurance, team drills; balanced diet.",
    },
    Eligibility {
        sport: "badminton",
        min_age: 10,
        note: "Explosiveness and reflexes; carbs and protein.",
    },
    Eligibility {
        sport: "cricket",
        min_age: 10,
        note: "Skill-specific training; balanced diet.",
    },
];

/// Find guidance for `sport`, ignoring case and surrounding whitespace.
#[must_use]
pub fn lookup(sport: &str) -> Option<&'static Eligibility> {
    let sport = sport.trim();
    TABLE.iter().find(|e| e.sport.eq_ignore_ascii_case(sport))
}

impl Eligibility {
    /// Whether an athlete of `age` meets the minimum.
    #[must_use]
    pub fn allows(&self, age: u32) -> bool {
        age >= self.min_age
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_case_insensitive() {
        let info = lookup("  Basketball ").unwrap();
        assert_eq!(info.min_age, 14);
        assert!(info.note.starts_with("Emphasis on height"));
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(lookup("curling").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_all_sports_present() {
        for sport in [
            "basketball", "boxing", "archery", "marathon", "wrestling", "football", "badminton",
            "cricket",
        ] {
            assert!(lookup(sport).is_some(), "missing {sport}");
        }
    }

    #[test]
    fn test_allows() {
        let marathon = lookup("marathon").unwrap();
        assert!(!marathon.allows(15));
        assert!(marathon.allows(16));
    }
}
