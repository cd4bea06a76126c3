//! Staff domain: typed department classification.
//!
//! Divisions used to carry free-text department labels that every query
//! site pattern-matched its own way. The label is classified into this enum
//! once at data entry; queries filter on the canonical name only.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Station department a division belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Broadcasting,
    Production,
    News,
    Music,
    Technical,
    Administration,
}

impl Department {
    pub const ALL: [Department; 6] = [
        Department::Broadcasting,
        Department::Production,
        Department::News,
        Department::Music,
        Department::Technical,
        Department::Administration,
    ];

    /// Canonical wire/database name.
    pub fn as_str(self) -> &'static str {
        match self {
            Department::Broadcasting => "broadcasting",
            Department::Production => "production",
            Department::News => "news",
            Department::Music => "music",
            Department::Technical => "technical",
            Department::Administration => "administration",
        }
    }

    /// Classify free-text department input.
    ///
    /// Accepts the canonical names plus the spellings observed in imported
    /// rosters. Unrecognized input is a validation error, never a silent
    /// fallback.
    pub fn classify(input: &str) -> Result<Self, CoreError> {
        let normalized = input.trim().to_ascii_lowercase();
        let dept = match normalized.as_str() {
            "broadcasting" | "broadcast" | "on-air" | "on air" | "air staff" => {
                Department::Broadcasting
            }
            "production" | "producers" | "studio" => Department::Production,
            "news" | "newsroom" | "news desk" => Department::News,
            "music" | "music desk" | "programming" => Department::Music,
            "technical" | "tech" | "engineering" | "it" => Department::Technical,
            "administration" | "admin" | "office" | "management" => Department::Administration,
            _ => {
                return Err(CoreError::Validation(format!(
                    "unknown department: {input}"
                )))
            }
        };
        Ok(dept)
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Department::classify(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn canonical_names_round_trip() {
        for dept in Department::ALL {
            assert_eq!(Department::classify(dept.as_str()).unwrap(), dept);
        }
    }

    #[test]
    fn legacy_spellings_are_classified() {
        assert_eq!(
            Department::classify("Engineering").unwrap(),
            Department::Technical
        );
        assert_eq!(
            Department::classify(" on-air ").unwrap(),
            Department::Broadcasting
        );
        assert_eq!(Department::classify("ADMIN").unwrap(), Department::Administration);
        assert_eq!(Department::classify("newsroom").unwrap(), Department::News);
    }

    #[test]
    fn unknown_department_is_rejected() {
        assert_matches!(
            Department::classify("catering"),
            Err(CoreError::Validation(_))
        );
        assert_matches!(Department::classify(""), Err(CoreError::Validation(_)));
    }

    #[test]
    fn serde_uses_canonical_names() {
        let json = serde_json::to_string(&Department::Technical).unwrap();
        assert_eq!(json, "\"technical\"");
        let back: Department = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Department::Technical);
    }
}
