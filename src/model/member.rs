//! Member of a surveyed group.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::names;

/// Gender category of a member. Drives node shapes/colors in the sociogram,
/// marker symbols in the diana, and row buckets in the sociomatrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
    Unknown,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Female => "Female",
            Gender::Male => "Male",
            Gender::Unknown => "Other/Unknown",
        }
    }
}

/// A member of a group. The full name (given + family, title-cased) is the
/// unique key within the group; the store owns creation and deletion, the
/// engine only reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub given_name: String,
    pub family_name: String,
    /// Stored 3–4 letter short code. When absent, one is derived from the
    /// name parts (see [`Member::initials`]).
    pub short_code: Option<String>,
    pub gender: Gender,
    pub birth_date: Option<NaiveDate>,
    pub annotations: String,
}

impl Member {
    pub fn new(given_name: impl Into<String>, family_name: impl Into<String>, gender: Gender) -> Self {
        Self {
            given_name: given_name.into(),
            family_name: family_name.into(),
            short_code: None,
            gender,
            birth_date: None,
            annotations: String::new(),
        }
    }

    pub fn with_short_code(mut self, code: impl Into<String>) -> Self {
        self.short_code = Some(code.into());
        self
    }

    pub fn with_birth_date(mut self, date: NaiveDate) -> Self {
        self.birth_date = Some(date);
        self
    }

    pub fn with_annotations(mut self, text: impl Into<String>) -> Self {
        self.annotations = text.into();
        self
    }

    /// Canonical "First Last" key, title-cased and trimmed. Nomination
    /// records reference members by this form.
    pub fn full_name(&self) -> String {
        let name = format!(
            "{} {}",
            names::title_case(self.given_name.trim()),
            names::title_case(self.family_name.trim()),
        );
        name.trim().to_string()
    }

    /// "Last, First" form used by matrix row labels.
    pub fn display_name(&self) -> String {
        format!(
            "{}, {}",
            names::title_case(self.family_name.trim()),
            names::title_case(self.given_name.trim()),
        )
    }

    /// Normalized lookup key for name matching.
    pub fn normalized_key(&self) -> String {
        names::normalize(&self.full_name())
    }

    /// The member's short code, uppercased; derived from the name parts when
    /// no code is stored.
    pub fn initials(&self) -> String {
        match &self.short_code {
            Some(code) if !code.trim().is_empty() => code.trim().to_uppercase(),
            _ => names::initials_for(&self.given_name, &self.family_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_title_cased() {
        let m = Member::new("adela", "MARTÍNEZ", Gender::Female);
        assert_eq!(m.full_name(), "Adela Martínez");
        assert_eq!(m.display_name(), "Martínez, Adela");
    }

    #[test]
    fn test_initials_prefer_stored_code() {
        let m = Member::new("Adela", "Martínez", Gender::Female).with_short_code("amx");
        assert_eq!(m.initials(), "AMX");
    }

    #[test]
    fn test_initials_derived_when_missing() {
        let m = Member::new("Adela", "Martínez", Gender::Female);
        assert_eq!(m.initials(), "AMX");
    }
}
