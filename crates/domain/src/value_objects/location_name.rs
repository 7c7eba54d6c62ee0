//! Location name value object with normalization
//!
//! Location names serve as the canonical lookup key for tracked locations,
//! so the same normalization must run on every read and write path: lookups
//! stay consistent regardless of caller casing and whitespace.
//!
//! # Examples
//!
//! ```
//! use domain::LocationName;
//!
//! let name = LocationName::new("  new   york ").unwrap();
//! assert_eq!(name.as_str(), "New York");
//!
//! // Casing variants normalize to the same key
//! assert_eq!(
//!     LocationName::new("PARIS").unwrap(),
//!     LocationName::new("paris").unwrap()
//! );
//!
//! // Empty names are rejected
//! assert!(LocationName::new("   ").is_err());
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Maximum accepted name length in characters
const MAX_LENGTH: usize = 255;

/// A normalized location name, unique across tracked locations
///
/// Normalization trims the input, collapses internal whitespace runs to a
/// single space, and title-cases each alphabetic run (`"saint-denis"`
/// becomes `"Saint-Denis"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LocationName(String);

impl LocationName {
    /// Create a normalized location name
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty after trimming or longer than
    /// 255 characters.
    pub fn new(name: impl AsRef<str>) -> Result<Self, DomainError> {
        let normalized = Self::normalize(name.as_ref());

        if normalized.is_empty() {
            return Err(DomainError::InvalidLocationName(
                "name must not be empty".to_string(),
            ));
        }
        if normalized.chars().count() > MAX_LENGTH {
            return Err(DomainError::InvalidLocationName(format!(
                "name must be at most {MAX_LENGTH} characters"
            )));
        }

        Ok(Self(normalized))
    }

    /// Get the normalized name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn normalize(raw: &str) -> String {
        let mut normalized = String::with_capacity(raw.len());
        let mut prev_alphabetic = false;

        for word in raw.split_whitespace() {
            if !normalized.is_empty() {
                normalized.push(' ');
                prev_alphabetic = false;
            }
            for ch in word.chars() {
                if ch.is_alphabetic() {
                    if prev_alphabetic {
                        normalized.extend(ch.to_lowercase());
                    } else {
                        normalized.extend(ch.to_uppercase());
                    }
                    prev_alphabetic = true;
                } else {
                    normalized.push(ch);
                    prev_alphabetic = false;
                }
            }
        }

        normalized
    }
}

impl fmt::Display for LocationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for LocationName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for LocationName {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Custom deserialization that re-applies normalization
impl<'de> Deserialize<'de> for LocationName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_name_is_title_cased() {
        let name = LocationName::new("paris").unwrap();
        assert_eq!(name.as_str(), "Paris");
    }

    #[test]
    fn casing_variants_normalize_to_same_key() {
        let lower = LocationName::new("paris").unwrap();
        let upper = LocationName::new("PARIS").unwrap();
        let padded = LocationName::new(" Paris ").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower, padded);
    }

    #[test]
    fn internal_whitespace_is_collapsed() {
        let name = LocationName::new("  new   york ").unwrap();
        assert_eq!(name.as_str(), "New York");
    }

    #[test]
    fn hyphenated_name_title_cases_each_part() {
        let name = LocationName::new("saint-denis").unwrap();
        assert_eq!(name.as_str(), "Saint-Denis");
    }

    #[test]
    fn apostrophe_starts_new_alphabetic_run() {
        let name = LocationName::new("l'aquila").unwrap();
        assert_eq!(name.as_str(), "L'Aquila");
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(LocationName::new("").is_err());
        assert!(LocationName::new("   ").is_err());
    }

    #[test]
    fn overlong_name_is_rejected() {
        let long = "x".repeat(256);
        assert!(LocationName::new(&long).is_err());
        let ok = "x".repeat(255);
        assert!(LocationName::new(&ok).is_ok());
    }

    #[test]
    fn display_matches_normalized_form() {
        let name = LocationName::new("sAn fRanCisco").unwrap();
        assert_eq!(name.to_string(), "San Francisco");
    }

    #[test]
    fn try_from_str() {
        let name: LocationName = "berlin".try_into().unwrap();
        assert_eq!(name.as_str(), "Berlin");
    }

    #[test]
    fn deserialization_normalizes() {
        let name: LocationName = serde_json::from_str("\" pARis \"").unwrap();
        assert_eq!(name.as_str(), "Paris");
    }

    #[test]
    fn deserialization_rejects_empty() {
        let result: Result<LocationName, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }

    #[test]
    fn serialization_is_plain_string() {
        let name = LocationName::new("Paris").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"Paris\"");
    }

    #[test]
    fn hash_matches_equality() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(LocationName::new("paris").unwrap());
        set.insert(LocationName::new("PARIS").unwrap());
        assert_eq!(set.len(), 1);
    }
}
