//! Citation source types and reliability bounds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const MIN_RELIABILITY: i32 = 1;
pub const MAX_RELIABILITY: i32 = 5;
pub const DEFAULT_RELIABILITY: i32 = 3;
pub const DEFAULT_COUNTRY: &str = "Yemen";
pub const DEFAULT_LANGUAGE: &str = "ar";

pub const VALID_SOURCE_TYPES: &[&str] = &[
    "government",
    "academic",
    "news",
    "book",
    "website",
    "archive",
    "other",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Government,
    Academic,
    News,
    Book,
    #[default]
    Website,
    Archive,
    Other,
}

impl SourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::Government => "government",
            SourceType::Academic => "academic",
            SourceType::News => "news",
            SourceType::Book => "book",
            SourceType::Website => "website",
            SourceType::Archive => "archive",
            SourceType::Other => "other",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "government" => Ok(SourceType::Government),
            "academic" => Ok(SourceType::Academic),
            "news" => Ok(SourceType::News),
            "book" => Ok(SourceType::Book),
            "website" => Ok(SourceType::Website),
            "archive" => Ok(SourceType::Archive),
            "other" => Ok(SourceType::Other),
            other => Err(CoreError::Validation(format!(
                "نوع مصدر غير صالح '{other}'. الأنواع المتاحة: {}",
                VALID_SOURCE_TYPES.join(", ")
            ))),
        }
    }
}

/// Reliability is a 1..=5 rating.
pub fn validate_reliability(value: i32) -> Result<(), CoreError> {
    if !(MIN_RELIABILITY..=MAX_RELIABILITY).contains(&value) {
        return Err(CoreError::Validation(format!(
            "يجب أن تكون الموثوقية بين {MIN_RELIABILITY} و {MAX_RELIABILITY}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reliability_bounds() {
        assert!(validate_reliability(MIN_RELIABILITY).is_ok());
        assert!(validate_reliability(MAX_RELIABILITY).is_ok());
        assert!(validate_reliability(0).is_err());
        assert!(validate_reliability(6).is_err());
    }

    #[test]
    fn every_listed_type_parses() {
        for name in VALID_SOURCE_TYPES {
            assert_eq!(name.parse::<SourceType>().unwrap().as_str(), *name);
        }
        assert!("blog".parse::<SourceType>().is_err());
    }
}
