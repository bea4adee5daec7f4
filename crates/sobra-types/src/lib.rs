//! # Sobra Types
//!
//! Small validated primitives shared by the registration crates.
//!
//! - [`NonEmptyText`] for values that are meaningless when blank (configuration values,
//!   group labels, attachment names).
//! - [`GroupId`] for the backend identifier of a registration group.

use std::fmt;
use std::str::FromStr;

/// Errors that can occur when creating validated types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input was not a valid group identifier
    #[error("invalid group identifier: {0:?}")]
    InvalidGroupId(String),
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// Returns `Err(TextError::Empty)` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for NonEmptyText {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Backend identifier of a registration group.
///
/// The backend sends it as a JSON number; the registration form sends it back as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct GroupId(u64);

impl GroupId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GroupId {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| TextError::InvalidGroupId(s.to_owned()))
    }
}

impl From<u64> for GroupId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Centro  ").unwrap();
        assert_eq!(text.as_str(), "Centro");
        assert_eq!(text.to_string(), "Centro");
    }

    #[test]
    fn test_non_empty_text_rejects_blank() {
        assert_eq!(NonEmptyText::new("").unwrap_err(), TextError::Empty);
        assert_eq!(NonEmptyText::new(" \t\n").unwrap_err(), TextError::Empty);
    }

    #[test]
    fn test_non_empty_text_deserialize_rejects_blank() {
        let err = serde_json::from_str::<NonEmptyText>("\"   \"").expect_err("blank should fail");
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_group_id_parses_and_displays() {
        let id: GroupId = " 42 ".parse().unwrap();
        assert_eq!(id, GroupId::new(42));
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_group_id_rejects_non_numeric() {
        let err = "abc".parse::<GroupId>().unwrap_err();
        assert_eq!(err, TextError::InvalidGroupId("abc".into()));
    }

    #[test]
    fn test_group_id_json_is_a_number() {
        let id: GroupId = serde_json::from_str("7").unwrap();
        assert_eq!(id.get(), 7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }
}
