use std::ops::Deref;

use crate::errors::AvailabilityError;

/// A search keyword that is non-empty after trimming.
///
/// The presentation layer should build one of these before triggering a
/// resolution so a blank input can be reported to the user as a warning.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Keyword(String);

impl Keyword {
    /// Trim and validate a raw keyword.
    pub fn parse(raw: &str) -> Result<Self, AvailabilityError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AvailabilityError::EmptyKeyword);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Deref for Keyword {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Keyword {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims() {
        let keyword = Keyword::parse("  ノルウェイの森 ").unwrap();
        assert_eq!(keyword.as_str(), "ノルウェイの森");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!(matches!(
            Keyword::parse(""),
            Err(AvailabilityError::EmptyKeyword)
        ));
        assert!(matches!(
            Keyword::parse(" \t\u{3000}\n"),
            Err(AvailabilityError::EmptyKeyword)
        ));
    }
}
