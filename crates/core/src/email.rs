//! Normalized email address value object.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// An email address, normalized at construction.
///
/// Normalization: surrounding whitespace is trimmed and the address is
/// lower-cased, so equality and allow-list membership are case-insensitive by
/// construction. Validation is intentionally shallow (non-empty, contains
/// `@`); real deliverability checks belong to the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(DomainError::validation("email cannot be empty"));
        }
        if !normalized.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Email {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Email {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        let email = Email::new("  Maria.Silva@Sistema.COM ").unwrap();
        assert_eq!(email.as_str(), "maria.silva@sistema.com");
    }

    #[test]
    fn rejects_empty_and_malformed() {
        assert!(Email::new("   ").is_err());
        assert!(Email::new("not-an-email").is_err());
    }

    #[test]
    fn equality_is_case_insensitive_via_normalization() {
        let a = Email::new("Ops@Sistema.com").unwrap();
        let b = Email::new("ops@sistema.com").unwrap();
        assert_eq!(a, b);
    }
}
