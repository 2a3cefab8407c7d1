//! Document Value Object
//!
//! Tax identifier (CPF/CNPJ). Stored as bare digits; formatting characters
//! are stripped on construction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tax document value object (11-digit CPF or 14-digit CNPJ)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Document(String);

impl Document {
    /// Create a new validated document
    pub fn new(value: impl Into<String>) -> Result<Self, DocumentError> {
        let raw = value.into();
        let digits: String = raw
            .chars()
            .filter(|c| !matches!(c, '.' | '-' | '/' | ' '))
            .collect();

        if digits.is_empty() {
            return Err(DocumentError::Empty);
        }

        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(DocumentError::InvalidCharacter);
        }

        if digits.len() != 11 && digits.len() != 14 {
            return Err(DocumentError::InvalidLength(digits.len()));
        }

        Ok(Self(digits))
    }

    /// Get the document as a string slice (digits only)
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for 14-digit company documents (CNPJ)
    pub fn is_company(&self) -> bool {
        self.0.len() == 14
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Document {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("document cannot be empty")]
    Empty,
    #[error("document must contain only digits")]
    InvalidCharacter,
    #[error("document must have 11 or 14 digits, got {0}")]
    InvalidLength(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_cpf() {
        let doc = Document::new("12345678901").unwrap();
        assert_eq!(doc.as_str(), "12345678901");
        assert!(!doc.is_company());
    }

    #[test]
    fn test_cpf_with_separators() {
        let doc = Document::new("123.456.789-01").unwrap();
        assert_eq!(doc.as_str(), "12345678901");
    }

    #[test]
    fn test_valid_cnpj() {
        let doc = Document::new("12.345.678/0001-95").unwrap();
        assert_eq!(doc.as_str(), "12345678000195");
        assert!(doc.is_company());
    }

    #[test]
    fn test_empty_document() {
        assert!(matches!(Document::new(""), Err(DocumentError::Empty)));
    }

    #[test]
    fn test_invalid_length() {
        assert!(matches!(
            Document::new("12345"),
            Err(DocumentError::InvalidLength(5))
        ));
    }

    #[test]
    fn test_invalid_character() {
        assert!(matches!(
            Document::new("1234567890a"),
            Err(DocumentError::InvalidCharacter)
        ));
    }
}
