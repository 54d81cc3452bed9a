//! Identifier validation shared by the store and API crates.
//!
//! Document identifiers are opaque strings assigned by the database. Before an
//! identifier taken from a request path is used to address a document it must
//! satisfy the document-ID rules of the backing store.

use thiserror::Error;

/// Maximum document ID length in bytes.
pub const MAX_DOCUMENT_ID_BYTES: usize = 1500;

/// Errors that can occur while validating a document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// Identifier is empty or whitespace
    #[error("identifier must not be empty")]
    Empty,
    /// Identifier exceeds the store's size limit
    #[error("identifier exceeds {MAX_DOCUMENT_ID_BYTES} bytes")]
    TooLong,
    /// Identifier contains a path separator or is a relative path segment
    #[error("identifier contains invalid characters: {0}")]
    InvalidCharacters(String),
}

/// Result type for identifier validation.
pub type IdResult<T> = Result<T, IdError>;

/// Validate a document identifier.
///
/// Rejects empty identifiers, identifiers longer than 1500 bytes, identifiers
/// containing `/`, and the relative segments `.` and `..`.
pub fn validate_document_id(id: &str) -> IdResult<&str> {
    if id.trim().is_empty() {
        return Err(IdError::Empty);
    }
    if id.len() > MAX_DOCUMENT_ID_BYTES {
        return Err(IdError::TooLong);
    }
    if id.contains('/') || id == "." || id == ".." {
        return Err(IdError::InvalidCharacters(id.to_string()));
    }
    // Reserved by Firestore for internal documents.
    if id.starts_with("__") && id.ends_with("__") {
        return Err(IdError::InvalidCharacters(id.to_string()));
    }
    Ok(id)
}

/// Extract the document ID (last path segment) from a full resource name.
pub fn document_id_from_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_store_generated_ids() {
        assert!(validate_document_id("Qk3v9cX0aB2LmN7pR4sT").is_ok());
        assert!(validate_document_id("6650a1f2e4b0c8a1d2f3e4b5").is_ok());
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(validate_document_id(""), Err(IdError::Empty));
        assert_eq!(validate_document_id("   "), Err(IdError::Empty));
    }

    #[test]
    fn test_rejects_path_segments() {
        assert!(matches!(
            validate_document_id("jobs/abc"),
            Err(IdError::InvalidCharacters(_))
        ));
        assert!(validate_document_id(".").is_err());
        assert!(validate_document_id("..").is_err());
        assert!(validate_document_id("__name__").is_err());
    }

    #[test]
    fn test_rejects_oversized() {
        let long = "a".repeat(MAX_DOCUMENT_ID_BYTES + 1);
        assert_eq!(validate_document_id(&long), Err(IdError::TooLong));
    }

    #[test]
    fn test_document_id_from_name() {
        assert_eq!(
            document_id_from_name("projects/p/databases/(default)/documents/jobs/abc123"),
            "abc123"
        );
        assert_eq!(document_id_from_name("abc123"), "abc123");
    }
}
