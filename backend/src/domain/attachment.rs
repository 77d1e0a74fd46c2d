//! Opaque file tokens attached to complaints.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Error;

/// Upper bound on attachments accepted with a single submission.
pub const MAX_ATTACHMENTS: usize = 5;

/// Validation errors for [`AttachmentToken`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentTokenError {
    Empty,
    PathSeparator,
    ParentReference,
}

impl fmt::Display for AttachmentTokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "attachment token must not be empty"),
            Self::PathSeparator => write!(f, "attachment token must be a bare file name"),
            Self::ParentReference => write!(f, "attachment token must not reference a parent"),
        }
    }
}

impl std::error::Error for AttachmentTokenError {}

impl From<AttachmentTokenError> for Error {
    fn from(value: AttachmentTokenError) -> Self {
        Error::invalid_request(value.to_string())
    }
}

/// Stored file reference, resolvable to bytes by the file store.
///
/// Tokens are bare file names. Anything that could address outside the
/// uploads directory is rejected at construction.
///
/// # Examples
/// ```
/// use grievance::domain::AttachmentToken;
///
/// assert!(AttachmentToken::new("1712.jpg").is_ok());
/// assert!(AttachmentToken::new("../etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AttachmentToken(String);

impl AttachmentToken {
    pub fn new(raw: impl Into<String>) -> Result<Self, AttachmentTokenError> {
        let raw = raw.into();
        let token = raw.trim();
        if token.is_empty() {
            return Err(AttachmentTokenError::Empty);
        }
        if token.contains(['/', '\\']) {
            return Err(AttachmentTokenError::PathSeparator);
        }
        if token == "." || token == ".." {
            return Err(AttachmentTokenError::ParentReference);
        }
        Ok(Self(token.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttachmentToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AttachmentToken {
    type Error = AttachmentTokenError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AttachmentToken> for String {
    fn from(value: AttachmentToken) -> Self {
        value.0
    }
}

/// An attachment whose bytes were resolved for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAttachment {
    pub token: AttachmentToken,
    pub content: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", AttachmentTokenError::Empty)]
    #[case("   ", AttachmentTokenError::Empty)]
    #[case("a/b.png", AttachmentTokenError::PathSeparator)]
    #[case("a\\b.png", AttachmentTokenError::PathSeparator)]
    #[case("..", AttachmentTokenError::ParentReference)]
    fn rejects_unsafe_tokens(#[case] raw: &str, #[case] expected: AttachmentTokenError) {
        assert_eq!(AttachmentToken::new(raw), Err(expected));
    }

    #[rstest]
    fn trims_surrounding_whitespace() {
        let token = AttachmentToken::new(" 1700000000-scan.pdf ").expect("valid token");
        assert_eq!(token.as_str(), "1700000000-scan.pdf");
    }

    #[rstest]
    fn deserialises_through_validation() {
        let parsed: Result<AttachmentToken, _> = serde_json::from_str("\"../x\"");
        assert!(parsed.is_err());
    }
}
