//! Invitation tokens and their codes.
//!
//! Format: `PREFIX-SUFFIX` (e.g., `AHP-7F3K9Q2M`)
//!
//! # Validation Rules
//!
//! - PREFIX: 2-10 uppercase ASCII alphanumerics
//! - SUFFIX: 8 uppercase ASCII alphanumerics
//! - Input is trimmed and upper-cased before checking

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use crate::domain::foundation::{EvaluatorId, ProjectId, Timestamp, ValidationError};

pub const MIN_PREFIX_LENGTH: usize = 2;
pub const MAX_PREFIX_LENGTH: usize = 10;
pub const SUFFIX_LENGTH: usize = 8;

/// A validated invitation code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenCode(String);

impl TokenCode {
    /// Parses and normalises a code typed or scanned by an evaluator.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the code is empty or not `PREFIX-SUFFIX`.
    pub fn try_new(code: &str) -> Result<Self, ValidationError> {
        let normalized = code.trim().to_uppercase();
        if normalized.is_empty() {
            return Err(ValidationError::empty_field("invitation_code"));
        }
        let (prefix, suffix) = normalized.split_once('-').ok_or_else(|| {
            ValidationError::invalid_format(
                "invitation_code",
                format!("expected format PREFIX-SUFFIX, got '{}'", normalized),
            )
        })?;
        validate_prefix(prefix)?;
        if suffix.len() != SUFFIX_LENGTH || !is_alphanumeric(suffix) {
            return Err(ValidationError::invalid_format(
                "invitation_code",
                format!("suffix must be {} letters or digits", SUFFIX_LENGTH),
            ));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn prefix(&self) -> &str {
        self.0.split('-').next().unwrap_or_default()
    }
}

/// Checks a code prefix (shared with configuration validation).
pub fn validate_prefix(prefix: &str) -> Result<(), ValidationError> {
    if prefix.len() < MIN_PREFIX_LENGTH || prefix.len() > MAX_PREFIX_LENGTH {
        return Err(ValidationError::out_of_range(
            "invitation_code_prefix_length",
            MIN_PREFIX_LENGTH as i64,
            MAX_PREFIX_LENGTH as i64,
            prefix.len() as i64,
        ));
    }
    if !is_alphanumeric(prefix) {
        return Err(ValidationError::invalid_format(
            "invitation_code_prefix",
            "must contain only letters and digits",
        ));
    }
    Ok(())
}

fn is_alphanumeric(s: &str) -> bool {
    s.chars().all(|c| c.is_ascii_alphanumeric())
}

impl TryFrom<String> for TokenCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(&value)
    }
}

impl From<TokenCode> for String {
    fn from(code: TokenCode) -> Self {
        code.0
    }
}

impl fmt::Display for TokenCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of fresh invitation codes.
pub trait TokenCodeGenerator: Send + Sync {
    fn generate(&self, prefix: &str) -> Result<TokenCode, ValidationError>;
}

/// Codes from the first 8 hex digits of a UUID v4.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomCodeGenerator;

impl TokenCodeGenerator for RandomCodeGenerator {
    fn generate(&self, prefix: &str) -> Result<TokenCode, ValidationError> {
        let hex = Uuid::new_v4().simple().to_string();
        TokenCode::try_new(&format!("{}-{}", prefix, &hex[..SUFFIX_LENGTH]))
    }
}

/// Zero-padded counter codes, reproducible across runs.
#[derive(Debug)]
pub struct SequentialCodeGenerator {
    next: AtomicU64,
}

impl SequentialCodeGenerator {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialCodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenCodeGenerator for SequentialCodeGenerator {
    fn generate(&self, prefix: &str) -> Result<TokenCode, ValidationError> {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        TokenCode::try_new(&format!("{}-{:08}", prefix, n))
    }
}

/// Invitation for one evaluator, or an open one when `evaluator` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvitationToken {
    pub code: TokenCode,
    pub evaluator: Option<EvaluatorId>,
    pub project: ProjectId,
    pub expires_at: Timestamp,
    pub used: bool,
}

impl InvitationToken {
    pub fn issue(
        code: TokenCode,
        project: ProjectId,
        evaluator: Option<EvaluatorId>,
        expires_at: Timestamp,
    ) -> Self {
        Self {
            code,
            evaluator,
            project,
            expires_at,
            used: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.evaluator.is_none()
    }

    /// Expiry is exclusive: a token is still valid at exactly `expires_at`.
    pub fn is_expired(&self, now: &Timestamp) -> bool {
        now.is_after(&self.expires_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_normalised() {
        let code = TokenCode::try_new("  ahp-7f3k9q2m ").unwrap();
        assert_eq!(code.as_str(), "AHP-7F3K9Q2M");
        assert_eq!(code.prefix(), "AHP");
    }

    #[test]
    fn malformed_codes_are_rejected() {
        assert!(TokenCode::try_new("").is_err());
        assert!(TokenCode::try_new("AHP7F3K9Q2M").is_err());
        assert!(TokenCode::try_new("A-7F3K9Q2M").is_err());
        assert!(TokenCode::try_new("AHP-7F3K").is_err());
        assert!(TokenCode::try_new("AHP-7F3K9Q2!").is_err());
        assert!(TokenCode::try_new("AHP-7F3K-9Q2M").is_err());
    }

    #[test]
    fn random_codes_are_valid_and_distinct() {
        let generator = RandomCodeGenerator;
        let a = generator.generate("AHP").unwrap();
        let b = generator.generate("AHP").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.prefix(), "AHP");
    }

    #[test]
    fn sequential_codes_count_up() {
        let generator = SequentialCodeGenerator::new();
        assert!(generator.generate("T").is_err());
        assert_eq!(generator.generate("TEST").unwrap().as_str(), "TEST-00000002");
        assert_eq!(generator.generate("TEST").unwrap().as_str(), "TEST-00000003");
    }

    #[test]
    fn expiry_is_exclusive() {
        let expires = Timestamp::from_unix_secs(1_000);
        let token = InvitationToken::issue(
            TokenCode::try_new("AHP-00000001").unwrap(),
            ProjectId::new(),
            None,
            expires,
        );
        assert!(token.is_open());
        assert!(!token.is_expired(&expires));
        assert!(token.is_expired(&expires.plus_secs(1)));
    }

    #[test]
    fn code_deserialization_validates() {
        let ok: TokenCode = serde_json::from_str("\"ahp-00000001\"").unwrap();
        assert_eq!(ok.as_str(), "AHP-00000001");
        assert!(serde_json::from_str::<TokenCode>("\"nope\"").is_err());
    }
}
