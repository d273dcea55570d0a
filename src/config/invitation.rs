//! Invitation configuration

use serde::Deserialize;

use crate::domain::evaluation::validate_prefix;

use super::error::ValidationError;

/// Invitation token settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct InvitationConfig {
    /// Hours a token stays redeemable (default: 14 days)
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,

    /// Prefix of generated codes, e.g. `AHP` in `AHP-7F3K9Q2M`
    #[serde(default = "default_code_prefix")]
    pub code_prefix: String,
}

fn default_token_ttl_hours() -> i64 {
    14 * 24
}

fn default_code_prefix() -> String {
    "AHP".to_string()
}

impl Default for InvitationConfig {
    fn default() -> Self {
        Self {
            token_ttl_hours: default_token_ttl_hours(),
            code_prefix: default_code_prefix(),
        }
    }
}

impl InvitationConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.token_ttl_hours <= 0 {
            return Err(ValidationError::InvalidTokenTtl);
        }
        validate_prefix(&self.code_prefix.to_uppercase())
            .map_err(|e| ValidationError::InvalidCodePrefix(e.to_string()))?;
        Ok(())
    }
}
