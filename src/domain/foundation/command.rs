//! Command infrastructure for application handlers.
//!
//! Handlers accept a single `CommandMetadata` instead of loose correlation
//! and actor parameters, and copy it onto every event they publish.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EventEnvelope;

/// Metadata context for command handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// Admin or evaluator executing the command.
    pub actor: String,

    /// Links related operations across a single request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
}

impl CommandMetadata {
    /// Creates new command metadata for the given actor.
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            correlation_id: None,
        }
    }

    /// Builder: Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Returns the correlation ID, generating one if absent.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Stamps an outgoing event with this command's context.
    pub fn stamp(&self, envelope: EventEnvelope) -> EventEnvelope {
        envelope
            .with_correlation_id(self.correlation_id())
            .with_actor(self.actor.clone())
    }
}
