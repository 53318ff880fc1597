//! Tagged tool outcomes.
//!
//! Every gateway returns a [`ToolOutcome`] instead of an error. The tag lets
//! callers and tests reason about the result structurally; the message is the
//! exact text the client receives.

use serde::Serialize;

/// Classification of a tool outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutcomeKind {
    Success,
    /// Statement rejected before reaching the connection
    Blocked,
    /// Access to a restricted object refused
    Denied,
    /// Execution, input or I/O failure
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutcome {
    kind: OutcomeKind,
    message: String,
}

impl ToolOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Success, message)
    }

    pub fn blocked(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Blocked, message)
    }

    pub fn denied(message: impl Into<String>) -> Self {
        Self::new(OutcomeKind::Denied, message)
    }

    /// Failure envelope: `prefix` followed by the underlying error text.
    pub fn failed(prefix: &str, error: impl std::fmt::Display) -> Self {
        Self::new(OutcomeKind::Failed, format!("{}{}", prefix, error))
    }

    fn new(kind: OutcomeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        self.kind
    }

    pub fn is_success(&self) -> bool {
        self.kind == OutcomeKind::Success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Collapse into the text sent over the tool boundary.
    pub fn into_text(self) -> String {
        self.message
    }
}

impl std::fmt::Display for ToolOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
