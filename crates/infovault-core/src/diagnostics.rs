//! Diagnostic sink for failures that best-effort reads swallow.

use std::sync::Arc;
use tracing::error;

/// Pattern suppressed by default: duplicate-transaction inserts are expected
/// and would otherwise flood the error log.
pub const DEFAULT_SUPPRESSED_PATTERN: &str = "tx_id_UNIQUE";

/// Receives free-text diagnostics.
///
/// Implementations must not block the caller; reporting is fire-and-forget.
pub trait DiagnosticSink: Send + Sync {
    /// Reports a diagnostic message.
    fn report(&self, message: &str);
}

/// Shared handle to a diagnostic sink.
pub type SharedSink = Arc<dyn DiagnosticSink>;

/// Sink that forwards diagnostics to `tracing` at error level.
#[derive(Debug, Clone)]
pub struct TracingSink {
    suppressed: Vec<String>,
}

impl TracingSink {
    /// Creates a sink that suppresses messages containing any of `patterns`.
    #[must_use]
    pub fn new(patterns: Vec<String>) -> Self {
        Self { suppressed: patterns }
    }

    /// Returns true if the message would be dropped.
    #[must_use]
    pub fn is_suppressed(&self, message: &str) -> bool {
        self.suppressed.iter().any(|p| !p.is_empty() && message.contains(p.as_str()))
    }

    /// Wraps the sink for sharing across facades.
    #[must_use]
    pub fn shared(self) -> SharedSink {
        Arc::new(self)
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(vec![DEFAULT_SUPPRESSED_PATTERN.to_string()])
    }
}

impl DiagnosticSink for TracingSink {
    fn report(&self, message: &str) {
        if self.is_suppressed(message) {
            return;
        }
        error!(target: "infovault::diagnostics", "{}", message);
    }
}
