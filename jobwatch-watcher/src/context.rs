//! Correlation scope for a watched run
//!
//! A scope supplies the context id that makes the job name stable across
//! retries of the same invocation, and tracks whether the run completed.
//! The closing log line comes from `Drop`, so it is emitted on every exit
//! path, including early returns through `?` and panics.

use std::time::Instant;
use tracing::{Span, info, info_span, warn};
use uuid::Uuid;

/// Environment variable consulted when no explicit context id is given
pub const CONTEXT_ID_ENV: &str = "JOBWATCH_CONTEXT_ID";

/// Guard for one correlation scope
pub struct CorrelationScope {
    context_id: String,
    span: Span,
    opened_at: Instant,
    completed: bool,
}

impl CorrelationScope {
    /// Opens a scope
    ///
    /// The context id is `explicit` when non-blank, else the value of
    /// `JOBWATCH_CONTEXT_ID`, else a fresh UUID.
    pub fn begin(explicit: Option<String>) -> Self {
        let context_id = resolve_context_id(explicit, std::env::var(CONTEXT_ID_ENV).ok());
        let span = info_span!("correlation", context_id = %context_id);
        span.in_scope(|| info!("Opened correlation scope"));

        Self {
            context_id,
            span,
            opened_at: Instant::now(),
            completed: false,
        }
    }

    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    /// Span to instrument work done inside the scope
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Closes the scope as successful
    pub fn complete(mut self) {
        self.completed = true;
    }
}

impl Drop for CorrelationScope {
    fn drop(&mut self) {
        let elapsed = self.opened_at.elapsed();
        self.span.in_scope(|| {
            if self.completed {
                info!("Closed correlation scope after {:?}", elapsed);
            } else {
                warn!("Correlation scope closed without completing after {:?}", elapsed);
            }
        });
    }
}

fn resolve_context_id(explicit: Option<String>, from_env: Option<String>) -> String {
    explicit
        .filter(|id| !id.trim().is_empty())
        .or_else(|| from_env.filter(|id| !id.trim().is_empty()))
        .map(|id| id.trim().to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_explicit_id() {
        assert_eq!(
            resolve_context_id(Some("ctx-1".into()), Some("env-ctx".into())),
            "ctx-1"
        );
        assert_eq!(
            resolve_context_id(Some("  ".into()), Some("env-ctx".into())),
            "env-ctx"
        );
    }

    #[test]
    fn test_resolve_generates_uuid_as_last_resort() {
        let id = resolve_context_id(None, Some(String::new()));
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_begin_with_explicit_id() {
        let scope = CorrelationScope::begin(Some("ctx-1".into()));
        assert_eq!(scope.context_id(), "ctx-1");
    }
}
