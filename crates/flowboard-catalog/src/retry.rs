//! Retry policy resolution and backoff delay computation.
//!
//! A node type carries at most a *partial* policy on the wire; resolution
//! merges it field-by-field over the defaults. The delay formula is exposed
//! for the execution engine to consume; this core never sleeps or retries
//! anything itself.

use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use flowboard_config::RetryPolicyDoc;

/// Delay-growth function between retry attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffStrategy {
    Fixed,
    Linear,
    Exponential,
}

impl BackoffStrategy {
    /// Case-insensitive parse. Unrecognized strings fall back to
    /// `Exponential` rather than rejecting the document; tightening this
    /// would be a behavior change for existing catalogs.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "fixed" => BackoffStrategy::Fixed,
            "linear" => BackoffStrategy::Linear,
            "exponential" => BackoffStrategy::Exponential,
            other => {
                tracing::warn!(strategy = other, "unrecognized backoff strategy, using exponential");
                BackoffStrategy::Exponential
            }
        }
    }
}

pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 1_000;
pub const DEFAULT_MAX_DELAY_MS: u64 = 30_000;
pub const DEFAULT_BACKOFF_MULTIPLIER: f64 = 2.0;

const DEFAULT_RETRYABLE_KINDS: &[&str] = &[
    "ConnectionError",
    "TimeoutError",
    "ServiceUnavailableError",
    "RateLimitError",
];

const DEFAULT_TERMINAL_KINDS: &[&str] = &[
    "AuthenticationError",
    "ValidationError",
    "FileNotFoundError",
    "PermissionError",
];

/// Fully-resolved retry policy for a node type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_strategy: BackoffStrategy,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
    pub retryable_error_kinds: BTreeSet<String>,
    pub terminal_error_kinds: BTreeSet<String>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_strategy: BackoffStrategy::Exponential,
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            max_delay_ms: DEFAULT_MAX_DELAY_MS,
            backoff_multiplier: DEFAULT_BACKOFF_MULTIPLIER,
            retryable_error_kinds: DEFAULT_RETRYABLE_KINDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            terminal_error_kinds: DEFAULT_TERMINAL_KINDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl RetryPolicy {
    /// Merge partial overrides over the defaults. Each supplied field
    /// independently replaces its default; unset fields keep theirs.
    ///
    /// Invariants restored after the merge: the retryable and terminal
    /// kind sets are disjoint (retryable wins an overlap), and
    /// `initial_delay_ms <= max_delay_ms` (initial is clamped down).
    pub fn resolve(overrides: Option<&RetryPolicyDoc>) -> Self {
        let mut policy = Self::default();

        if let Some(doc) = overrides {
            if let Some(n) = doc.max_retries {
                policy.max_retries = n;
            }
            if let Some(ref raw) = doc.backoff_strategy {
                policy.backoff_strategy = BackoffStrategy::parse_lenient(raw);
            }
            if let Some(ms) = doc.initial_delay {
                policy.initial_delay_ms = ms;
            }
            if let Some(ms) = doc.max_delay {
                policy.max_delay_ms = ms;
            }
            if let Some(ref multiplier) = doc.backoff_multiplier {
                policy.backoff_multiplier =
                    multiplier.as_f64().unwrap_or(DEFAULT_BACKOFF_MULTIPLIER);
            }
            if let Some(ref kinds) = doc.retry_on_errors {
                policy.retryable_error_kinds = kinds.iter().cloned().collect();
            }
            if let Some(ref kinds) = doc.no_retry_on_errors {
                policy.terminal_error_kinds = kinds.iter().cloned().collect();
            }
        }

        let overlap: Vec<String> = policy
            .retryable_error_kinds
            .intersection(&policy.terminal_error_kinds)
            .cloned()
            .collect();
        for kind in overlap {
            tracing::warn!(kind = %kind, "error kind listed as both retryable and terminal, treating as retryable");
            policy.terminal_error_kinds.remove(&kind);
        }

        policy.initial_delay_ms = policy.initial_delay_ms.min(policy.max_delay_ms);
        policy
    }

    /// Delay before retry attempt `n` (1-based). Attempt 0 is treated as 1.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let n = attempt.max(1);
        let millis = match self.backoff_strategy {
            BackoffStrategy::Fixed => self.initial_delay_ms,
            BackoffStrategy::Linear => self
                .initial_delay_ms
                .saturating_mul(u64::from(n))
                .min(self.max_delay_ms),
            BackoffStrategy::Exponential => {
                let raw =
                    self.initial_delay_ms as f64 * self.backoff_multiplier.powi(n as i32 - 1);
                if raw.is_finite() && raw < self.max_delay_ms as f64 {
                    raw as u64
                } else {
                    self.max_delay_ms
                }
            }
        };
        Duration::from_millis(millis)
    }

    pub fn is_retryable_kind(&self, kind: &str) -> bool {
        self.retryable_error_kinds.contains(kind)
    }

    pub fn is_terminal_kind(&self, kind: &str) -> bool {
        self.terminal_error_kinds.contains(kind)
    }
}
