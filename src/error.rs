//! Error types for EKS lifecycle operations
//!
//! Errors are structured with fields to aid debugging in production.
//! Each variant includes contextual information like resource names,
//! HTTP status codes, and underlying causes. Classification predicates
//! (`is_not_found`, `is_already_exists`, `is_retryable`) drive the
//! idempotent-retry and delete-completion logic in the orchestrator.

use std::time::Duration;

use thiserror::Error;

/// Default context value when no specific context is available
pub const UNKNOWN_CONTEXT: &str = "unknown";

/// A single cluster-tag/nodepool-tag conflict
///
/// Produced by tag inheritance when a nodepool carries an explicit tag
/// whose value differs from the mandatory cluster-level value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagConflict {
    /// The conflicting tag key
    pub key: String,
    /// Value set at the cluster level
    pub cluster_value: String,
    /// Value explicitly set on the nodepool
    pub nodepool_value: String,
}

impl std::fmt::Display for TagConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: cluster has {:?}, nodepool has {:?}",
            self.key, self.cluster_value, self.nodepool_value
        )
    }
}

fn fmt_api(message: &str, code: &Option<u16>) -> String {
    match code {
        Some(c) => format!("api error ({c}): {message}"),
        None => format!("api error: {message}"),
    }
}

fn fmt_timeout(operation: &str, waited: &Duration, last_error: &Option<String>) -> String {
    let elapsed = humantime::format_duration(*waited);
    match last_error {
        Some(e) => format!("timed out after {elapsed} waiting for {operation} (last error: {e})"),
        None => format!("timed out after {elapsed} waiting for {operation}"),
    }
}

fn fmt_conflicts(conflicts: &[TagConflict]) -> String {
    let list: Vec<String> = conflicts.iter().map(|c| c.to_string()).collect();
    format!("conflicting tags: {}", list.join("; "))
}

/// Main error type for EKS lifecycle operations
#[derive(Debug, Error)]
pub enum Error {
    /// TMC API returned a non-success status
    #[error("{}", fmt_api(.message, .code))]
    Api {
        /// Server-provided error body (may be empty)
        message: String,
        /// HTTP status code, if the failure carried one
        code: Option<u16>,
    },

    /// HTTP transport failure (connection, TLS, decode)
    #[error("http error: {source}")]
    Http {
        /// The underlying reqwest error
        #[from]
        source: reqwest::Error,
    },

    /// Validation error for desired configuration
    #[error("validation error for {resource}: {message}")]
    Validation {
        /// Resource with invalid configuration
        resource: String,
        /// Description of what's invalid
        message: String,
    },

    /// The remote resource reached a terminal failure phase
    #[error("{resource} failed: {reason}: {message}")]
    Terminal {
        /// Name of the failed resource
        resource: String,
        /// Machine-readable reason from the ready condition
        reason: String,
        /// Human-readable message from the ready condition
        message: String,
    },

    /// Polling budget (attempts or wall clock) exhausted before a
    /// terminal outcome was observed
    #[error("{}", fmt_timeout(.operation, .waited, .last_error))]
    Timeout {
        /// Name of the operation being waited on
        operation: String,
        /// Elapsed time when the budget ran out
        waited: Duration,
        /// Message of the last retryable error seen, if any
        last_error: Option<String>,
    },

    /// Cluster tags conflict with explicit nodepool tags
    #[error("{}", fmt_conflicts(.conflicts))]
    TagConflict {
        /// Every conflicting key with both values
        conflicts: Vec<TagConflict>,
    },

    /// Internal/operational error
    #[error("internal error [{context}]: {message}")]
    Internal {
        /// Description of what failed
        message: String,
        /// Context where the error occurred (e.g., "reconciler", "planner")
        context: String,
    },

    /// A lifecycle operation failed for a specific resource
    #[error("{operation} {resource}: {source}")]
    Lifecycle {
        /// The operation that failed (e.g., "create nodepool")
        operation: String,
        /// Full name of the resource
        resource: String,
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an API error from a status code and server message
    pub fn api(message: impl Into<String>, code: Option<u16>) -> Self {
        Self::Api {
            message: message.into(),
            code,
        }
    }

    /// Create a validation error with the given message
    ///
    /// For simple validation errors without resource context.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            resource: UNKNOWN_CONTEXT.to_string(),
            message: msg.into(),
        }
    }

    /// Create a validation error with resource context
    pub fn validation_for(resource: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation {
            resource: resource.into(),
            message: msg.into(),
        }
    }

    /// Create a terminal-failure error from a ready condition
    pub fn terminal(
        resource: impl Into<String>,
        reason: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::Terminal {
            resource: resource.into(),
            reason: reason.into(),
            message: msg.into(),
        }
    }

    /// Create a timeout error for an exhausted poll budget
    pub fn timeout(operation: impl Into<String>, waited: Duration, last_error: Option<Error>) -> Self {
        Self::Timeout {
            operation: operation.into(),
            waited,
            last_error: last_error.map(|e| e.to_string()),
        }
    }

    /// Create an internal error with context
    pub fn internal(context: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Internal {
            message: msg.into(),
            context: context.into(),
        }
    }

    /// Wrap an error with the operation and resource it occurred on
    pub fn during(
        operation: impl Into<String>,
        resource: impl Into<String>,
        source: Error,
    ) -> Self {
        Self::Lifecycle {
            operation: operation.into(),
            resource: resource.into(),
            source: Box::new(source),
        }
    }

    /// True if the failure means the remote resource does not exist
    ///
    /// Not-found is a meaningful signal, not always a failure: it is the
    /// success terminator for delete polling and a no-op for idempotent
    /// deletes.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Api { code, .. } => *code == Some(404),
            Error::Lifecycle { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// True if the failure means the remote resource already exists
    ///
    /// Tolerated during create as a prior partially-applied apply.
    pub fn is_already_exists(&self) -> bool {
        match self {
            Error::Api { code, .. } => *code == Some(409),
            Error::Lifecycle { source, .. } => source.is_already_exists(),
            _ => false,
        }
    }

    /// Check if this error is retryable
    ///
    /// Transport failures and 5xx responses are transient and retried
    /// until the poll budget is exhausted. Validation, terminal, and
    /// 4xx responses require intervention and stop polling immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Api { code, .. } => match code {
                Some(429) => true,
                Some(c) if (400..500).contains(c) => false,
                _ => true,
            },
            Error::Http { .. } => true,
            Error::Validation { .. } => false,
            Error::Terminal { .. } => false,
            Error::Timeout { .. } => false,
            Error::TagConflict { .. } => false,
            Error::Internal { .. } => true,
            Error::Lifecycle { source, .. } => source.is_retryable(),
        }
    }
}
