//! Error types for the GitHub standards domain.
//!
//! [`GithubError`] is the error every port trait in [`crate::ports`] returns.
//! Exactly one condition is ever inspected by the reconcilers: a not-found
//! response, which means "not configured yet" for branch protection and its
//! sub-resources. Every other variant propagates to the caller and aborts
//! the run.
//!
//! [`StandardsError`] covers run-level failures surfaced to the binary.

use thiserror::Error;

// ---------------------------------------------------------------------------
// Remote API errors
// ---------------------------------------------------------------------------

/// Failure of a single call against the source-hosting API.
#[derive(Debug, Error)]
pub enum GithubError {
    /// The requested resource does not exist (HTTP 404).
    ///
    /// For the protection lookups this is the "not configured" signal, not a
    /// failure.
    #[error("Not found: {resource}")]
    NotFound {
        /// Request path or description of the missing resource.
        resource: String,
    },

    /// The API answered with a non-success status other than 404.
    #[error("GitHub API returned {status} for {resource}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Request path the status was returned for.
        resource: String,
        /// The `message` field of the error body, or the raw body.
        message: String,
    },

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("Transport failure calling {resource}: {message}")]
    Transport {
        /// Request path that was being called.
        resource: String,
        /// Underlying error description.
        message: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Could not decode response from {resource}: {message}")]
    Decode {
        /// Request path whose response failed to decode.
        resource: String,
        /// Underlying error description.
        message: String,
    },

    /// The request could not be built (e.g. a token with invalid header characters).
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of the problem.
        message: String,
    },
}

impl GithubError {
    /// Returns `true` for the not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ---------------------------------------------------------------------------
// Run-level errors
// ---------------------------------------------------------------------------

/// Errors that abort an audit run.
#[derive(Debug, Error)]
pub enum StandardsError {
    /// A remote call failed with anything other than the tolerated not-found.
    #[error(transparent)]
    Github(#[from] GithubError),

    /// The run configuration is invalid.
    ///
    /// Produced at start-up; no remote call is made with an invalid config.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}
