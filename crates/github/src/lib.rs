//! GitHub infrastructure adapter for the standards enforcer.
//!
//! Implements the port traits defined in the [`standards`] crate
//! (`OrganizationDirectory`, `RepositoryAdmin`, `BranchProtectionAdmin`) over
//! the GitHub REST API v3 using [`reqwest`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain policy rules.
//! URL building, authentication headers, pagination, payload shapes and the
//! mapping of HTTP statuses to [`standards::GithubError`] live here; the
//! [`standards`] crate never sees them.
//!
//! Calls are not retried and rate limits are not handled: a failed call is
//! returned as-is and aborts the run.

mod adapter;
pub mod client;
mod payloads;

pub use client::{GithubClient, GithubClientConfig, DEFAULT_API_BASE};
