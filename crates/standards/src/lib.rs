//! Core domain for the GitHub standards enforcer.
//!
//! This crate contains the organization baseline, the drift computation, every
//! newtype identifier and value type, the error types, and the port traits the
//! GitHub adapter implements. Infrastructure crates implement the traits
//! defined here; they never add policy rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is compared and written; infrastructure crates define
//! *how* to read and write it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`RepositoryName`, `BranchName`, `AuditRunId`, etc.) |
//! | [`types`] | Observed state, desired writes, [`Drift`], [`EnforcementMode`] |
//! | [`baseline`] | The enforced policy and drift computation |
//! | [`ports`] | Traits implemented by the GitHub adapter |
//! | [`errors`] | [`GithubError`] and [`StandardsError`] |

pub mod baseline;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use baseline::{Baseline, BranchStandards, RepositoryStandards, REQUIRED_SIGNATURES};
pub use errors::{GithubError, StandardsError};
pub use identifiers::{
    AuditRunId, BranchName, CustomPropertyName, OrganizationName, PropertyName, RepositoryName,
    RepositoryRef,
};
pub use ports::{BranchProtectionAdmin, GithubApi, OrganizationDirectory, RepositoryAdmin};
pub use types::{
    BranchProtection, Drift, EnforcementMode, ObservedSettings, ProtectionUpdate,
    RepositorySettings, RepositorySnapshot, RequiredReviews, ReviewRequirementsUpdate,
    SettingValue, Timestamp,
};
