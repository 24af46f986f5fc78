//! Reconcilers and the organization run for the GitHub standards enforcer.
//!
//! This crate sequences calls between the policy in the [`standards`] crate
//! and the port traits it defines. It contains no GitHub transport details of
//! its own; the `github` crate supplies those.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.**
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`reconcile`] | Repository and branch-protection reconcilers |
//! | [`policy`] | Which repositories are managed and the standards they are held to |
//! | [`run`] | Per-repository run, organization run, and the audit report |

pub mod policy;
pub mod reconcile;
pub mod run;

#[cfg(test)]
mod testing;

pub use policy::{EnforcementPolicy, DEFAULT_EXCLUDED_REPOSITORIES, DEFAULT_OPT_IN_PROPERTY};
pub use reconcile::{
    check_and_apply_branch_standards, check_and_apply_repository_standards, Reconciliation,
};
pub use run::{
    apply_standards_to_repo, run_organization, AuditReport, AuditRun, RepositoryAudit,
    RepositoryOutcome, RepositorySelection,
};
