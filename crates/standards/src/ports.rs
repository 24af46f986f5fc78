//! Port traits implemented by the infrastructure layer.
//!
//! The enforcer only ever talks to GitHub through these traits. The `github`
//! crate implements them over the REST API; tests implement them in memory.
//!
//! Every method maps to exactly one remote call. A not-found response is
//! returned as [`GithubError::NotFound`]; callers decide whether that is
//! meaningful.

use async_trait::async_trait;

use crate::types::{
    BranchProtection, ProtectionUpdate, RepositorySnapshot, RequiredReviews,
    ReviewRequirementsUpdate,
};
use crate::{Baseline, BranchName, GithubError, OrganizationName, RepositoryName, RepositoryRef};

/// Organization-level traversal.
#[async_trait]
pub trait OrganizationDirectory: Send + Sync {
    /// Lists the names of every repository in `org`, in API order.
    async fn list_repositories(
        &self,
        org: &OrganizationName,
    ) -> Result<Vec<RepositoryName>, GithubError>;
}

/// Repository-level reads and writes.
#[async_trait]
pub trait RepositoryAdmin: Send + Sync {
    /// Reads the live repository settings, default branch and custom properties.
    async fn get_repository(&self, repo: &RepositoryRef)
        -> Result<RepositorySnapshot, GithubError>;

    /// Writes every property of `baseline` to the repository in one call.
    async fn edit_repository(
        &self,
        repo: &RepositoryRef,
        baseline: &Baseline,
    ) -> Result<(), GithubError>;

    /// Returns `true` if `branch` exists in `repo`.
    async fn branch_exists(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
    ) -> Result<bool, GithubError>;
}

/// Branch-protection reads and writes.
#[async_trait]
pub trait BranchProtectionAdmin: Send + Sync {
    /// Reads the protection toggles. [`GithubError::NotFound`] means the
    /// branch is not protected.
    async fn get_protection(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
    ) -> Result<BranchProtection, GithubError>;

    /// Creates or replaces the branch protection.
    async fn put_protection(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
        update: &ProtectionUpdate,
    ) -> Result<(), GithubError>;

    /// Reads the required pull-request review settings.
    async fn get_required_reviews(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
    ) -> Result<RequiredReviews, GithubError>;

    /// Updates the required pull-request review settings of an existing protection.
    async fn update_required_reviews(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
        update: &ReviewRequirementsUpdate,
    ) -> Result<(), GithubError>;

    /// Returns whether signed commits are required.
    async fn get_required_signatures(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
    ) -> Result<bool, GithubError>;

    /// Requires signed commits on the branch.
    async fn add_required_signatures(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
    ) -> Result<(), GithubError>;
}

/// Everything an organization run needs.
pub trait GithubApi: OrganizationDirectory + RepositoryAdmin + BranchProtectionAdmin {}

impl<T> GithubApi for T where T: OrganizationDirectory + RepositoryAdmin + BranchProtectionAdmin {}
