//! In-memory GitHub used by the reconciler and run tests.
//!
//! Reads are served from seeded state; writes are recorded and never change
//! that state, so a test sees exactly the calls one run issued.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use standards::{
    Baseline, BranchName, BranchProtection, BranchProtectionAdmin, GithubError,
    OrganizationDirectory, OrganizationName, ProtectionUpdate, RepositoryAdmin, RepositoryName,
    RepositoryRef, RepositorySettings, RepositorySnapshot, RequiredReviews,
    ReviewRequirementsUpdate,
};

pub const ORG: &str = "acme";

pub fn repo_ref(name: &str) -> RepositoryRef {
    RepositoryRef::new(
        OrganizationName::new(ORG).unwrap(),
        RepositoryName::new(name).unwrap(),
    )
}

pub fn branch(name: &str) -> BranchName {
    BranchName::new(name).unwrap()
}

pub fn compliant_settings() -> RepositorySettings {
    RepositorySettings {
        allow_auto_merge: Some(false),
        allow_merge_commit: Some(true),
        allow_rebase_merge: Some(false),
        allow_squash_merge: Some(true),
        allow_update_branch: Some(true),
        delete_branch_on_merge: Some(true),
        has_discussions: Some(true),
        has_issues: Some(true),
        has_projects: Some(false),
        has_wiki: Some(false),
        web_commit_signoff_required: Some(true),
    }
}

/// A managed, compliant repository whose default branch is `main`.
pub fn managed_snapshot(name: &str) -> RepositorySnapshot {
    let mut custom_properties = BTreeMap::new();
    custom_properties.insert("Auto-Apply-Standards".to_string(), "true".to_string());
    RepositorySnapshot {
        repository: repo_ref(name),
        default_branch: Some(branch("main")),
        archived: false,
        custom_properties,
        settings: compliant_settings(),
    }
}

/// Branch state as GitHub would report it. `None` sub-resources answer 404.
#[derive(Debug, Clone)]
pub struct FakeBranch {
    pub protection: Option<BranchProtection>,
    pub reviews: Option<RequiredReviews>,
    pub signatures: Option<bool>,
}

impl FakeBranch {
    pub fn compliant() -> Self {
        Self {
            protection: Some(BranchProtection {
                allow_deletions: Some(false),
                allow_force_pushes: Some(false),
            }),
            reviews: Some(RequiredReviews {
                require_code_owner_reviews: Some(true),
                required_approving_review_count: Some(1),
            }),
            signatures: Some(true),
        }
    }

    pub fn unprotected() -> Self {
        Self {
            protection: None,
            reviews: None,
            signatures: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    EditRepository {
        repo: String,
        baseline: Baseline,
    },
    PutProtection {
        repo: String,
        branch: String,
        update: ProtectionUpdate,
    },
    UpdateRequiredReviews {
        repo: String,
        branch: String,
        update: ReviewRequirementsUpdate,
    },
    AddRequiredSignatures {
        repo: String,
        branch: String,
    },
}

#[derive(Default)]
pub struct FakeGithub {
    repositories: Vec<RepositorySnapshot>,
    branches: BTreeMap<(String, String), FakeBranch>,
    failing_protection: Option<u16>,
    writes: Mutex<Vec<Write>>,
    repository_reads: Mutex<Vec<String>>,
}

impl FakeGithub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repository(mut self, snapshot: RepositorySnapshot) -> Self {
        self.repositories.push(snapshot);
        self
    }

    pub fn with_branch(mut self, repo: &str, branch: &str, state: FakeBranch) -> Self {
        self.branches
            .insert((repo.to_string(), branch.to_string()), state);
        self
    }

    /// Makes every protection lookup fail with `status`.
    pub fn with_failing_protection(mut self, status: u16) -> Self {
        self.failing_protection = Some(status);
        self
    }

    pub fn writes(&self) -> Vec<Write> {
        self.writes.lock().unwrap().clone()
    }

    pub fn repository_reads(&self) -> Vec<String> {
        self.repository_reads.lock().unwrap().clone()
    }

    fn record(&self, write: Write) {
        self.writes.lock().unwrap().push(write);
    }

    fn branch_state(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
    ) -> Result<&FakeBranch, GithubError> {
        self.branches
            .get(&(repo.name.to_string(), branch.to_string()))
            .ok_or_else(|| not_found(format!("{repo}/branches/{branch}")))
    }
}

fn not_found(resource: String) -> GithubError {
    GithubError::NotFound { resource }
}

#[async_trait]
impl OrganizationDirectory for FakeGithub {
    async fn list_repositories(
        &self,
        _org: &OrganizationName,
    ) -> Result<Vec<RepositoryName>, GithubError> {
        Ok(self
            .repositories
            .iter()
            .map(|s| s.repository.name.clone())
            .collect())
    }
}

#[async_trait]
impl RepositoryAdmin for FakeGithub {
    async fn get_repository(
        &self,
        repo: &RepositoryRef,
    ) -> Result<RepositorySnapshot, GithubError> {
        self.repository_reads
            .lock()
            .unwrap()
            .push(repo.name.to_string());
        self.repositories
            .iter()
            .find(|s| s.repository == *repo)
            .cloned()
            .ok_or_else(|| not_found(repo.to_string()))
    }

    async fn edit_repository(
        &self,
        repo: &RepositoryRef,
        baseline: &Baseline,
    ) -> Result<(), GithubError> {
        self.record(Write::EditRepository {
            repo: repo.name.to_string(),
            baseline: baseline.clone(),
        });
        Ok(())
    }

    async fn branch_exists(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
    ) -> Result<bool, GithubError> {
        Ok(self.branch_state(repo, branch).is_ok())
    }
}

#[async_trait]
impl BranchProtectionAdmin for FakeGithub {
    async fn get_protection(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
    ) -> Result<BranchProtection, GithubError> {
        if let Some(status) = self.failing_protection {
            return Err(GithubError::Api {
                status,
                resource: format!("{repo}/branches/{branch}/protection"),
                message: "boom".to_string(),
            });
        }
        self.branch_state(repo, branch)?
            .protection
            .clone()
            .ok_or_else(|| not_found(format!("{repo}/branches/{branch}/protection")))
    }

    async fn put_protection(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
        update: &ProtectionUpdate,
    ) -> Result<(), GithubError> {
        self.record(Write::PutProtection {
            repo: repo.name.to_string(),
            branch: branch.to_string(),
            update: *update,
        });
        Ok(())
    }

    async fn get_required_reviews(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
    ) -> Result<RequiredReviews, GithubError> {
        self.branch_state(repo, branch)?
            .reviews
            .clone()
            .ok_or_else(|| not_found(format!("{repo}/branches/{branch}/reviews")))
    }

    async fn update_required_reviews(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
        update: &ReviewRequirementsUpdate,
    ) -> Result<(), GithubError> {
        self.record(Write::UpdateRequiredReviews {
            repo: repo.name.to_string(),
            branch: branch.to_string(),
            update: *update,
        });
        Ok(())
    }

    async fn get_required_signatures(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
    ) -> Result<bool, GithubError> {
        self.branch_state(repo, branch)?
            .signatures
            .ok_or_else(|| not_found(format!("{repo}/branches/{branch}/signatures")))
    }

    async fn add_required_signatures(
        &self,
        repo: &RepositoryRef,
        branch: &BranchName,
    ) -> Result<(), GithubError> {
        self.record(Write::AddRequiredSignatures {
            repo: repo.name.to_string(),
            branch: branch.to_string(),
        });
        Ok(())
    }
}
