//! Per-repository and organization runs.
//!
//! An organization run walks the selected repositories strictly one after
//! another. Each repository is finished (read, compared, written) before the
//! next is read. The first remote failure aborts the run.

use serde::Serialize;
use standards::{
    AuditRunId, BranchName, BranchProtectionAdmin, Drift, EnforcementMode, GithubApi, GithubError,
    OrganizationName, RepositoryAdmin, RepositoryName, RepositoryRef, Timestamp,
};
use tracing::{info, info_span, instrument, warn, Instrument};

use crate::policy::EnforcementPolicy;
use crate::reconcile::{check_and_apply_branch_standards, check_and_apply_repository_standards};

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What happened to one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RepositoryOutcome {
    /// On the exclusion list; not read.
    Excluded { repository: RepositoryRef },
    /// Archived repositories are read-only and left alone.
    Archived { repository: RepositoryRef },
    /// Did not opt in through the custom property.
    NotManaged { repository: RepositoryRef },
    /// Compared against the baseline (and written, in enforce mode).
    Checked(RepositoryAudit),
}

impl RepositoryOutcome {
    /// The repository this outcome is about.
    pub fn repository(&self) -> &RepositoryRef {
        match self {
            Self::Excluded { repository }
            | Self::Archived { repository }
            | Self::NotManaged { repository } => repository,
            Self::Checked(audit) => &audit.repository,
        }
    }

    /// Returns the audit if the repository was checked and drifted.
    pub fn drifted(&self) -> Option<&RepositoryAudit> {
        match self {
            Self::Checked(audit) if !audit.is_compliant() => Some(audit),
            _ => None,
        }
    }
}

/// Findings for one checked repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryAudit {
    pub repository: RepositoryRef,
    pub default_branch: Option<BranchName>,
    pub repository_drift: Drift,
    /// `None` when the default branch could not be checked.
    pub branch_drift: Option<Drift>,
    /// Whether any write call was issued for this repository.
    pub applied: bool,
    pub warnings: Vec<String>,
}

impl RepositoryAudit {
    /// Returns `true` if neither the repository nor its branch drifted.
    pub fn is_compliant(&self) -> bool {
        self.repository_drift.is_empty()
            && self.branch_drift.as_ref().map_or(true, Drift::is_empty)
    }
}

// ---------------------------------------------------------------------------
// Per-repository run
// ---------------------------------------------------------------------------

/// Reviews one repository and, in enforce mode, brings it to the baseline.
///
/// Excluded repositories are not read at all. Archived and not-opted-in
/// repositories are read once and left untouched. A default branch not named
/// as the policy expects is warned about and still reconciled; a default
/// branch that does not exist is warned about and skipped.
#[instrument(level = "info", skip_all, fields(repository = %repo, %mode))]
pub async fn apply_standards_to_repo<A>(
    api: &A,
    repo: &RepositoryRef,
    policy: &EnforcementPolicy,
    mode: EnforcementMode,
) -> Result<RepositoryOutcome, GithubError>
where
    A: RepositoryAdmin + BranchProtectionAdmin + ?Sized,
{
    if policy.is_excluded(&repo.name) {
        info!("Repository is excluded from standards management");
        return Ok(RepositoryOutcome::Excluded {
            repository: repo.clone(),
        });
    }

    info!("Reviewing repository");
    let snapshot = api.get_repository(repo).await?;

    if snapshot.archived {
        info!("Skipping archived repository");
        return Ok(RepositoryOutcome::Archived {
            repository: repo.clone(),
        });
    }
    if !policy.is_managed(&snapshot) {
        info!(
            property = %policy.opt_in_property,
            "Skipping repository as it is not part of standards management"
        );
        return Ok(RepositoryOutcome::NotManaged {
            repository: repo.clone(),
        });
    }

    info!("Assessing standards");
    let repository_result =
        check_and_apply_repository_standards(api, &snapshot, &policy.repository, mode).await?;

    let mut warnings = Vec::new();
    let mut applied = repository_result.applied;
    let mut branch_drift = None;

    match &snapshot.default_branch {
        None => {
            warn!("Repository has no default branch");
            warnings.push("repository has no default branch".to_string());
        }
        Some(default_branch) => {
            if let Some(expected) = &policy.expected_default_branch {
                if default_branch != expected {
                    warn!(%default_branch, %expected, "Default branch is not the expected name");
                    warnings.push(format!(
                        "default branch is not called {expected} it is: {default_branch}"
                    ));
                }
            }

            if api.branch_exists(repo, default_branch).await? {
                let branch_result = check_and_apply_branch_standards(
                    api,
                    repo,
                    default_branch,
                    &policy.branch,
                    mode,
                )
                .await?;
                applied |= branch_result.applied;
                branch_drift = Some(branch_result.drift);
            } else {
                warn!(%default_branch, "Default branch does not exist");
                warnings.push(format!("there is no branch {default_branch}"));
            }
        }
    }

    Ok(RepositoryOutcome::Checked(RepositoryAudit {
        repository: repo.clone(),
        default_branch: snapshot.default_branch.clone(),
        repository_drift: repository_result.drift,
        branch_drift,
        applied,
        warnings,
    }))
}

// ---------------------------------------------------------------------------
// Organization run
// ---------------------------------------------------------------------------

/// Which repositories of the organization a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositorySelection {
    /// Every repository the organization lists, in API order.
    All,
    /// Exactly these repositories, in this order.
    Named(Vec<RepositoryName>),
}

/// Parameters of one organization run.
#[derive(Debug, Clone)]
pub struct AuditRun {
    pub run_id: AuditRunId,
    pub organization: OrganizationName,
    pub selection: RepositorySelection,
    pub mode: EnforcementMode,
}

impl AuditRun {
    /// Creates a run with a fresh [`AuditRunId`].
    pub fn new(
        organization: OrganizationName,
        selection: RepositorySelection,
        mode: EnforcementMode,
    ) -> Self {
        Self {
            run_id: AuditRunId::new_random(),
            organization,
            selection,
            mode,
        }
    }
}

/// Everything one organization run found and did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub run_id: AuditRunId,
    pub organization: OrganizationName,
    pub mode: EnforcementMode,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    pub outcomes: Vec<RepositoryOutcome>,
}

impl AuditReport {
    /// The checked repositories that drifted, in run order.
    pub fn drifted_repositories(&self) -> Vec<&RepositoryAudit> {
        self.outcomes.iter().filter_map(RepositoryOutcome::drifted).collect()
    }

    /// Number of repositories actually compared against the baseline.
    pub fn checked_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RepositoryOutcome::Checked(_)))
            .count()
    }
}

/// Runs [`apply_standards_to_repo`] over the selected repositories, one at a time.
pub async fn run_organization<A>(
    api: &A,
    run: &AuditRun,
    policy: &EnforcementPolicy,
) -> Result<AuditReport, GithubError>
where
    A: GithubApi + ?Sized,
{
    let span = info_span!(
        "audit_run",
        run_id = %run.run_id,
        organization = %run.organization,
        mode = %run.mode,
    );

    async {
        let started_at = Timestamp::now();

        let names = match &run.selection {
            RepositorySelection::All => api.list_repositories(&run.organization).await?,
            RepositorySelection::Named(names) => names.clone(),
        };
        info!(repositories = names.len(), "Starting standards run");

        let mut outcomes = Vec::with_capacity(names.len());
        for name in names {
            let repo = RepositoryRef::new(run.organization.clone(), name);
            let outcome = apply_standards_to_repo(api, &repo, policy, run.mode).await?;
            outcomes.push(outcome);
        }

        let report = AuditReport {
            run_id: run.run_id,
            organization: run.organization.clone(),
            mode: run.mode,
            started_at,
            finished_at: Timestamp::now(),
            outcomes,
        };
        info!(
            checked = report.checked_count(),
            drifted = report.drifted_repositories().len(),
            "Standards run finished"
        );
        Ok(report)
    }
    .instrument(span)
    .await
}
