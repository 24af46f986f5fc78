//! Repository and branch-protection reconcilers.
//!
//! Both reconcilers follow the same shape: read the live state, compare it to
//! the baseline, and (in [`EnforcementMode::Enforce`]) write the desired state
//! wherever drift was found. All reads happen before any write, so the
//! reported drift always describes the state found at the start of the call.
//!
//! The only remote failure handled here is not-found on the protection
//! lookups, which means "not configured yet". Anything else is returned to the
//! caller untouched.

use serde::Serialize;
use standards::{
    BranchName, BranchProtectionAdmin, BranchStandards, Drift, EnforcementMode, GithubError,
    PropertyName, RepositoryAdmin, RepositoryRef, RepositorySnapshot, RepositoryStandards,
    REQUIRED_SIGNATURES,
};
use tracing::{info, instrument};

/// Result of one reconciler call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// Properties that differ from the baseline, in baseline order.
    pub drift: Drift,
    /// Whether at least one write call was issued.
    pub applied: bool,
}

impl std::fmt::Display for Reconciliation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.drift)
    }
}

/// Compares the repository-level settings of `snapshot` against `standards`.
///
/// On drift in enforce mode, the *full* baseline is written in one bulk edit,
/// not only the drifting properties.
#[instrument(level = "info", skip_all, fields(repository = %snapshot.repository, %mode))]
pub async fn check_and_apply_repository_standards<A>(
    api: &A,
    snapshot: &RepositorySnapshot,
    standards: &RepositoryStandards,
    mode: EnforcementMode,
) -> Result<Reconciliation, GithubError>
where
    A: RepositoryAdmin + ?Sized,
{
    let baseline = standards.baseline();
    let drift = baseline.drift_against(&snapshot.settings);
    if drift.is_empty() {
        return Ok(Reconciliation::default());
    }

    info!(missing = %drift, "Setting repository standards");
    let mut applied = false;
    if mode.mutates() {
        api.edit_repository(&snapshot.repository, &baseline).await?;
        applied = true;
        info!("Repository standards applied");
    }

    Ok(Reconciliation { drift, applied })
}

/// Compares the protection of `branch` against `standards`.
///
/// Checked in three groups, reported in this order:
///
/// 1. Protection toggles. An unprotected branch reports no toggle drift but is
///    still protected in enforce mode.
/// 2. Required reviews. Not configured counts as every review property drifting.
/// 3. Required signatures. Not configured counts as disabled.
///
/// The protection write replaces protection as a whole and carries the desired
/// review requirements, so when it is issued no separate review update is made.
#[instrument(level = "info", skip_all, fields(%repo, %branch, %mode))]
pub async fn check_and_apply_branch_standards<A>(
    api: &A,
    repo: &RepositoryRef,
    branch: &BranchName,
    standards: &BranchStandards,
    mode: EnforcementMode,
) -> Result<Reconciliation, GithubError>
where
    A: BranchProtectionAdmin + ?Sized,
{
    let mut drift = Drift::new();

    let protection_baseline = standards.protection_baseline();
    let needs_protection_write = match api.get_protection(repo, branch).await {
        Ok(protection) => {
            let flags = protection_baseline.drift_against(&protection);
            let any = !flags.is_empty();
            drift.extend(flags);
            any
        }
        Err(e) if e.is_not_found() => {
            info!("Branch is not protected");
            true
        }
        Err(e) => return Err(e),
    };

    let review_baseline = standards.review_baseline();
    let review_drift = match api.get_required_reviews(repo, branch).await {
        Ok(reviews) => review_baseline.drift_against(&reviews),
        Err(e) if e.is_not_found() => review_baseline.all_missing(),
        Err(e) => return Err(e),
    };
    let needs_review_write = !review_drift.is_empty();
    drift.extend(review_drift);

    let signatures_required = match api.get_required_signatures(repo, branch).await {
        Ok(enabled) => enabled,
        Err(e) if e.is_not_found() => false,
        Err(e) => return Err(e),
    };
    let needs_signature_write = standards.required_signatures && !signatures_required;
    if needs_signature_write {
        if let Some(name) = PropertyName::new(REQUIRED_SIGNATURES) {
            drift.push(name);
        }
    }

    if !drift.is_empty() {
        info!(missing = %drift, "Setting branch standards");
    }
    if !mode.mutates() {
        return Ok(Reconciliation {
            drift,
            applied: false,
        });
    }

    let mut applied = false;
    if needs_protection_write {
        api.put_protection(repo, branch, &standards.protection_update())
            .await?;
        applied = true;
        info!("Branch protection applied");
    } else if needs_review_write {
        api.update_required_reviews(repo, branch, &standards.review_update())
            .await?;
        applied = true;
        info!("Required reviews applied");
    }
    if needs_signature_write {
        api.add_required_signatures(repo, branch).await?;
        applied = true;
        info!("Required signatures applied");
    }

    Ok(Reconciliation { drift, applied })
}
