//! GitHub REST payload shapes and their conversion into domain types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use standards::{
    BranchName, BranchProtection, ProtectionUpdate, RepositoryRef, RepositorySettings,
    RepositorySnapshot, ReviewRequirementsUpdate,
};

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Entry of `GET /orgs/{org}/repos`.
#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryListing {
    pub name: String,
}

/// `GET /repos/{owner}/{repo}`.
#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryPayload {
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub custom_properties: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub settings: RepositorySettings,
}

impl RepositoryPayload {
    pub fn into_snapshot(self, repository: RepositoryRef) -> RepositorySnapshot {
        let custom_properties = self
            .custom_properties
            .into_iter()
            .filter_map(|(name, value)| custom_property_text(value).map(|v| (name, v)))
            .collect();
        RepositorySnapshot {
            repository,
            default_branch: self.default_branch.and_then(BranchName::new),
            archived: self.archived,
            custom_properties,
            settings: self.settings,
        }
    }
}

/// Custom property values are a string, a list of strings, or null.
fn custom_property_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

/// `{"enabled": bool}` wrapper GitHub uses for protection toggles.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct EnabledFlag {
    pub enabled: bool,
}

/// `GET /repos/{owner}/{repo}/branches/{branch}/protection`.
#[derive(Debug, Deserialize)]
pub(crate) struct ProtectionPayload {
    #[serde(default)]
    pub allow_deletions: Option<EnabledFlag>,
    #[serde(default)]
    pub allow_force_pushes: Option<EnabledFlag>,
}

impl From<ProtectionPayload> for BranchProtection {
    fn from(payload: ProtectionPayload) -> Self {
        Self {
            allow_deletions: payload.allow_deletions.map(|f| f.enabled),
            allow_force_pushes: payload.allow_force_pushes.map(|f| f.enabled),
        }
    }
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct ReviewRequirementsBody {
    pub require_code_owner_reviews: bool,
    pub required_approving_review_count: u32,
}

impl From<&ReviewRequirementsUpdate> for ReviewRequirementsBody {
    fn from(update: &ReviewRequirementsUpdate) -> Self {
        Self {
            require_code_owner_reviews: update.require_code_owner_reviews,
            required_approving_review_count: update.required_approving_review_count,
        }
    }
}

/// `PUT /repos/{owner}/{repo}/branches/{branch}/protection`.
///
/// The four top-level keys are mandatory for this endpoint even when null.
#[derive(Debug, Serialize)]
pub(crate) struct ProtectionBody {
    pub required_status_checks: Option<Value>,
    pub enforce_admins: Option<bool>,
    pub required_pull_request_reviews: ReviewRequirementsBody,
    pub restrictions: Option<Value>,
    pub allow_deletions: bool,
    pub allow_force_pushes: bool,
}

impl From<&ProtectionUpdate> for ProtectionBody {
    fn from(update: &ProtectionUpdate) -> Self {
        Self {
            required_status_checks: None,
            enforce_admins: None,
            required_pull_request_reviews: (&update.required_reviews).into(),
            restrictions: None,
            allow_deletions: update.allow_deletions,
            allow_force_pushes: update.allow_force_pushes,
        }
    }
}
