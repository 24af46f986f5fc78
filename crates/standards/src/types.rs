//! Shared value types for the GitHub standards domain.
//!
//! Observed state types mirror the subset of GitHub REST fields the enforcer
//! compares. Every observed field is an `Option`: GitHub omits some of them
//! (for example `allow_auto_merge`) when the token lacks admin scope, and an
//! omitted field never matches the baseline.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BranchName, PropertyName, RepositoryRef};

// ---------------------------------------------------------------------------
// Setting values
// ---------------------------------------------------------------------------

/// A single comparable setting value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// A boolean toggle (`has_wiki`, `allow_force_pushes`, ...).
    Flag(bool),
    /// A non-negative count (`required_approving_review_count`).
    Count(u32),
}

impl std::fmt::Display for SettingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Flag(v) => write!(f, "{v}"),
            Self::Count(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<u32> for SettingValue {
    fn from(value: u32) -> Self {
        Self::Count(value)
    }
}

/// Read access to observed state by property name.
///
/// Returns `None` when the live state does not carry the property at all.
pub trait ObservedSettings {
    /// Returns the live value of `property`, if present.
    fn observed(&self, property: &str) -> Option<SettingValue>;
}

// ---------------------------------------------------------------------------
// Drift
// ---------------------------------------------------------------------------

/// Ordered list of property names whose live value differs from the baseline.
///
/// Displays as the comma-joined names with no spaces; an empty drift displays
/// as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Drift(Vec<PropertyName>);

impl Drift {
    /// Creates an empty drift.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a drifting property, keeping insertion order.
    pub fn push(&mut self, property: PropertyName) {
        self.0.push(property);
    }

    /// Appends every property of `other` after the current ones.
    pub fn extend(&mut self, other: Drift) {
        self.0.extend(other.0);
    }

    /// Returns `true` if nothing drifted.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of drifting properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if `property` is among the drifting properties.
    pub fn contains(&self, property: &str) -> bool {
        self.0.iter().any(|p| p.as_str() == property)
    }
}

impl std::fmt::Display for Drift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, property) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(property.as_str())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Enforcement mode
// ---------------------------------------------------------------------------

/// Whether a run mutates repositories or only reports drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforcementMode {
    /// Compute and report drift; issue no write calls.
    ReportOnly,
    /// Compute drift and write the baseline wherever drift was found.
    Enforce,
}

impl EnforcementMode {
    /// Returns `true` if write calls may be issued.
    pub fn mutates(self) -> bool {
        matches!(self, Self::Enforce)
    }
}

impl std::fmt::Display for EnforcementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReportOnly => f.write_str("report-only"),
            Self::Enforce => f.write_str("enforce"),
        }
    }
}

// ---------------------------------------------------------------------------
// Observed repository state
// ---------------------------------------------------------------------------

/// Live repository-level settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(default)]
    pub allow_auto_merge: Option<bool>,
    #[serde(default)]
    pub allow_merge_commit: Option<bool>,
    #[serde(default)]
    pub allow_rebase_merge: Option<bool>,
    #[serde(default)]
    pub allow_squash_merge: Option<bool>,
    #[serde(default)]
    pub allow_update_branch: Option<bool>,
    #[serde(default)]
    pub delete_branch_on_merge: Option<bool>,
    #[serde(default)]
    pub has_discussions: Option<bool>,
    #[serde(default)]
    pub has_issues: Option<bool>,
    #[serde(default)]
    pub has_projects: Option<bool>,
    #[serde(default)]
    pub has_wiki: Option<bool>,
    #[serde(default)]
    pub web_commit_signoff_required: Option<bool>,
}

impl ObservedSettings for RepositorySettings {
    fn observed(&self, property: &str) -> Option<SettingValue> {
        let value = match property {
            "allow_auto_merge" => self.allow_auto_merge,
            "allow_merge_commit" => self.allow_merge_commit,
            "allow_rebase_merge" => self.allow_rebase_merge,
            "allow_squash_merge" => self.allow_squash_merge,
            "allow_update_branch" => self.allow_update_branch,
            "delete_branch_on_merge" => self.delete_branch_on_merge,
            "has_discussions" => self.has_discussions,
            "has_issues" => self.has_issues,
            "has_projects" => self.has_projects,
            "has_wiki" => self.has_wiki,
            "web_commit_signoff_required" => self.web_commit_signoff_required,
            _ => None,
        };
        value.map(SettingValue::Flag)
    }
}

/// A repository as returned by the single-repository lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySnapshot {
    /// Owner and name.
    pub repository: RepositoryRef,
    /// The default branch; `None` for an empty repository.
    pub default_branch: Option<BranchName>,
    /// Whether the repository is archived (read-only).
    pub archived: bool,
    /// Custom property values, keyed by property name.
    ///
    /// Multi-valued properties are joined with `,`; properties with no value
    /// are absent.
    pub custom_properties: BTreeMap<String, String>,
    /// Live repository-level settings.
    pub settings: RepositorySettings,
}

impl RepositorySnapshot {
    /// Returns the value of custom property `name`, if set.
    pub fn custom_property(&self, name: &str) -> Option<&str> {
        self.custom_properties.get(name).map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Observed branch state
// ---------------------------------------------------------------------------

/// Live branch-protection toggles.
///
/// GitHub reports each toggle as `{"enabled": bool}`; the adapter flattens
/// them to plain booleans.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchProtection {
    pub allow_deletions: Option<bool>,
    pub allow_force_pushes: Option<bool>,
}

impl ObservedSettings for BranchProtection {
    fn observed(&self, property: &str) -> Option<SettingValue> {
        match property {
            "allow_deletions" => self.allow_deletions.map(SettingValue::Flag),
            "allow_force_pushes" => self.allow_force_pushes.map(SettingValue::Flag),
            _ => None,
        }
    }
}

/// Live required pull-request review settings of a protected branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredReviews {
    #[serde(default)]
    pub require_code_owner_reviews: Option<bool>,
    #[serde(default)]
    pub required_approving_review_count: Option<u32>,
}

impl ObservedSettings for RequiredReviews {
    fn observed(&self, property: &str) -> Option<SettingValue> {
        match property {
            "require_code_owner_reviews" => self.require_code_owner_reviews.map(SettingValue::Flag),
            "required_approving_review_count" => self
                .required_approving_review_count
                .map(SettingValue::Count),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Desired branch writes
// ---------------------------------------------------------------------------

/// Desired pull-request review requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewRequirementsUpdate {
    pub require_code_owner_reviews: bool,
    pub required_approving_review_count: u32,
}

/// A full branch-protection write.
///
/// Writing protection replaces it as a whole, so the write always carries the
/// desired review requirements alongside the toggles. Status checks, admin
/// enforcement and push restrictions are left unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionUpdate {
    pub allow_deletions: bool,
    pub allow_force_pushes: bool,
    pub required_reviews: ReviewRequirementsUpdate,
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns the current UTC time as a [`Timestamp`].
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}
