//! The declared baseline and drift computation.
//!
//! A [`Baseline`] is an ordered, immutable list of `(property, desired value)`
//! pairs. Drift is computed by walking the baseline in order and comparing each
//! desired value with the observed one; the order of the resulting [`Drift`]
//! is therefore always the baseline's order.
//!
//! [`RepositoryStandards`] and [`BranchStandards`] are the typed forms of the
//! organization policy. Their `Default` impls are the enforced values.

use serde_json::{Map, Value};

use crate::types::{ObservedSettings, ProtectionUpdate, ReviewRequirementsUpdate};
use crate::{Drift, PropertyName, SettingValue};

// ---------------------------------------------------------------------------
// Generic baseline
// ---------------------------------------------------------------------------

/// Ordered mapping from property name to desired value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Baseline {
    entries: Vec<(PropertyName, SettingValue)>,
}

impl Baseline {
    /// Builds a baseline from `(name, value)` pairs, preserving their order.
    ///
    /// Pairs with an empty name are dropped.
    pub fn new<I, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, V)>,
        V: Into<SettingValue>,
    {
        let entries = entries
            .into_iter()
            .filter_map(|(name, value)| PropertyName::new(name).map(|p| (p, value.into())))
            .collect();
        Self { entries }
    }

    /// Iterates over the entries in baseline order.
    pub fn entries(&self) -> impl Iterator<Item = (&PropertyName, SettingValue)> {
        self.entries.iter().map(|(p, v)| (p, *v))
    }

    /// Returns the desired value for `property`.
    pub fn get(&self, property: &str) -> Option<SettingValue> {
        self.entries
            .iter()
            .find(|(p, _)| p.as_str() == property)
            .map(|(_, v)| *v)
    }

    /// Compares `observed` against every entry and returns the drifting
    /// properties in baseline order.
    ///
    /// A property missing from `observed` counts as drift.
    pub fn drift_against(&self, observed: &impl ObservedSettings) -> Drift {
        let mut drift = Drift::new();
        for (property, desired) in self.entries() {
            let live = observed.observed(property.as_str());
            if live != Some(desired) {
                tracing::info!(
                    property = %property,
                    desired = %desired,
                    live = ?live,
                    "Property is not set to its standard value"
                );
                drift.push(property.clone());
            }
        }
        drift
    }

    /// Every property reported as drift, in baseline order.
    ///
    /// Used when the observed state does not exist at all.
    pub fn all_missing(&self) -> Drift {
        let mut drift = Drift::new();
        for (property, _) in self.entries() {
            drift.push(property.clone());
        }
        drift
    }

    /// Renders the full baseline as a JSON object (`{"has_wiki": false, ...}`).
    ///
    /// This is the body of a bulk edit: every baseline property is written,
    /// not only the drifting ones.
    pub fn to_json_object(&self) -> Map<String, Value> {
        self.entries()
            .map(|(property, value)| {
                let json = match value {
                    SettingValue::Flag(b) => Value::Bool(b),
                    SettingValue::Count(n) => Value::from(n),
                };
                (property.as_str().to_string(), json)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Repository policy
// ---------------------------------------------------------------------------

/// Repository-level settings enforced across the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryStandards {
    pub allow_auto_merge: bool,
    pub allow_merge_commit: bool,
    pub allow_rebase_merge: bool,
    pub allow_squash_merge: bool,
    pub allow_update_branch: bool,
    pub delete_branch_on_merge: bool,
    pub has_discussions: bool,
    pub has_issues: bool,
    pub has_projects: bool,
    pub has_wiki: bool,
    pub web_commit_signoff_required: bool,
}

impl Default for RepositoryStandards {
    fn default() -> Self {
        Self {
            allow_auto_merge: false,
            allow_merge_commit: true,
            allow_rebase_merge: false,
            allow_squash_merge: true,
            allow_update_branch: true,
            delete_branch_on_merge: true,
            has_discussions: true,
            has_issues: true,
            has_projects: false,
            has_wiki: false,
            web_commit_signoff_required: true,
        }
    }
}

impl RepositoryStandards {
    /// The policy as an ordered baseline.
    pub fn baseline(&self) -> Baseline {
        Baseline::new([
            ("allow_auto_merge", self.allow_auto_merge),
            ("allow_merge_commit", self.allow_merge_commit),
            ("allow_rebase_merge", self.allow_rebase_merge),
            ("allow_squash_merge", self.allow_squash_merge),
            ("allow_update_branch", self.allow_update_branch),
            ("delete_branch_on_merge", self.delete_branch_on_merge),
            ("has_discussions", self.has_discussions),
            ("has_issues", self.has_issues),
            ("has_projects", self.has_projects),
            ("has_wiki", self.has_wiki),
            ("web_commit_signoff_required", self.web_commit_signoff_required),
        ])
    }
}

// ---------------------------------------------------------------------------
// Branch policy
// ---------------------------------------------------------------------------

/// Property name reported when commit signatures are not required.
pub const REQUIRED_SIGNATURES: &str = "required_signatures";

/// Branch-protection settings enforced on every default branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchStandards {
    pub allow_deletions: bool,
    pub allow_force_pushes: bool,
    pub require_code_owner_reviews: bool,
    pub required_approving_review_count: u32,
    pub required_signatures: bool,
}

impl Default for BranchStandards {
    fn default() -> Self {
        Self {
            allow_deletions: false,
            allow_force_pushes: false,
            require_code_owner_reviews: true,
            required_approving_review_count: 1,
            required_signatures: true,
        }
    }
}

impl BranchStandards {
    /// Baseline for the protection toggles.
    pub fn protection_baseline(&self) -> Baseline {
        Baseline::new([
            ("allow_deletions", self.allow_deletions),
            ("allow_force_pushes", self.allow_force_pushes),
        ])
    }

    /// Baseline for the required pull-request reviews.
    pub fn review_baseline(&self) -> Baseline {
        Baseline::new([
            (
                "require_code_owner_reviews",
                SettingValue::Flag(self.require_code_owner_reviews),
            ),
            (
                "required_approving_review_count",
                SettingValue::Count(self.required_approving_review_count),
            ),
        ])
    }

    /// The desired review requirements as a write.
    pub fn review_update(&self) -> ReviewRequirementsUpdate {
        ReviewRequirementsUpdate {
            require_code_owner_reviews: self.require_code_owner_reviews,
            required_approving_review_count: self.required_approving_review_count,
        }
    }

    /// The desired protection as a full write.
    pub fn protection_update(&self) -> ProtectionUpdate {
        ProtectionUpdate {
            allow_deletions: self.allow_deletions,
            allow_force_pushes: self.allow_force_pushes,
            required_reviews: self.review_update(),
        }
    }
}
