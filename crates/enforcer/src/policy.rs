//! Which repositories are managed, and what they are held to.

use standards::{
    BranchName, BranchStandards, CustomPropertyName, RepositoryName, RepositorySnapshot,
    RepositoryStandards,
};

/// Default repository custom property marking a repository as managed.
pub const DEFAULT_OPT_IN_PROPERTY: &str = "Auto-Apply-Standards";

/// Opt-in property value meaning "not managed".
pub const OPT_OUT_VALUE: &str = "false";

/// Repositories never touched, whatever their custom properties say.
pub const DEFAULT_EXCLUDED_REPOSITORIES: [&str; 1] = [".github"];

/// Default branch name every repository is expected to use.
pub const EXPECTED_DEFAULT_BRANCH: &str = "main";

/// Everything an organization run enforces and how it selects repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnforcementPolicy {
    pub repository: RepositoryStandards,
    pub branch: BranchStandards,
    pub excluded: Vec<RepositoryName>,
    pub opt_in_property: CustomPropertyName,
    /// A default branch with any other name is reported, then reconciled anyway.
    pub expected_default_branch: Option<BranchName>,
}

impl Default for EnforcementPolicy {
    fn default() -> Self {
        Self {
            repository: RepositoryStandards::default(),
            branch: BranchStandards::default(),
            excluded: DEFAULT_EXCLUDED_REPOSITORIES
                .iter()
                .filter_map(|name| RepositoryName::new(*name))
                .collect(),
            opt_in_property: CustomPropertyName::new(DEFAULT_OPT_IN_PROPERTY)
                .expect("default opt-in property is non-empty"),
            expected_default_branch: BranchName::new(EXPECTED_DEFAULT_BRANCH),
        }
    }
}

impl EnforcementPolicy {
    /// Replaces the exclusion list.
    pub fn with_excluded(mut self, excluded: Vec<RepositoryName>) -> Self {
        self.excluded = excluded;
        self
    }

    /// Replaces the opt-in custom property.
    pub fn with_opt_in_property(mut self, property: CustomPropertyName) -> Self {
        self.opt_in_property = property;
        self
    }

    /// Returns `true` if `name` is on the exclusion list.
    pub fn is_excluded(&self, name: &RepositoryName) -> bool {
        self.excluded.contains(name)
    }

    /// Returns `true` if the repository opted in through its custom property.
    ///
    /// A missing property, or one set to `"false"`, means not managed.
    pub fn is_managed(&self, snapshot: &RepositorySnapshot) -> bool {
        match snapshot.custom_property(self.opt_in_property.as_str()) {
            Some(value) => !value.eq_ignore_ascii_case(OPT_OUT_VALUE),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::managed_snapshot;

    #[test]
    fn dot_github_is_excluded_by_default() {
        let policy = EnforcementPolicy::default();
        assert!(policy.is_excluded(&RepositoryName::new(".github").unwrap()));
        assert!(!policy.is_excluded(&RepositoryName::new("widgets").unwrap()));
    }

    #[test]
    fn opt_in_property_gates_management() {
        let policy = EnforcementPolicy::default();
        let mut snapshot = managed_snapshot("widgets");
        assert!(policy.is_managed(&snapshot));

        snapshot
            .custom_properties
            .insert(DEFAULT_OPT_IN_PROPERTY.to_string(), "false".to_string());
        assert!(!policy.is_managed(&snapshot));

        snapshot.custom_properties.clear();
        assert!(!policy.is_managed(&snapshot));
    }

    #[test]
    fn custom_opt_in_property_is_honoured() {
        let policy = EnforcementPolicy::default()
            .with_opt_in_property(CustomPropertyName::new("Managed").unwrap());
        let mut snapshot = managed_snapshot("widgets");
        assert!(!policy.is_managed(&snapshot));

        snapshot
            .custom_properties
            .insert("Managed".to_string(), "yes".to_string());
        assert!(policy.is_managed(&snapshot));
    }
}
