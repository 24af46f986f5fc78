//! Newtype domain identifiers.
//!
//! Every named GitHub object the enforcer touches is represented as a distinct
//! newtype wrapping a primitive. This prevents accidentally interchanging, for
//! example, a [`RepositoryName`] with a [`BranchName`] even though both are
//! `String` under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single audit run (one invocation of the CLI).
///
/// Generated fresh for every invocation; attached to the root span and the
/// report so all activity from a single run can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditRunId(Uuid);

impl AuditRunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for AuditRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers: string-backed (GitHub names)
// ---------------------------------------------------------------------------

string_id! {
    /// A GitHub organization login (e.g. `"sonatype-nexus-community"`).
    OrganizationName
}

string_id! {
    /// A repository name without its owner (e.g. `"github-management"`).
    RepositoryName
}

string_id! {
    /// A Git branch name (e.g. `"main"`).
    BranchName
}

string_id! {
    /// Name of a setting that is compared against the baseline.
    ///
    /// Property names match the GitHub REST field names (`"has_wiki"`,
    /// `"allow_force_pushes"`) so they can be reported verbatim.
    PropertyName
}

string_id! {
    /// Name of a repository custom property (e.g. `"Auto-Apply-Standards"`).
    CustomPropertyName
}

// ---------------------------------------------------------------------------
// Composite references
// ---------------------------------------------------------------------------

/// A fully-qualified repository: owner plus name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// Owning organization.
    pub owner: OrganizationName,
    /// Repository name within the organization.
    pub name: RepositoryName,
}

impl RepositoryRef {
    /// Creates a new repository reference.
    pub fn new(owner: OrganizationName, name: RepositoryName) -> Self {
        Self { owner, name }
    }
}

impl std::fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_rejected() {
        assert!(RepositoryName::new("").is_none());
        assert!(BranchName::new(String::new()).is_none());
    }

    #[test]
    fn repository_ref_displays_owner_slash_name() {
        let repo = RepositoryRef::new(
            OrganizationName::new("acme").unwrap(),
            RepositoryName::new("widgets").unwrap(),
        );
        assert_eq!(repo.to_string(), "acme/widgets");
    }

    #[test]
    fn identifiers_compare_with_str() {
        let branch = BranchName::new("main").unwrap();
        assert!(branch == "main");
        assert!(branch != "master");
    }
}
