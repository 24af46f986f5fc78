//! Command line and environment surface.

use clap::Parser;

use crate::observability::LogFormat;

/// Organization audited when `--org` / `GH_ORG` is not given.
pub const DEFAULT_ORG: &str = "sonatype-nexus-community";

#[derive(Debug, Parser)]
#[command(
    name = "github-standards",
    about = "Audit and enforce repository and branch-protection standards across a GitHub organization",
    version
)]
pub struct Cli {
    /// Access token used for every API call
    #[arg(long, env = "GH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Organization whose repositories are reviewed
    #[arg(long, env = "GH_ORG", default_value = DEFAULT_ORG)]
    pub org: String,

    /// Review only these repositories (repeatable; default: every repository in the organization)
    #[arg(long = "repo", value_name = "NAME")]
    pub repos: Vec<String>,

    /// Write the standards wherever drift is found (default: report only)
    #[arg(long)]
    pub apply: bool,

    /// Repositories never reviewed (repeatable)
    #[arg(
        long = "exclude",
        value_name = "NAME",
        default_values = enforcer::DEFAULT_EXCLUDED_REPOSITORIES
    )]
    pub excluded: Vec<String>,

    /// Repository custom property that opts a repository in to standards management
    #[arg(long, default_value = enforcer::DEFAULT_OPT_IN_PROPERTY)]
    pub opt_in_property: String,

    /// GitHub REST API root
    #[arg(long, env = "GITHUB_API_URL", default_value = github::DEFAULT_API_BASE)]
    pub api_url: String,

    /// Print the report as JSON
    #[arg(long, short = 'j')]
    pub json: bool,

    /// Exit with status 2 when any reviewed repository drifted
    #[arg(long)]
    pub fail_on_drift: bool,

    /// Log output format (logs go to stderr)
    #[arg(long, env = "GH_STANDARDS_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Cli {
    /// The token, if one was given and is not blank.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["github-standards"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_are_report_only_over_the_whole_org() {
        let cli = parse(&["--token", "abc", "--org", "acme"]);
        assert!(!cli.apply);
        assert!(cli.repos.is_empty());
        assert_eq!(cli.excluded, enforcer::DEFAULT_EXCLUDED_REPOSITORIES.to_vec());
        assert_eq!(cli.opt_in_property, "Auto-Apply-Standards");
        assert_eq!(cli.token(), Some("abc"));
    }

    #[test]
    fn repeatable_flags_collect_in_order() {
        let cli = parse(&[
            "--token", "abc", "--repo", "one", "--repo", "two", "--exclude", "x", "--apply",
        ]);
        assert_eq!(cli.repos, vec!["one".to_string(), "two".to_string()]);
        assert_eq!(cli.excluded, vec!["x".to_string()]);
        assert!(cli.apply);
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let cli = parse(&["--token", "  "]);
        assert_eq!(cli.token(), None);
    }

    #[test]
    fn json_log_format_is_accepted() {
        let cli = parse(&["--log-format", "json"]);
        assert_eq!(cli.log_format, LogFormat::Json);
    }
}
