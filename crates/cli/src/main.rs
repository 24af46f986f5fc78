//! GitHub standards CLI entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration**: flags and environment variables via [`args::Cli`].
//!    A missing `GH_TOKEN` ends the process with status 1 before anything else runs.
//! 2. **Wire observability**: install the `tracing-subscriber` stack (pretty or
//!    JSON on stderr, plus an OTLP exporter when one is configured).
//! 3. **Construct infrastructure**: build the [`github::GithubClient`] and the
//!    [`enforcer::EnforcementPolicy`] and hand both to [`enforcer::run_organization`].
//! 4. **Report**: print the [`enforcer::AuditReport`] to stdout as text or JSON.
//!
//! Exit status is 0 on success, 1 on any error, and 2 when `--fail-on-drift`
//! is given and at least one repository drifted.

mod args;
mod observability;
mod output;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use enforcer::{AuditRun, EnforcementPolicy, RepositorySelection};
use github::{GithubClient, GithubClientConfig};
use standards::{
    CustomPropertyName, EnforcementMode, OrganizationName, RepositoryName, StandardsError,
};
use tracing::error;

use crate::args::Cli;

const MISSING_TOKEN: &str = "GH_TOKEN environment variable not set.";
const DRIFT_EXIT_CODE: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(token) = cli.token().map(str::to_owned) else {
        eprintln!("{MISSING_TOKEN}");
        return ExitCode::FAILURE;
    };

    let telemetry = match observability::init(cli.log_format) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let code = match run(&cli, token).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Standards run failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    };

    telemetry.shutdown();
    code
}

async fn run(cli: &Cli, token: String) -> anyhow::Result<ExitCode> {
    let organization = OrganizationName::new(cli.org.as_str()).ok_or_else(|| {
        StandardsError::Configuration {
            message: "organization name must not be empty".to_string(),
        }
    })?;
    let policy = policy_from(cli)?;
    let selection = if cli.repos.is_empty() {
        RepositorySelection::All
    } else {
        RepositorySelection::Named(repository_names(&cli.repos)?)
    };
    let mode = if cli.apply {
        EnforcementMode::Enforce
    } else {
        EnforcementMode::ReportOnly
    };

    let client = GithubClient::new(GithubClientConfig::new(token).with_api_base(&cli.api_url))
        .context("building GitHub client")?;

    let audit = AuditRun::new(organization, selection, mode);
    let report = enforcer::run_organization(&client, &audit, &policy)
        .await
        .with_context(|| format!("standards run for {} failed", audit.organization))?;

    let mut stdout = std::io::stdout().lock();
    if cli.json {
        output::write_json(&report, &mut stdout)
    } else {
        output::write_text(&report, &mut stdout)
    }
    .context("writing report")?;

    if cli.fail_on_drift && !report.drifted_repositories().is_empty() {
        return Ok(ExitCode::from(DRIFT_EXIT_CODE));
    }
    Ok(ExitCode::SUCCESS)
}

fn policy_from(cli: &Cli) -> Result<EnforcementPolicy, StandardsError> {
    let opt_in = CustomPropertyName::new(cli.opt_in_property.as_str()).ok_or_else(|| {
        StandardsError::Configuration {
            message: "--opt-in-property must not be empty".to_string(),
        }
    })?;
    Ok(EnforcementPolicy::default()
        .with_excluded(repository_names(&cli.excluded)?)
        .with_opt_in_property(opt_in))
}

fn repository_names(names: &[String]) -> Result<Vec<RepositoryName>, StandardsError> {
    names
        .iter()
        .map(|name| {
            RepositoryName::new(name.as_str()).ok_or_else(|| StandardsError::Configuration {
                message: "repository names must not be empty".to_string(),
            })
        })
        .collect()
}
