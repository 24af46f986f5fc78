//! Report rendering.

use std::io::{self, Write};

use enforcer::{AuditReport, RepositoryAudit, RepositoryOutcome};

/// Writes the report as pretty-printed JSON.
pub fn write_json<W: Write>(report: &AuditReport, out: &mut W) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
}

/// Writes one line per repository, then a summary line.
pub fn write_text<W: Write>(report: &AuditReport, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "Standards run {} for {} ({}), started {}",
        report.run_id, report.organization, report.mode, report.started_at
    )?;

    for outcome in &report.outcomes {
        let name = &outcome.repository().name;
        match outcome {
            RepositoryOutcome::Excluded { .. } => writeln!(out, "  {name}: excluded")?,
            RepositoryOutcome::Archived { .. } => writeln!(out, "  {name}: archived, skipped")?,
            RepositoryOutcome::NotManaged { .. } => {
                writeln!(out, "  {name}: not part of standards management, skipped")?
            }
            RepositoryOutcome::Checked(audit) => write_audit(audit, out)?,
        }
    }

    let drifted = report.drifted_repositories().len();
    writeln!(
        out,
        "{} checked, {} drifted, {} compliant",
        report.checked_count(),
        drifted,
        report.checked_count() - drifted
    )
}

fn write_audit<W: Write>(audit: &RepositoryAudit, out: &mut W) -> io::Result<()> {
    let name = &audit.repository.name;
    if audit.is_compliant() {
        writeln!(out, "  {name}: compliant")?;
    } else {
        let verb = if audit.applied { "fixed" } else { "drift" };
        writeln!(out, "  {name}: {verb}")?;
        if !audit.repository_drift.is_empty() {
            writeln!(out, "      repository: {}", audit.repository_drift)?;
        }
        if let (Some(branch), Some(drift)) = (&audit.default_branch, &audit.branch_drift) {
            if !drift.is_empty() {
                writeln!(out, "      branch {branch}: {drift}")?;
            }
        }
    }
    for warning in &audit.warnings {
        writeln!(out, "      WARNING: {warning}")?;
    }
    Ok(())
}
