//! Shared output formatting for lint results.

use anyhow::{Context, Result};
use coreguard_core::{LintResult, Severity, ViolationDiagnostic};
use std::io::Write;
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write(&mut out, result, format, root)
}

/// Write lint results in the specified format.
pub fn write(
    out: &mut impl Write,
    result: &LintResult,
    format: OutputFormat,
    root: &Path,
) -> Result<()> {
    match format {
        OutputFormat::Text => write_text(out, result)?,
        OutputFormat::Json => write_json(out, result)?,
        OutputFormat::Compact => write_compact(out, result)?,
        OutputFormat::Pretty => write_pretty(out, result, root)?,
    }
    Ok(())
}

fn write_text(out: &mut impl Write, result: &LintResult) -> std::io::Result<()> {
    let (errors, warnings, infos) = result.count_by_severity();

    for violation in &result.violations {
        writeln!(out, "{}", violation.format())?;
    }

    for fault in &result.faults {
        writeln!(
            out,
            "\x1b[35mskipped\x1b[0m {} on {} at {}:{}: {}",
            fault.rule,
            fault.node_kind,
            fault.file.display(),
            fault.line,
            fault.message
        )?;
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    writeln!(
        out,
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    )
}

fn write_json(out: &mut impl Write, result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    writeln!(out, "{json}")?;
    Ok(())
}

fn write_compact(out: &mut impl Write, result: &LintResult) -> std::io::Result<()> {
    for violation in &result.violations {
        writeln!(out, "{violation}")?;
    }
    Ok(())
}

fn write_pretty(out: &mut impl Write, result: &LintResult, root: &Path) -> Result<()> {
    for violation in &result.violations {
        let path = root.join(&violation.location.file);
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let report = miette::Report::new(ViolationDiagnostic::new(violation, source));
        writeln!(out, "{report:?}")?;
    }

    let (errors, warnings, _) = result.count_by_severity();
    let noun = |n: usize, s: Severity| format!("{n} {s}{}", if n == 1 { "" } else { "s" });
    writeln!(
        out,
        "{}, {} in {} file(s)",
        noun(errors, Severity::Error),
        noun(warnings, Severity::Warning),
        result.files_checked
    )?;
    Ok(())
}
