//! Result sinks: CSV, plain-text report, JSON and candidate lists

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, ScoutError};
use crate::types::{Outcome, ResultSet};

const RULE_WIDTH: usize = 50;

fn io_error(e: std::io::Error, path: &Path) -> ScoutError {
    ScoutError::io(e.to_string(), Some(path.display().to_string()))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_error(e, parent))?;
    }
    let file = File::create(path).map_err(|e| io_error(e, path))?;
    Ok(BufWriter::new(file))
}

/// `domain,available` rows in key order; only `Available` counts as `true`
pub fn write_csv(path: &Path, results: &ResultSet) -> Result<()> {
    let mut out = create(path)?;
    let mut write = || -> std::io::Result<()> {
        writeln!(out, "domain,available")?;
        for record in results.iter() {
            writeln!(out, "{},{}", record.key, record.outcome.is_available())?;
        }
        out.flush()
    };
    write().map_err(|e| io_error(e, path))
}

/// Sectioned report: available and taken keys, then unknown and
/// not-attempted keys when there are any
pub fn write_text_report(path: &Path, results: &ResultSet) -> Result<()> {
    let mut out = create(path)?;
    let rule = "=".repeat(RULE_WIDTH);

    let mut write = || -> std::io::Result<()> {
        writeln!(out, "AVAILABLE DOMAINS")?;
        writeln!(out, "{rule}")?;
        for key in results.available() {
            writeln!(out, "{key}")?;
        }

        let taken = results.taken();
        writeln!(out)?;
        writeln!(out, "TAKEN DOMAINS ({})", taken.len())?;
        writeln!(out, "{rule}")?;
        for key in taken {
            writeln!(out, "{key}")?;
        }

        let unknown: Vec<_> = results.with_outcome(Outcome::Unknown).collect();
        if !unknown.is_empty() {
            writeln!(out)?;
            writeln!(out, "UNKNOWN DOMAINS ({})", unknown.len())?;
            writeln!(out, "{rule}")?;
            for record in unknown {
                match record.failure {
                    Some(kind) => writeln!(out, "{} ({kind})", record.key)?,
                    None => writeln!(out, "{}", record.key)?,
                }
            }
        }

        let skipped: Vec<_> = results.with_outcome(Outcome::NotAttempted).collect();
        if !skipped.is_empty() {
            writeln!(out)?;
            writeln!(out, "NOT ATTEMPTED DOMAINS ({})", skipped.len())?;
            writeln!(out, "{rule}")?;
            for record in skipped {
                writeln!(out, "{}", record.key)?;
            }
        }
        out.flush()
    };
    write().map_err(|e| io_error(e, path))
}

/// Pretty JSON array of every record
pub fn write_json(path: &Path, results: &ResultSet) -> Result<()> {
    let records: Vec<_> = results.iter().collect();
    let content = serde_json::to_string_pretty(&records)
        .map_err(|e| ScoutError::internal(format!("Failed to serialize results: {e}")))?;

    let mut out = create(path)?;
    out.write_all(content.as_bytes())
        .and_then(|_| out.write_all(b"\n"))
        .and_then(|_| out.flush())
        .map_err(|e| io_error(e, path))
}

/// Write `<n>_domains.txt` (bare labels) and `<n>_domains_with_<tld>.txt`
/// into `dir`, returning both paths.
pub fn write_candidates(
    dir: &Path,
    labels: &[String],
    tld: &str,
) -> Result<(std::path::PathBuf, std::path::PathBuf)> {
    let tld = tld.trim_start_matches('.');
    let bare_path = dir.join(format!("{}_domains.txt", labels.len()));
    let qualified_path = dir.join(format!("{}_domains_with_{}.txt", labels.len(), tld));

    let mut bare = create(&bare_path)?;
    labels
        .iter()
        .try_for_each(|label| writeln!(bare, "{label}"))
        .and_then(|_| bare.flush())
        .map_err(|e| io_error(e, &bare_path))?;

    let mut qualified = create(&qualified_path)?;
    labels
        .iter()
        .try_for_each(|label| writeln!(qualified, "{label}.{tld}"))
        .and_then(|_| qualified.flush())
        .map_err(|e| io_error(e, &qualified_path))?;

    tracing::info!(
        count = labels.len(),
        bare = %bare_path.display(),
        qualified = %qualified_path.display(),
        "Wrote candidate lists"
    );

    Ok((bare_path, qualified_path))
}
