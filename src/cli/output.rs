//! CLI output: error mapping and report formatting.

use crate::combine::CombineReport;
use crate::error::FlattenError;
use serde_json::json;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &FlattenError) -> String {
    match e {
        FlattenError::InvalidArgument(msg) => format!("{}\nRun with --help for usage.", msg),
        other => other.to_string(),
    }
}

/// Human-readable run summary. `verbose` adds the folded tileset count.
pub fn format_report_text(report: &CombineReport, verbose: bool) -> String {
    let mut lines = Vec::new();
    if verbose {
        lines.push(format!("Tilesets combined: {}", report.external_tilesets + 1));
        lines.push(format!("Manifests skipped: {}", report.skipped_manifests));
    }
    lines.push(format!("Content files copied: {}", report.copied_files));
    lines.push(format!(
        "Wrote {}{}",
        report.output_manifest.display(),
        if report.compressed { " (gzip)" } else { "" }
    ));
    lines.join("\n")
}

/// Machine-readable run summary
pub fn format_report_json(report: &CombineReport) -> String {
    json!({
        "output_dir": report.output_dir.display().to_string(),
        "output_manifest": report.output_manifest.display().to_string(),
        "external_tilesets": report.external_tilesets,
        "copied_files": report.copied_files,
        "skipped_manifests": report.skipped_manifests,
        "compressed": report.compressed,
    })
    .to_string()
}
