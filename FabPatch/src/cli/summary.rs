//! End-of-run summary

use std::fmt::Write;
use std::path::Path;

use console::style;

use crate::batch::BatchReport;
use crate::patch::PatchOutcome;

/// Render the grouped summary of a batch run
///
/// Empty groups are omitted. The closing line names the output directory.
#[must_use]
pub fn render_summary(report: &BatchReport, output_dir: &Path) -> String {
    let mut out = String::new();

    let patched: Vec<String> = report.patched().map(display_name).collect();
    let compatible: Vec<String> = report.already_compatible().map(display_name).collect();
    let warnings: Vec<String> = report.warnings().collect();
    let errors: Vec<String> = report.errors().map(ToString::to_string).collect();

    push_group(&mut out, "Successfully patched files", &patched);
    push_group(
        &mut out,
        "Already compatible files (no Minecraft dependency found)",
        &compatible,
    );
    push_group(&mut out, "Files with warnings", &warnings);
    push_group(&mut out, "Files with errors", &errors);

    let _ = writeln!(
        out,
        "All processed mods are available in the '{}' directory.",
        output_dir.display()
    );
    out
}

/// Print the summary with styled headings
pub fn print_summary(report: &BatchReport, output_dir: &Path) {
    for line in render_summary(report, output_dir).lines() {
        if line.ends_with(':') {
            println!("{}", style(line).bold());
        } else {
            println!("{line}");
        }
    }
}

fn push_group(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{heading}:");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
    out.push('\n');
}

fn display_name(outcome: &PatchOutcome) -> String {
    outcome
        .source()
        .file_name()
        .map_or_else(|| outcome.source().display().to_string(), |n| n.to_string_lossy().to_string())
}
