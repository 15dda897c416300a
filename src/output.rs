//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.
//!
//! ## Build
//!
//! ```text
//! Content
//!     4 events
//!     3 gallery images
//! Skipped
//!     contact.instagram: no value set
//! Assets
//!     style.css
//!     script.js
//!     images/ (4 files)
//! Build complete → _site/
//! ```

use crate::inject::SkippedSlot;
use crate::site::{BuildReport, RenderSummary};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

fn content_lines(summary: &RenderSummary) -> Vec<String> {
    vec![
        "Content".to_string(),
        format!("{}{}", indent(1), plural(summary.events, "event", "events")),
        format!(
            "{}{}",
            indent(1),
            plural(summary.gallery_images, "gallery image", "gallery images")
        ),
    ]
}

fn skipped_lines(skipped: &[SkippedSlot]) -> Vec<String> {
    if skipped.is_empty() {
        return Vec::new();
    }
    let mut lines = vec!["Skipped".to_string()];
    lines.extend(
        skipped
            .iter()
            .map(|s| format!("{}{}: {}", indent(1), s.slot, s.reason)),
    );
    lines
}

fn dir_display(path: &Path) -> String {
    format!("{}/", path.display().to_string().trim_end_matches('/'))
}

/// Lines summarising a finished build.
pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = content_lines(&report.summary);
    lines.extend(skipped_lines(&report.summary.skipped));

    let assets = &report.assets;
    if !assets.files.is_empty() || !assets.dirs.is_empty() {
        lines.push("Assets".to_string());
        for file in &assets.files {
            lines.push(format!("{}{}", indent(1), file.display()));
        }
        for (dir, count) in &assets.dirs {
            lines.push(format!(
                "{}{} ({})",
                indent(1),
                dir_display(dir),
                plural(*count, "file", "files")
            ));
        }
    }

    lines.push(format!(
        "Build complete → {}",
        dir_display(&report.output_dir)
    ));
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{line}");
    }
}

/// Lines summarising a `check` run.
pub fn format_check_output(summary: &RenderSummary) -> Vec<String> {
    let mut lines = content_lines(summary);
    lines.extend(skipped_lines(&summary.skipped));
    lines
}

pub fn print_check_output(summary: &RenderSummary) {
    for line in format_check_output(summary) {
        println!("{line}");
    }
}
