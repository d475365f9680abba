//! CLI output formatting for resize results.
//!
//! Each result has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.
//!
//! ```text
//! photos/dawn.jpg
//!     Resized: 4000x3000 → 200x150 (jpeg, sharpen 21)
//!     Crop: 4000x3000 at +0+0
//!     Output: photos/dawn.jpg (18432 bytes)
//! ```

use crate::imaging::{OutputFormat, ResizeOutcome, ResizeReport};
use std::path::Path;

fn format_name(format: OutputFormat) -> &'static str {
    match format {
        OutputFormat::Jpeg => "jpeg",
        OutputFormat::Png => "png",
    }
}

fn report_lines(report: &ResizeReport) -> Vec<String> {
    let g = &report.geometry;
    let sharpen = match report.sharpen_strength {
        Some(strength) => format!(", sharpen {strength}"),
        None => String::new(),
    };
    let (x, y, w, h) = g.crop.to_pixels();

    let mut lines = vec![
        format!(
            "    Resized: {}x{} → {}x{} ({}{})",
            report.source_width,
            report.source_height,
            g.new_width,
            g.new_height,
            format_name(report.format),
            sharpen
        ),
        format!("    Crop: {w}x{h} at +{x}+{y}"),
        format!(
            "    Output: {} ({} bytes)",
            report.output.display(),
            report.bytes_written
        ),
    ];
    if report.source_deleted {
        lines.push("    Source deleted".to_string());
    }
    lines
}

/// Format the outcome of one resize, headed by the source path.
pub fn format_outcome(source: &Path, outcome: &ResizeOutcome) -> Vec<String> {
    let mut lines = vec![source.display().to_string()];
    match outcome {
        ResizeOutcome::Copied { output } => {
            lines.push("    Already fits, copied unchanged".to_string());
            lines.push(format!("    Output: {}", output.display()));
        }
        ResizeOutcome::Resized(report) => lines.extend(report_lines(report)),
        ResizeOutcome::ResampleFailed(reason) => {
            lines.push(format!("    Resample failed: {reason}"));
        }
        ResizeOutcome::WriteFailed(reason) => {
            lines.push(format!("    Write failed: {reason}"));
        }
    }
    lines
}

pub fn print_outcome(source: &Path, outcome: &ResizeOutcome) {
    for line in format_outcome(source, outcome) {
        println!("{}", line);
    }
}
