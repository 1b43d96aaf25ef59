//! CLI output formatting for all pipeline stages.
//!
//! Output is **information-centric, not file-centric**. Every entry is shown
//! by its positional index and title, with dates, tags, and file names as
//! indented context lines underneath. Untitled entries fall back to their
//! generated id so every line still identifies something.
//!
//! # Output Format
//!
//! ## Extract
//!
//! ```text
//! Entries (2)
//! 001 My Title
//!     Date: 2025-06-01 09:00:00 -07:00
//!     Tags: TRIP|DAY
//!     Body: Walked along the ridge before...
//! 002 (2025-06-02t23-59-59-07-00_google_docs__)
//!     Date: 2025-06-02 23:59:59 -07:00
//! ```
//!
//! ## Render
//!
//! ```text
//! 001 My Title → 2025-06-01t09-00-00-07-00_trip_day_google_docs_my_title_walked_alo.png
//!     778x1000, 1 line
//!
//! Rendered 2 cards → images/
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::entry::Entry;
use crate::extract::EntriesManifest;
use crate::render::{RenderEvent, RenderManifest};
use std::path::Path;

/// Body previews longer than this are cut.
const BODY_PREVIEW_CHARS: usize = 40;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entry header: titled entries show the title, untitled show the
/// generated id in parens.
///
/// ```text
/// 001 My Title
/// 002 (2025-06-02t23-59-59-07-00_google_docs__)
/// ```
fn entry_line(index: usize, title: &str, id: &str) -> String {
    if title.is_empty() {
        format!("{} ({})", format_index(index), id)
    } else {
        format!("{} {}", format_index(index), title)
    }
}

/// Title paragraphs on one line.
fn one_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max).collect();
        format!("{}...", kept)
    }
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{} {}", n, one)
    } else {
        format!("{} {}", n, many)
    }
}

// ============================================================================
// Stage 1: Extract output
// ============================================================================

fn entry_lines(index: usize, entry: &Entry) -> Vec<String> {
    let mut lines = vec![entry_line(
        index,
        &one_line(&entry.title_string()),
        entry.generated_id(),
    )];
    let mut date = format!("{} {}", entry.date(), entry.time());
    if !entry.time_offset().is_empty() {
        date.push(' ');
        date.push_str(entry.time_offset());
    }
    lines.push(format!("{}Date: {}", indent(1), date.trim()));
    if !entry.tags().is_empty() {
        lines.push(format!("{}Tags: {}", indent(1), entry.tags_string()));
    }
    if !entry.body().is_empty() {
        lines.push(format!(
            "{}Body: {}",
            indent(1),
            truncate_desc(&one_line(&entry.body_string()), BODY_PREVIEW_CHARS)
        ));
    }
    lines
}

/// Format the entries found by the extract stage.
pub fn format_extract_output(manifest: &EntriesManifest) -> Vec<String> {
    let mut lines = vec![format!("Entries ({})", manifest.entries.len())];
    for (i, entry) in manifest.entries.iter().enumerate() {
        lines.extend(entry_lines(i + 1, entry));
    }
    lines
}

pub fn print_extract_output(manifest: &EntriesManifest) {
    for line in format_extract_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Render output
// ============================================================================

/// Format one progress event from the render stage.
pub fn format_render_event(event: &RenderEvent) -> Vec<String> {
    match event {
        RenderEvent::CardRendered {
            index,
            title,
            filename,
            width,
            height,
            line_count,
        } => vec![
            format!(
                "{} → {}",
                entry_line(*index, &one_line(title), filename),
                filename
            ),
            format!(
                "{}{}x{}, {}",
                indent(1),
                width,
                height,
                plural(*line_count, "line", "lines")
            ),
        ],
    }
}

/// Format the summary of the render stage.
pub fn format_render_output(manifest: &RenderManifest, output_dir: &Path) -> Vec<String> {
    vec![
        String::new(),
        format!(
            "Rendered {} → {}",
            plural(manifest.cards.len(), "card", "cards"),
            output_dir.display()
        ),
    ]
}

pub fn print_render_output(manifest: &RenderManifest, output_dir: &Path) {
    for line in format_render_output(manifest, output_dir) {
        println!("{}", line);
    }
}
