//! Title card rendering.
//!
//! Stage 2 of the pipeline. Takes the entries manifest from the extract
//! stage, renders each entry's title to a PNG card named after its
//! generated id, and exports one row per entry for spreadsheet import.
//!
//! ## Output Structure
//!
//! ```text
//! images/
//! ├── cards.json                                   # Render manifest
//! ├── rows.json                                    # Entry rows, sorted by UTC timestamp
//! ├── 2025-06-01t09-00-00-07-00_trip_google_docs_my_title_body_line_.png
//! └── ...
//! ```
//!
//! ## Row layout
//!
//! ```text
//! 0 date | 1 time | 2 offset | 3 tags | 4 title | 5 body
//! 6 entry type | 7 generated id | 8 photos id | 9 UTC timestamp
//! ```
//!
//! ## Parallel Processing
//!
//! Entries are independent, so cards are rendered in parallel using
//! [rayon](https://docs.rs/rayon). Manifest order follows entry order.

use crate::config::JournalConfig;
use crate::entry::Entry;
use crate::extract::EntriesManifest;
use crate::layout::{
    BackendError, CardError, FontBackend, TextBackend, TextStyle, create_title_card,
};
use crate::time::UtcMode;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// File name of the render manifest inside the output directory.
pub const CARDS_MANIFEST: &str = "cards.json";
/// File name of the exported rows inside the output directory.
pub const ROWS_FILE: &str = "rows.json";

/// Column of the UTC timestamp in an exported row.
const UTC_COLUMN: usize = 9;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Font backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("Card for entry {id} failed: {source}")]
    Card {
        id: String,
        #[source]
        source: CardError,
    },
}

/// Progress events emitted while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    CardRendered {
        /// 1-based position in the entries manifest.
        index: usize,
        title: String,
        filename: String,
        width: u32,
        height: u32,
        line_count: usize,
    },
}

/// One rendered card, as recorded in `cards.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedEntry {
    pub generated_id: String,
    pub filename: String,
    pub width: u32,
    pub height: u32,
    pub line_count: usize,
    /// `YYYY:MM:DD HH:MM:SS` for the image's EXIF date fields.
    pub exif_datetime: String,
    pub photos_description: String,
}

/// Output of the render stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderManifest {
    pub source: String,
    pub rendered_at: String,
    pub cards: Vec<RenderedEntry>,
}

/// Render every entry in the manifest at `manifest_path` with the
/// configured font.
pub fn render(
    manifest_path: &Path,
    output_dir: &Path,
    config: &JournalConfig,
    events: Option<Sender<RenderEvent>>,
) -> Result<RenderManifest, RenderError> {
    let backend = FontBackend::from_file(Path::new(&config.layout.font_path))?;
    render_with_backend(&backend, manifest_path, output_dir, config, events)
}

/// Render using a specific backend (allows testing with mock).
pub fn render_with_backend(
    backend: &impl TextBackend,
    manifest_path: &Path,
    output_dir: &Path,
    config: &JournalConfig,
    events: Option<Sender<RenderEvent>>,
) -> Result<RenderManifest, RenderError> {
    let manifest_content = std::fs::read_to_string(manifest_path)?;
    let input: EntriesManifest = serde_json::from_str(&manifest_content)?;

    std::fs::create_dir_all(output_dir)?;
    warn_duplicate_ids(&input.entries);

    let style = TextStyle::from_config(&config.layout, &config.debug);
    let char_limit = config.entries.photos_description_char_limit;

    let cards = input
        .entries
        .par_iter()
        .enumerate()
        .map(|(i, entry)| -> Result<RenderedEntry, RenderError> {
            let card = create_title_card(backend, entry, &style, output_dir).map_err(|source| {
                RenderError::Card {
                    id: entry.generated_id().to_string(),
                    source,
                }
            })?;
            let filename = entry.to_filename();
            log::debug!(
                "rendered {filename} at {}x{} after {} attempt(s)",
                card.width,
                card.height,
                card.attempts
            );
            if let Some(tx) = &events {
                tx.send(RenderEvent::CardRendered {
                    index: i + 1,
                    title: entry.title_string(),
                    filename: filename.clone(),
                    width: card.width,
                    height: card.height,
                    line_count: card.line_count,
                })
                .ok();
            }
            Ok(RenderedEntry {
                generated_id: entry.generated_id().to_string(),
                filename,
                width: card.width,
                height: card.height,
                line_count: card.line_count,
                exif_datetime: entry.exif_datetime(),
                photos_description: entry.photos_description(char_limit),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let rows = export_rows(&input.entries, config.entries.utc_mode);
    std::fs::write(
        output_dir.join(ROWS_FILE),
        serde_json::to_string_pretty(&rows)?,
    )?;

    let manifest = RenderManifest {
        source: manifest_path.display().to_string(),
        rendered_at: crate::time::current_datetime(),
        cards,
    };
    std::fs::write(
        output_dir.join(CARDS_MANIFEST),
        serde_json::to_string_pretty(&manifest)?,
    )?;
    log::info!(
        "rendered {} cards into {}",
        manifest.cards.len(),
        output_dir.display()
    );
    Ok(manifest)
}

/// Entry rows for export, ordered by UTC timestamp.
///
/// The sort is stable, so entries with equal timestamps keep their
/// document order.
pub fn export_rows(entries: &[Entry], mode: UtcMode) -> Vec<[String; 10]> {
    let mut rows: Vec<[String; 10]> = entries.iter().map(|e| e.to_vector(mode)).collect();
    rows.sort_by(|a, b| a[UTC_COLUMN].cmp(&b[UTC_COLUMN]));
    rows
}

/// Entries sharing an id render to the same file; the last one written wins.
fn warn_duplicate_ids(entries: &[Entry]) {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.generated_id()) {
            log::warn!(
                "duplicate entry id {}; its card will be overwritten",
                entry.generated_id()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{DOCS_ENTRY_TYPE, DocsEntryExtractor, EntryExtractor};
    use crate::layout::LayoutError;
    use crate::layout::backend::tests::MockBackend;
    use crate::test_helpers::{docs_json, para, test_extract_config};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn entry(date: &str, time: &str, offset: &str, title: &str) -> Entry {
        Entry::new(
            date,
            time,
            offset,
            vec!["trip".into()],
            vec![title.to_string()],
            vec!["Body".into()],
            DOCS_ENTRY_TYPE,
        )
    }

    fn write_manifest(dir: &Path, entries: Vec<Entry>) -> PathBuf {
        let manifest = EntriesManifest {
            source: "document.json".into(),
            extracted_at: "2025-06-02 10:00:00".into(),
            entries,
        };
        let path = dir.join("entries.json");
        fs::write(&path, serde_json::to_string_pretty(&manifest).unwrap()).unwrap();
        path
    }

    // =========================================================================
    // Rows
    // =========================================================================

    #[test]
    fn rows_sorted_by_utc() {
        let entries = vec![
            entry("2025-06-02", "08:00:00", "+00:00", "Later"),
            entry("2025-06-01", "23:00:00", "-05:00", "Middle"),
            entry("2025-06-01", "09:00:00", "+00:00", "Earlier"),
        ];
        let rows = export_rows(&entries, UtcMode::Historical);
        let titles: Vec<&str> = rows.iter().map(|r| r[4].as_str()).collect();
        // 2025-06-01 23:00-05:00 is 2025-06-02 04:00 UTC.
        assert_eq!(titles, vec!["Earlier", "Middle", "Later"]);
    }

    #[test]
    fn rows_with_equal_timestamps_keep_order() {
        let entries = vec![
            entry("2025-06-01", "09:00:00", "+00:00", "First"),
            entry("2025-06-01", "09:00:00", "+00:00", "Second"),
        ];
        let rows = export_rows(&entries, UtcMode::Historical);
        assert_eq!(rows[0][4], "First");
        assert_eq!(rows[1][4], "Second");
    }

    // =========================================================================
    // Render stage with mock backend
    // =========================================================================

    #[test]
    fn render_with_mock_writes_outputs() {
        let tmp = TempDir::new().unwrap();
        let entries = vec![
            entry("2025-06-01", "09:00:00", "-07:00", "Morning walk"),
            entry("2025-06-02", "21:30:00", "-07:00", "Dinner"),
        ];
        let expected_files: Vec<String> = entries.iter().map(|e| e.to_filename()).collect();
        let manifest_path = write_manifest(tmp.path(), entries);
        let output_dir = tmp.path().join("images");
        let backend = MockBackend::new();

        let manifest = render_with_backend(
            &backend,
            &manifest_path,
            &output_dir,
            &JournalConfig::default(),
            None,
        )
        .unwrap();

        assert_eq!(manifest.cards.len(), 2);
        assert_eq!(manifest.cards[0].filename, expected_files[0]);
        assert_eq!(manifest.cards[1].filename, expected_files[1]);
        assert_eq!(manifest.cards[0].width, 778);
        assert_eq!(manifest.cards[0].line_count, 1);
        assert_eq!(manifest.cards[0].exif_datetime, "2025:06:01 09:00:00");
        assert!(
            manifest.cards[0]
                .photos_description
                .starts_with("Type: Google Docs\n\n")
        );

        assert!(output_dir.join(CARDS_MANIFEST).exists());
        let rows: Vec<Vec<String>> =
            serde_json::from_str(&fs::read_to_string(output_dir.join(ROWS_FILE)).unwrap())
                .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), 10);

        let mut outputs: Vec<PathBuf> =
            backend.get_renders().into_iter().map(|r| r.output).collect();
        outputs.sort();
        let mut expected: Vec<PathBuf> =
            expected_files.iter().map(|f| output_dir.join(f)).collect();
        expected.sort();
        assert_eq!(outputs, expected);
    }

    #[test]
    fn render_emits_events() {
        let tmp = TempDir::new().unwrap();
        let manifest_path = write_manifest(
            tmp.path(),
            vec![entry("2025-06-01", "09:00:00", "-07:00", "Only")],
        );
        let (tx, rx) = std::sync::mpsc::channel();

        render_with_backend(
            &MockBackend::new(),
            &manifest_path,
            &tmp.path().join("images"),
            &JournalConfig::default(),
            Some(tx),
        )
        .unwrap();

        let events: Vec<RenderEvent> = rx.iter().collect();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            RenderEvent::CardRendered { index: 1, title, line_count: 1, .. } if title == "Only"
        ));
    }

    #[test]
    fn render_uses_configured_style() {
        let tmp = TempDir::new().unwrap();
        let manifest_path = write_manifest(
            tmp.path(),
            vec![entry("2025-06-01", "09:00:00", "-07:00", "Hi")],
        );
        let mut config = JournalConfig::default();
        config.layout.text_alignment = "left".into();
        config.layout.font_color = [10, 20, 30];
        config.debug.show_line_borders = true;
        let backend = MockBackend::new();

        render_with_backend(
            &backend,
            &manifest_path,
            &tmp.path().join("images"),
            &config,
            None,
        )
        .unwrap();

        let renders = backend.get_renders();
        assert_eq!(renders[0].color, [10, 20, 30]);
        assert!(renders[0].show_line_borders);
        assert_eq!(renders[0].lines[0].x, 39);
    }

    #[test]
    fn render_reports_failing_entry() {
        let tmp = TempDir::new().unwrap();
        let manifest_path = write_manifest(
            tmp.path(),
            vec![entry("2025-06-01", "09:00:00", "-07:00", "Hi")],
        );
        let mut config = JournalConfig::default();
        config.layout.text_alignment = "sideways".into();

        let err = render_with_backend(
            &MockBackend::new(),
            &manifest_path,
            &tmp.path().join("images"),
            &config,
            None,
        )
        .unwrap_err();

        match err {
            RenderError::Card { id, source } => {
                assert!(id.starts_with("2025-06-01t09-00-00-07-00"));
                assert!(matches!(
                    source,
                    CardError::Layout(LayoutError::InvalidAlignment(_))
                ));
            }
            other => panic!("expected Card error, got {other:?}"),
        }
    }

    #[test]
    fn render_missing_manifest_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = render_with_backend(
            &MockBackend::new(),
            &tmp.path().join("entries.json"),
            &tmp.path().join("images"),
            &JournalConfig::default(),
            None,
        );
        assert!(matches!(result, Err(RenderError::Io(_))));
    }

    #[test]
    fn render_missing_font_is_backend_error() {
        let tmp = TempDir::new().unwrap();
        let manifest_path = write_manifest(tmp.path(), Vec::new());
        let mut config = JournalConfig::default();
        config.layout.font_path = tmp.path().join("missing.ttf").display().to_string();

        let result = render(&manifest_path, &tmp.path().join("images"), &config, None);
        assert!(matches!(result, Err(RenderError::Backend(_))));
    }

    #[test]
    fn extracted_document_renders_end_to_end() {
        let tmp = TempDir::new().unwrap();
        let doc = tmp.path().join("document.json");
        fs::write(
            &doc,
            docs_json(&[
                para("2025-06-01", false),
                para("", false),
                para("09:00", false),
                para("TAG1|TAG2", false),
                para("My Title", true),
                para("Body line.", false),
            ]),
        )
        .unwrap();

        let extractor = DocsEntryExtractor::new(test_extract_config());
        let source = fs::read_to_string(&doc).unwrap();
        let entries = extractor.extract_entries(&source).unwrap();
        let manifest_path = write_manifest(tmp.path(), entries);
        let backend = MockBackend::new();

        let manifest = render_with_backend(
            &backend,
            &manifest_path,
            &tmp.path().join("images"),
            &JournalConfig::default(),
            None,
        )
        .unwrap();

        assert_eq!(manifest.cards.len(), 1);
        assert_eq!(
            manifest.cards[0].generated_id,
            "2025-06-01t09-00-00+00-00_tag1_tag2_google_docs_my_title_body_line_"
        );
        assert_eq!(backend.get_renders()[0].lines[0].text, "My Title");
    }
}
