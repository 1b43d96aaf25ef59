//! Journal entry extraction.
//!
//! Stage 1 of the pipeline. Turns the flattened paragraphs of a journal
//! document into [`Entry`] records by folding an explicit [`ExtractState`]
//! over the block sequence.
//!
//! ## Document shape
//!
//! ```text
//! 2025-06-01          ← date (carries over to later entries)
//!
//! 09:00               ← time, optional offset: 09:00-07:00
//! TRAVEL|FAMILY       ← tags: no lowercase letters, split on '|'
//! **Arrival**         ← bold paragraphs form the title
//! Landed at noon.     ← everything else is body
//!
//!                     ← two blank lines end the entry
//! ```
//!
//! ## Classification order
//!
//! For each non-blank paragraph the first matching rule wins:
//!
//! 1. a `YYYY-MM-DD` token sets the date;
//! 2. a time token sets the time, only while neither time nor tags are set;
//! 3. a line without lowercase letters becomes the tags, only while tags are empty;
//! 4. bold text goes to the title, anything else to the body.
//!
//! Once tags or a time are recorded, later paragraphs that merely look like
//! them are treated as title or body text. Nothing is ever dropped.
//!
//! An entry with no time gets the configured default time, and its offset is
//! the default offset, shifted for daylight saving when that is enabled.

use crate::config::EntriesConfig;
use crate::document::{DocumentError, parse_blocks};
use crate::entry::Entry;
use crate::time::{adjust_offset_for_daylight_savings, extract_time_info, is_date_token};
use crate::types::Block;
use serde::{Deserialize, Serialize};
use std::mem;
use std::path::Path;
use thiserror::Error;

/// Entry type recorded on entries from a Google Docs journal.
pub const DOCS_ENTRY_TYPE: &str = "Google Docs";

/// Consecutive blank paragraphs that close an entry.
const BLANK_LINES_PER_BREAK: u32 = 2;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
}

/// Defaults applied while extracting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Time given to entries that never state one (`HH:MM:SS`).
    pub default_time: String,
    /// Offset given to entries whose time carries none (`±HH:MM`).
    pub default_timezone_offset: String,
    /// Shift the default offset by an hour inside the DST window.
    pub adjust_for_daylight_savings: bool,
}

impl ExtractConfig {
    pub fn from_entries_config(config: &EntriesConfig) -> Self {
        Self {
            default_time: config.default_time.clone(),
            default_timezone_offset: config.default_timezone_offset.clone(),
            adjust_for_daylight_savings: config.adjust_for_daylight_savings,
        }
    }

    /// The default offset as it applies to `(date, time)`.
    pub fn adjusted_default_offset(&self, date: &str, time: &str) -> String {
        if self.adjust_for_daylight_savings {
            adjust_offset_for_daylight_savings(date, time, &self.default_timezone_offset)
        } else {
            self.default_timezone_offset.clone()
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self::from_entries_config(&EntriesConfig::default())
    }
}

/// A source of journal entries.
///
/// Each implementation understands one document format and stamps its
/// entries with its own entry type.
pub trait EntryExtractor {
    /// Entry type written on every entry this extractor produces.
    fn entry_type(&self) -> &str;

    /// Parse a raw source document into entries, in document order.
    fn extract_entries(&self, source: &str) -> Result<Vec<Entry>, ExtractError>;
}

/// Extractor for Google Docs `documents.get` JSON.
#[derive(Debug, Clone, Default)]
pub struct DocsEntryExtractor {
    config: ExtractConfig,
}

impl DocsEntryExtractor {
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    /// Extract from already-flattened blocks.
    pub fn extract_blocks(&self, blocks: &[Block]) -> Vec<Entry> {
        extract_entries(blocks, &self.config, DOCS_ENTRY_TYPE)
    }
}

impl EntryExtractor for DocsEntryExtractor {
    fn entry_type(&self) -> &str {
        DOCS_ENTRY_TYPE
    }

    fn extract_entries(&self, source: &str) -> Result<Vec<Entry>, ExtractError> {
        let blocks = parse_blocks(source)?;
        Ok(self.extract_blocks(&blocks))
    }
}

/// Fold `blocks` into entries.
///
/// Always yields at least one entry: an empty document produces a single
/// entry holding only the defaults.
pub fn extract_entries(blocks: &[Block], config: &ExtractConfig, entry_type: &str) -> Vec<Entry> {
    blocks
        .iter()
        .fold(ExtractState::default(), |state, block| {
            state.step(block, config, entry_type)
        })
        .finish(config, entry_type)
}

/// Accumulator threaded through [`extract_entries`].
///
/// Everything except `date` and `entries` is per-entry and cleared on flush.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractState {
    pub date: String,
    pub time: Option<String>,
    pub time_offset: String,
    pub tags: Vec<String>,
    pub title: Vec<String>,
    pub body: Vec<String>,
    /// Consecutive blank blocks seen so far.
    pub blank_run: u32,
    /// Whether any non-blank block arrived since the last flush.
    pub pending: bool,
    pub entries: Vec<Entry>,
}

impl ExtractState {
    /// Apply one block.
    pub fn step(mut self, block: &Block, config: &ExtractConfig, entry_type: &str) -> Self {
        if block.is_blank() {
            self.blank_run += 1;
            if self.blank_run == BLANK_LINES_PER_BREAK {
                self.flush(config, entry_type);
            }
            return self;
        }

        self.blank_run = 0;
        self.pending = true;
        let text = block.text.trim();

        let time_info = if self.tags.is_empty() && self.time.is_none() {
            extract_time_info(text)
        } else {
            None
        };

        if is_date_token(text) {
            self.date = text.to_string();
        } else if let Some(info) = time_info {
            self.time_offset = match info.offset {
                Some(offset) => offset,
                None => config.adjusted_default_offset(&self.date, &info.time),
            };
            self.time = Some(info.time);
        } else if self.tags.is_empty() && is_tag_line(text) {
            self.tags = split_tags(text);
        } else if block.bold {
            self.title.push(text.to_string());
        } else {
            self.body.push(text.to_string());
        }
        self
    }

    /// Close the document: flush whatever is pending and return all entries.
    ///
    /// A document that ended right after an entry break has nothing pending
    /// and does not get an extra empty entry.
    pub fn finish(mut self, config: &ExtractConfig, entry_type: &str) -> Vec<Entry> {
        if self.pending || self.entries.is_empty() {
            self.flush(config, entry_type);
        }
        self.entries
    }

    fn flush(&mut self, config: &ExtractConfig, entry_type: &str) {
        let (time, time_offset) = match self.time.take() {
            Some(time) => (time, mem::take(&mut self.time_offset)),
            None => {
                let time = config.default_time.clone();
                let offset = config.adjusted_default_offset(&self.date, &time);
                (time, offset)
            }
        };
        let entry = Entry::new(
            self.date.clone(),
            time,
            time_offset,
            mem::take(&mut self.tags),
            mem::take(&mut self.title),
            mem::take(&mut self.body),
            entry_type,
        );
        log::debug!("extracted entry {}", entry.generated_id());
        self.entries.push(entry);
        self.time_offset.clear();
        self.blank_run = 0;
        self.pending = false;
    }
}

/// True when no character is lowercase. Caseless scripts qualify.
fn is_tag_line(text: &str) -> bool {
    !text.chars().any(char::is_lowercase)
}

/// Split on `|`; a trailing separator does not produce an empty tag.
fn split_tags(text: &str) -> Vec<String> {
    text.split_terminator('|').map(str::to_string).collect()
}

// =============================================================================
// Stage entry point
// =============================================================================

/// Output of the extract stage, written as `entries.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntriesManifest {
    /// Path of the document the entries came from.
    pub source: String,
    /// Local time the extraction ran (`YYYY-MM-DD HH:MM:SS`).
    pub extracted_at: String,
    pub entries: Vec<Entry>,
}

/// Read a document from disk and extract its entries.
pub fn extract_document(
    extractor: &impl EntryExtractor,
    path: &Path,
) -> Result<EntriesManifest, ExtractError> {
    let source = std::fs::read_to_string(path)?;
    let entries = extractor.extract_entries(&source)?;
    log::info!(
        "extracted {} {} entries from {}",
        entries.len(),
        extractor.entry_type(),
        path.display()
    );
    Ok(EntriesManifest {
        source: path.display().to_string(),
        extracted_at: crate::time::current_datetime(),
        entries,
    })
}
