//! The journal entry record and its derived identifiers.
//!
//! An [`Entry`] is built once by an extractor and never edited afterwards,
//! apart from the photos id recorded after an upload. Its `generated_id` is
//! derived at construction and doubles as the image filename stem:
//!
//! ```text
//! 2025-06-01T09:00:00-07:00_TAG1_TAG2_Google Docs_My Title_Body line.
//!   → 2025-06-01t09-00-00-07-00_tag1_tag2_google_docs_my_title_body_line_
//! ```

use crate::time::{UtcMode, compute_utc_datetime};
use serde::{Deserialize, Serialize};

/// Characters of title and body that go into the generated id.
const TITLE_ID_CHARS: usize = 10;
const BODY_ID_CHARS: usize = 10;

const ELLIPSIS: &str = "...";
const PARAGRAPH_SEPARATOR: &str = "\n\n";
const TAG_SEPARATOR: &str = "|";

/// One journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    date: String,
    time: String,
    time_offset: String,
    tags: Vec<String>,
    title: Vec<String>,
    body: Vec<String>,
    entry_type: String,
    generated_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    photos_id: Option<String>,
}

impl Entry {
    pub fn new(
        date: impl Into<String>,
        time: impl Into<String>,
        time_offset: impl Into<String>,
        tags: Vec<String>,
        title: Vec<String>,
        body: Vec<String>,
        entry_type: impl Into<String>,
    ) -> Self {
        let mut entry = Self {
            date: date.into(),
            time: time.into(),
            time_offset: time_offset.into(),
            tags,
            title,
            body,
            entry_type: entry_type.into(),
            generated_id: String::new(),
            photos_id: None,
        };
        entry.generated_id = entry.generate_id();
        entry
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn time(&self) -> &str {
        &self.time
    }

    pub fn time_offset(&self) -> &str {
        &self.time_offset
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn title(&self) -> &[String] {
        &self.title
    }

    pub fn body(&self) -> &[String] {
        &self.body
    }

    pub fn entry_type(&self) -> &str {
        &self.entry_type
    }

    pub fn generated_id(&self) -> &str {
        &self.generated_id
    }

    pub fn photos_id(&self) -> Option<&str> {
        self.photos_id.as_deref()
    }

    pub fn set_photos_id(&mut self, photos_id: impl Into<String>) {
        self.photos_id = Some(photos_id.into());
    }

    /// `date + "T" + time + offset`, e.g. `2025-06-01T09:00:00-07:00`.
    pub fn to_timestamp(&self) -> String {
        format!("{}T{}{}", self.date, self.time, self.time_offset)
    }

    pub fn to_filename(&self) -> String {
        format!("{}.png", self.generated_id)
    }

    /// EXIF `DateTimeOriginal` form: `YYYY:MM:DD HH:MM:SS`.
    pub fn exif_datetime(&self) -> String {
        format!("{} {}", self.date, self.time).replace('-', ":")
    }

    pub fn tags_string(&self) -> String {
        self.tags.join(TAG_SEPARATOR)
    }

    pub fn title_string(&self) -> String {
        self.title.join(PARAGRAPH_SEPARATOR)
    }

    pub fn body_string(&self) -> String {
        self.body.join(PARAGRAPH_SEPARATOR)
    }

    /// Description text for the uploaded photo.
    ///
    /// Prefixed with `Type: <entry type>` when the type is set, followed by
    /// the body paragraphs. Anything longer than `char_limit` characters is
    /// cut to `char_limit - 3` characters and suffixed with `...`.
    pub fn photos_description(&self, char_limit: usize) -> String {
        let mut description = String::new();
        if !self.entry_type.is_empty() {
            description.push_str("Type: ");
            description.push_str(&self.entry_type);
            description.push_str(PARAGRAPH_SEPARATOR);
        }
        description.push_str(&self.body_string());

        if description.chars().count() > char_limit {
            let keep = char_limit.saturating_sub(ELLIPSIS.len());
            let mut truncated: String = description.chars().take(keep).collect();
            truncated.push_str(ELLIPSIS);
            return truncated;
        }
        description
    }

    /// The ten columns of a spreadsheet export row.
    ///
    /// The last column is the UTC timestamp; it is left empty (with a
    /// warning) when the entry's date, time, or offset cannot be converted.
    pub fn to_vector(&self, mode: UtcMode) -> [String; 10] {
        let utc = compute_utc_datetime(&self.date, &self.time, &self.time_offset, mode)
            .unwrap_or_else(|e| {
                log::warn!("entry {}: no UTC timestamp ({e})", self.generated_id);
                String::new()
            });
        [
            self.date.clone(),
            self.time.clone(),
            self.time_offset.clone(),
            self.tags_string(),
            self.title_string(),
            self.body_string(),
            self.entry_type.clone(),
            self.generated_id.clone(),
            self.photos_id.clone().unwrap_or_default(),
            utc,
        ]
    }

    fn generate_id(&self) -> String {
        let mut id = self.to_timestamp();
        id.push('_');
        for tag in &self.tags {
            id.push_str(tag);
            id.push('_');
        }
        id.push_str(&self.entry_type);
        id.push('_');
        id.push_str(&first_n_chars(&self.title, TITLE_ID_CHARS));
        id.push('_');
        id.push_str(&first_n_chars(&self.body, BODY_ID_CHARS));
        normalize_id(&id)
    }
}

/// Take up to `n` characters across `paragraphs`, in order, with one shared
/// budget rather than `n` per paragraph.
fn first_n_chars(paragraphs: &[String], n: usize) -> String {
    paragraphs.iter().flat_map(|p| p.chars()).take(n).collect()
}

/// Lowercase, `:` → `-`, and anything outside `[a-z0-9_+-]` → `_`.
pub fn normalize_id(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| match c {
            ':' => '-',
            'a'..='z' | '0'..='9' | '_' | '+' | '-' => c,
            _ => '_',
        })
        .collect()
}
