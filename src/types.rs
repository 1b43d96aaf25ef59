//! Shared types passed between the document, extraction, and render stages.

use serde::{Deserialize, Serialize};

/// One paragraph of the source document, flattened to text plus a bold flag.
///
/// A block whose trimmed text is empty is a blank line. Blank lines are
/// meaningful: two in a row end the current journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub text: String,
    /// True when any non-newline run in the paragraph is bold.
    #[serde(default)]
    pub bold: bool,
}

impl Block {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }

    pub fn blank() -> Self {
        Self::plain("")
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
