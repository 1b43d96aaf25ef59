//! Google Docs document flattening.
//!
//! A `documents.get` response nests text as body → structural elements →
//! paragraph → paragraph elements → text runs. Only paragraphs matter for
//! journal extraction; tables, section breaks, and other structural elements
//! are skipped. Each paragraph becomes one [`Block`]:
//!
//! ```text
//! {"paragraph": {"elements": [
//!     {"textRun": {"content": "My ",    "textStyle": {"bold": true}}},
//!     {"textRun": {"content": "Title\n", "textStyle": {}}}
//! ]}}
//!   → Block { text: "My Title\n", bold: true }
//! ```
//!
//! A paragraph is bold when any run carries an explicit `bold: true`,
//! ignoring a run that is only the trailing `"\n"`.

use crate::types::Block;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("malformed document: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct Document {
    body: Body,
}

#[derive(Debug, Deserialize)]
struct Body {
    content: Vec<StructuralElement>,
}

#[derive(Debug, Deserialize)]
struct StructuralElement {
    #[serde(default)]
    paragraph: Option<Paragraph>,
}

#[derive(Debug, Deserialize)]
struct Paragraph {
    #[serde(default)]
    elements: Vec<ParagraphElement>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParagraphElement {
    #[serde(default)]
    text_run: Option<TextRun>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextRun {
    content: String,
    #[serde(default)]
    text_style: TextStyle,
}

#[derive(Debug, Default, Deserialize)]
struct TextStyle {
    #[serde(default)]
    bold: Option<bool>,
}

/// Flatten a Docs JSON payload into paragraph blocks, in document order.
///
/// Fails with [`DocumentError::Malformed`] when the payload is not JSON or
/// lacks the `body.content` array.
pub fn parse_blocks(json: &str) -> Result<Vec<Block>, DocumentError> {
    let document: Document = serde_json::from_str(json)?;
    Ok(document
        .body
        .content
        .into_iter()
        .filter_map(|element| element.paragraph)
        .map(paragraph_to_block)
        .collect())
}

fn paragraph_to_block(paragraph: Paragraph) -> Block {
    let mut text = String::new();
    let mut bold = false;
    for run in paragraph.elements.into_iter().filter_map(|e| e.text_run) {
        if !bold && run.content != "\n" {
            if let Some(run_bold) = run.text_style.bold {
                bold = run_bold;
            }
        }
        text.push_str(&run.content);
    }
    Block { text, bold }
}
