//! Shared test utilities for the journal-cards test suite.
//!
//! Provides builders for Docs JSON payloads and block sequences, plus a
//! default extraction config with DST adjustment turned off so expectations
//! do not depend on the calendar.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let json = docs_json(&[para("2025-06-01", false), para("Title", true)]);
//! let entries = DocsEntryExtractor::new(test_extract_config())
//!     .extract_entries(&json)
//!     .unwrap();
//! ```

use crate::extract::ExtractConfig;
use crate::types::Block;

// =========================================================================
// Docs JSON builders
// =========================================================================

/// A paragraph description for [`docs_json`]: `(text, bold)`.
pub fn para(text: &str, bold: bool) -> (String, bool) {
    (text.to_string(), bold)
}

/// Build a minimal `documents.get` payload, one single-run paragraph per
/// item. A trailing newline is appended to each run like Docs does.
pub fn docs_json(paragraphs: &[(String, bool)]) -> String {
    let content: Vec<serde_json::Value> = paragraphs
        .iter()
        .map(|(text, bold)| {
            serde_json::json!({
                "paragraph": {
                    "elements": [{
                        "textRun": {
                            "content": format!("{text}\n"),
                            "textStyle": text_style(*bold)
                        }
                    }]
                }
            })
        })
        .collect();
    serde_json::json!({ "body": { "content": content } }).to_string()
}

fn text_style(bold: bool) -> serde_json::Value {
    if bold {
        serde_json::json!({ "bold": true })
    } else {
        serde_json::json!({})
    }
}

// =========================================================================
// Block builders
// =========================================================================

/// Build blocks from `(text, bold)` pairs.
pub fn blocks(items: &[(&str, bool)]) -> Vec<Block> {
    items
        .iter()
        .map(|(text, bold)| Block {
            text: text.to_string(),
            bold: *bold,
        })
        .collect()
}

// =========================================================================
// Config
// =========================================================================

/// Extraction defaults with DST adjustment off.
pub fn test_extract_config() -> ExtractConfig {
    ExtractConfig {
        default_time: "23:59:59".to_string(),
        default_timezone_offset: "+00:00".to_string(),
        adjust_for_daylight_savings: false,
    }
}
