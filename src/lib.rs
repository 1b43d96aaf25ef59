//! # Journal Cards
//!
//! Turns a journal kept in a Google Doc into dated entries and a title card
//! image per entry. The document is the data source: a date line opens a
//! day, bold paragraphs are titles, `A|B` lines are tags, and two blank
//! paragraphs in a row close an entry.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! Each stage produces a JSON manifest the next stage consumes:
//!
//! ```text
//! 1. Extract   document.json  →  entries.json   (Docs JSON → entries)
//! 2. Render    entries.json   →  images/        (one PNG per entry + rows.json)
//! ```
//!
//! Both manifests are plain JSON, so a run can be inspected or replayed from
//! either point. Neither stage talks to the network; fetching the document
//! and uploading the cards are left to other tools.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`document`] | Docs `documents.get` JSON → ordered paragraph blocks |
//! | [`extract`] | Stage 1: the entry state machine over blocks, plus the entries manifest |
//! | [`entry`] | The entry record: generated id, filename, EXIF date, photo description, export row |
//! | [`time`] | Date/time token grammar, US DST window, UTC conversion |
//! | [`layout`] | Fit-and-grow text layout and the font rendering backend |
//! | [`render`] | Stage 2: renders every entry's title card in parallel and exports rows |
//! | [`config`] | `journal.toml` loading, merging, and validation |
//! | [`types`] | Shared types (`Block`) |
//! | [`output`] | CLI output formatting for both stages |
//!
//! # Design Decisions
//!
//! ## Extraction as a Fold
//!
//! The extractor's accumulator is a plain struct threaded through a fold over
//! the blocks, one `step` per block. Each transition can be tested on its
//! own, and nothing outlives a single extraction call.
//!
//! ## Fit-and-Grow as a Bounded Loop
//!
//! Titles are wrapped at a fixed font size; when they do not fit, the canvas
//! grows 100px at a time, keeping its aspect ratio. Growth stops at
//! `layout.max_height`, so a word that can never fit is reported instead of
//! growing forever.
//!
//! ## Measuring Behind a Trait
//!
//! The layout engine only needs text widths. It takes any
//! [`layout::TextMeasurer`], so the whole layout path runs in tests with a
//! fixed-advance mock and no font file.

pub mod config;
pub mod document;
pub mod entry;
pub mod extract;
pub mod layout;
pub mod output;
pub mod render;
pub mod time;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
