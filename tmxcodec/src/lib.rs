#![forbid(unsafe_code)]
//! Translation Memory eXchange (TMX 1.4b) toolkit for Rust.
//!
//! Parses TMX documents into a mutable object model, lets you edit it, and
//! writes it back out, enforcing the TMX 1.4b attribute constraints on the
//! way. Segment content keeps its inline markup (`<bpt>`, `<ept>`, `<ph>`,
//! `<hi>`, ...) as an ordered sequence of typed runs, so nothing is lost in
//! a round-trip.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tmxcodec::{Parser, Tmx};
//!
//! let mut memory = Tmx::read_from("memory.tmx")?;
//! for tu in memory.iter() {
//!     for tuv in &tu.tuvs {
//!         println!("{}: {}", tuv.lang, tuv.plain_text());
//!     }
//! }
//!
//! // Drop every French variant, then write the file back.
//! for tu in memory.iter_mut() {
//!     tu.tuvs.retain(|tuv| tuv.lang != "fr-FR");
//! }
//! memory.write_to("memory_out.tmx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Guarantees
//!
//! - Parsing is strict and all-or-nothing: unknown elements, unknown inline
//!   tags and malformed attribute values abort the parse instead of being
//!   silently dropped.
//! - Export validates the whole document in memory first; a failed export
//!   never leaves a partial file behind.
//! - Timestamps (`YYYYMMDDThhmmssZ`) and segment content round-trip exactly.

pub mod attr;
pub mod error;
pub mod export;
pub mod inline;
pub mod traits;
pub mod types;
pub mod xml;

// Re-export most used types for easy consumption
pub use crate::{
    attr::{Assoc, Pos, Segtype},
    error::Error,
    export::{to_csv_writer, write_csv},
    inline::{Bpt, CodeRun, Ept, Hi, It, Ph, Run, Sub, Ut},
    traits::{FromElement, Parser, ToElement},
    types::{Header, Note, Prop, Tmx, Tu, Tuv, Ude, UdeMap},
};
