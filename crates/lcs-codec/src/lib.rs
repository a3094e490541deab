//! Line codec for the line config store.
//!
//! The document format is a strict subset of `.properties`: one entry per
//! physical line, no escapes, no continuation lines, no sections.
//!
//! ```text
//! comment_or_blank := "" | "#" rest_of_line
//! property_line    := key "=" value
//! ```
//!
//! Keys and values are trimmed. Any other non-empty line is illegal and
//! fails the whole document.

pub mod document;
pub mod error;
pub mod line;

pub use document::{decode_document, encode_document, split_lines, LINE_TERMINATOR};
pub use error::{CodecError, Result};
pub use line::{format_entry, parse_line};
