//! Whole-document decode/encode on top of the line codec.

use lcs_types::Entry;
use tracing::debug;

use crate::error::{CodecError, Result};
use crate::line::{format_entry, parse_line};

/// Terminator written after every entry.
pub const LINE_TERMINATOR: &str = "\n";

/// Split text into physical lines.
///
/// Accepts `\n`, `\r\n` and bare `\r` terminators. A final terminator does
/// not produce a trailing empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(['\n', '\r']) {
            Some(pos) => {
                lines.push(&rest[..pos]);
                let skip = if rest[pos..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[pos + skip..];
            }
            None => {
                lines.push(rest);
                break;
            }
        }
    }
    lines
}

/// Decode a document into entries, in order.
///
/// Stops at the first illegal line; nothing decoded so far is returned.
pub fn decode_document(text: &str) -> Result<Vec<Entry>> {
    let entries = split_lines(text)
        .into_iter()
        .enumerate()
        .map(|(idx, raw)| {
            parse_line(raw).map_err(|CodecError::IllegalLine { line, .. }| {
                CodecError::IllegalLine {
                    line_no: idx + 1,
                    line,
                }
            })
        })
        .collect::<Result<Vec<_>>>()?;
    debug!(entries = entries.len(), "document decoded");
    Ok(entries)
}

/// Encode entries as a document, one per line, each followed by
/// [`LINE_TERMINATOR`].
pub fn encode_document(entries: &[Entry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format_entry(entry));
        out.push_str(LINE_TERMINATOR);
    }
    out
}
