//! Text encodings for configuration documents.
//!
//! Decoding is lenient: malformed input becomes U+FFFD. Encoding replaces
//! characters outside the charset's repertoire with `?`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TypeError};

const REPLACEMENT: char = char::REPLACEMENT_CHARACTER;
const UNMAPPABLE: u8 = b'?';

/// A supported text encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Charset {
    #[default]
    Utf8,
    UsAscii,
    Iso8859_1,
    Utf16Be,
    Utf16Le,
    /// UTF-16 with byte-order detection on read; big-endian with BOM on write.
    Utf16,
}

impl Charset {
    /// Canonical name, e.g. `"UTF-8"`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::UsAscii => "US-ASCII",
            Self::Iso8859_1 => "ISO-8859-1",
            Self::Utf16Be => "UTF-16BE",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16 => "UTF-16",
        }
    }

    /// Resolve a charset by name or alias, ignoring case.
    pub fn for_name(name: &str) -> Result<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        let charset = match normalized.as_str() {
            "utf-8" | "utf8" => Self::Utf8,
            "us-ascii" | "ascii" | "iso646-us" => Self::UsAscii,
            "iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" | "l1" => Self::Iso8859_1,
            "utf-16be" | "utf16be" | "unicodebigunmarked" => Self::Utf16Be,
            "utf-16le" | "utf16le" | "unicodelittleunmarked" => Self::Utf16Le,
            "utf-16" | "utf16" => Self::Utf16,
            _ => return Err(TypeError::UnsupportedCharset(name.to_string())),
        };
        Ok(charset)
    }

    /// Decode `bytes` into text.
    pub fn decode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::UsAscii => bytes
                .iter()
                .map(|&b| if b.is_ascii() { b as char } else { REPLACEMENT })
                .collect(),
            Self::Iso8859_1 => bytes.iter().map(|&b| b as char).collect(),
            Self::Utf16Be => decode_utf16(bytes, u16::from_be_bytes),
            Self::Utf16Le => decode_utf16(bytes, u16::from_le_bytes),
            Self::Utf16 => match bytes {
                [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
                [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
                _ => decode_utf16(bytes, u16::from_be_bytes),
            },
        }
    }

    /// Encode `text` into bytes.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => text.as_bytes().to_vec(),
            Self::UsAscii => text
                .chars()
                .map(|c| if c.is_ascii() { c as u8 } else { UNMAPPABLE })
                .collect(),
            Self::Iso8859_1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(UNMAPPABLE))
                .collect(),
            Self::Utf16Be => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
            Self::Utf16Le => text.encode_utf16().flat_map(u16::to_le_bytes).collect(),
            Self::Utf16 => {
                let mut out = vec![0xFE, 0xFF];
                out.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
                out
            }
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let chunks = bytes.chunks_exact(2);
    let dangling = !chunks.remainder().is_empty();
    let units = chunks.map(|pair| unit([pair[0], pair[1]]));
    let mut text: String = char::decode_utf16(units)
        .map(|r| r.unwrap_or(REPLACEMENT))
        .collect();
    if dangling {
        text.push(REPLACEMENT);
    }
    text
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Charset {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::for_name(s)
    }
}

impl TryFrom<String> for Charset {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self> {
        Self::for_name(&value)
    }
}

impl From<Charset> for String {
    fn from(charset: Charset) -> Self {
        charset.name().to_string()
    }
}
