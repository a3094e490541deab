use std::fmt;

use serde::{Deserialize, Serialize};

/// One line of a configuration document.
///
/// Values are always kept as text; typed views are produced on read by the
/// store. A `Property` key is never empty. A `Comment` carries the whole
/// trimmed line, including the leading `#`, or nothing for a blank line.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Entry {
    /// A blank line or a `#` comment, kept verbatim.
    Comment { text: String },
    /// A `key=value` pair.
    Property { key: String, value: String },
}

impl Entry {
    /// Build a comment entry.
    pub fn comment(text: impl Into<String>) -> Self {
        Self::Comment { text: text.into() }
    }

    /// Build a property entry.
    pub fn property(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Property {
            key: key.into(),
            value: value.into(),
        }
    }

    /// The property key, or `""` for comments.
    pub fn key(&self) -> &str {
        match self {
            Self::Comment { .. } => "",
            Self::Property { key, .. } => key,
        }
    }

    /// The property value, or the verbatim text of a comment.
    pub fn value(&self) -> &str {
        match self {
            Self::Comment { text } => text,
            Self::Property { value, .. } => value,
        }
    }

    /// Returns `true` for `Property` entries.
    pub fn is_property(&self) -> bool {
        matches!(self, Self::Property { .. })
    }

    /// Returns `true` if this is a property whose key equals `key` exactly.
    pub fn matches_key(&self, key: &str) -> bool {
        match self {
            Self::Property { key: k, .. } => k == key,
            Self::Comment { .. } => false,
        }
    }

    fn kind_str(&self) -> &'static str {
        match self {
            Self::Comment { .. } => "comment",
            Self::Property { .. } => "property",
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Entry{{kind={}, key='{}', value='{}'}}",
            self.kind_str(),
            self.key(),
            self.value()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_has_empty_key() {
        let e = Entry::comment("# hello");
        assert_eq!(e.key(), "");
        assert_eq!(e.value(), "# hello");
        assert!(!e.is_property());
    }

    #[test]
    fn property_accessors() {
        let e = Entry::property("name", "Roby");
        assert_eq!(e.key(), "name");
        assert_eq!(e.value(), "Roby");
        assert!(e.is_property());
    }

    #[test]
    fn matches_key_is_exact_and_case_sensitive() {
        let e = Entry::property("Name", "x");
        assert!(e.matches_key("Name"));
        assert!(!e.matches_key("name"));
        assert!(!e.matches_key("Name "));
    }

    #[test]
    fn comment_never_matches_a_key() {
        assert!(!Entry::comment("").matches_key(""));
        assert!(!Entry::comment("#a=b").matches_key("#a"));
    }

    #[test]
    fn display_record_form() {
        let e = Entry::property("height", "173");
        assert_eq!(e.to_string(), "Entry{kind=property, key='height', value='173'}");
        let c = Entry::comment("#c");
        assert_eq!(c.to_string(), "Entry{kind=comment, key='', value='#c'}");
    }

    #[test]
    fn serde_tagged_form() {
        let e = Entry::property("a", "1");
        let json = serde_json::to_string(&e).unwrap();
        assert_eq!(json, r#"{"kind":"property","key":"a","value":"1"}"#);
        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }
}
