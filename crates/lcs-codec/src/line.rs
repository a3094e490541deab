use lcs_types::Entry;

use crate::error::{CodecError, Result};

/// Parse one physical line into an [`Entry`].
///
/// The line is trimmed first. Empty lines and lines starting with `#` become
/// comments holding the trimmed text. Otherwise the line is split at its
/// first `=`; a missing `=` or an empty key is an error.
///
/// # Examples
///
/// ```
/// use lcs_codec::parse_line;
/// use lcs_types::Entry;
///
/// assert_eq!(parse_line(" a = b ").unwrap(), Entry::property("a", "b"));
/// assert_eq!(parse_line("# note").unwrap(), Entry::comment("# note"));
/// assert!(parse_line("=x").is_err());
/// ```
pub fn parse_line(raw: &str) -> Result<Entry> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(Entry::comment(line));
    }

    match line.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok(Entry::property(key.trim(), value.trim())),
        _ => Err(CodecError::IllegalLine {
            line_no: 0,
            line: line.to_string(),
        }),
    }
}

/// Format an entry as one line, without a terminator.
pub fn format_entry(entry: &Entry) -> String {
    match entry {
        Entry::Comment { text } => text.clone(),
        Entry::Property { key, value } => format!("{key}={value}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // -----------------------------------------------------------------------
    // Comments and blank lines
    // -----------------------------------------------------------------------

    #[test]
    fn blank_line_is_empty_comment() {
        assert_eq!(parse_line("").unwrap(), Entry::comment(""));
        assert_eq!(parse_line("   \t").unwrap(), Entry::comment(""));
    }

    #[test]
    fn comment_is_trimmed_but_otherwise_verbatim() {
        assert_eq!(parse_line("  #a = b  ").unwrap(), Entry::comment("#a = b"));
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    #[test]
    fn key_and_value_are_trimmed() {
        assert_eq!(
            parse_line("  name =  Roby ").unwrap(),
            Entry::property("name", "Roby")
        );
    }

    #[test]
    fn splits_at_first_equals_only() {
        assert_eq!(
            parse_line("url=http://x/?a=b").unwrap(),
            Entry::property("url", "http://x/?a=b")
        );
    }

    #[test]
    fn trailing_equals_gives_empty_value() {
        assert_eq!(parse_line("empty=").unwrap(), Entry::property("empty", ""));
    }

    #[test]
    fn hash_inside_value_is_not_a_comment() {
        assert_eq!(parse_line("color=#fff").unwrap(), Entry::property("color", "#fff"));
    }

    // -----------------------------------------------------------------------
    // Illegal lines
    // -----------------------------------------------------------------------

    #[test]
    fn line_without_equals_is_illegal() {
        let err = parse_line("badline").unwrap_err();
        assert_eq!(
            err,
            CodecError::IllegalLine {
                line_no: 0,
                line: "badline".into()
            }
        );
    }

    #[test]
    fn leading_equals_is_illegal() {
        assert!(parse_line("=value").is_err());
        assert!(parse_line("   = value").is_err());
    }

    // -----------------------------------------------------------------------
    // Formatting
    // -----------------------------------------------------------------------

    #[test]
    fn format_property_and_comment() {
        assert_eq!(format_entry(&Entry::property("a", "1")), "a=1");
        assert_eq!(format_entry(&Entry::property("a", "")), "a=");
        assert_eq!(format_entry(&Entry::comment("# x")), "# x");
        assert_eq!(format_entry(&Entry::comment("")), "");
    }

    proptest! {
        #[test]
        fn property_round_trips(
            key in "[A-Za-z_][A-Za-z0-9_.-]{0,15}",
            value in "[A-Za-z0-9_.:/#-]{0,16}",
        ) {
            let entry = Entry::property(key, value);
            prop_assert_eq!(parse_line(&format_entry(&entry)).unwrap(), entry);
        }

        #[test]
        fn comment_round_trips(body in "[ -~]{0,24}") {
            let entry = parse_line(&format!("#{body}")).unwrap();
            prop_assert!(!entry.is_property());
            prop_assert_eq!(parse_line(&format_entry(&entry)).unwrap(), entry);
        }
    }
}
