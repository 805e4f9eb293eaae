//! Text normalization ahead of line diffing
//!
//! Two serializations of the same pipeline fragment can differ in ways
//! that carry no meaning: step coordinates moved around in an editor,
//! line endings rewritten by another OS, or characters escaped as
//! numeric references. Normalization erases those differences so the
//! line differ only reports real changes.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static CHAR_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#x([0-9a-fA-F]+);").unwrap());

static NOISE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(?:xloc|yloc|width|height)>.*?</(?:xloc|yloc|width|height)>").unwrap()
});

static LINE_ENDINGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n|\r").unwrap());

static TAG_GAP: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">\s*<").unwrap());

/// Canonicalizes a pipeline fragment's serialization for diffing.
///
/// Decodes hex character references, strips layout-only fields (`xloc`,
/// `yloc`, `width`, `height`), collapses line endings to `\n`, puts
/// every tag on its own line, and trims the result. Idempotent: feeding
/// the output back in returns it unchanged.
pub fn normalize(text: &str) -> String {
    let text = fixpoint(text, decode_char_refs);
    let text = fixpoint(&text, strip_noise_fields);
    let text = LINE_ENDINGS.replace_all(&text, "\n");
    let text = TAG_GAP.replace_all(&text, ">\n<");
    text.trim().to_string()
}

/// Applies `pass` until the text stops changing.
///
/// Decoding can surface new references (`&#x26;#x41;` decodes to
/// `&#x41;`) and stripping can surface new noise fields, so a single
/// pass of either would not leave a stable result.
fn fixpoint(text: &str, pass: impl Fn(&str) -> String) -> String {
    let mut current = text.to_string();
    loop {
        let next = pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Decodes `&#xNN;` references; invalid scalar values stay verbatim.
fn decode_char_refs(text: &str) -> String {
    CHAR_REF
        .replace_all(text, |caps: &Captures<'_>| {
            u32::from_str_radix(&caps[1], 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn strip_noise_fields(text: &str) -> String {
    NOISE_FIELD.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_coordinate_fields() {
        let text = "<step><name>Sort</name><xloc>120</xloc><yloc>64</yloc></step>";
        let normalized = normalize(text);

        assert!(!normalized.contains("xloc"));
        assert!(!normalized.contains("yloc"));
        assert!(normalized.contains("Sort"));
    }

    #[test]
    fn strips_size_fields() {
        let text = "<canvas><width>800</width><height>600</height></canvas>";
        let normalized = normalize(text);

        assert!(!normalized.contains("width"));
        assert!(!normalized.contains("height"));
    }

    #[test]
    fn collapses_line_endings() {
        assert_eq!(normalize("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn puts_each_tag_on_its_own_line() {
        assert_eq!(normalize("<a><b>1</b>  <c/></a>"), "<a>\n<b>1</b>\n<c/>\n</a>");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize("  <a/> \n"), "<a/>");
    }

    #[test]
    fn decodes_hex_character_references() {
        assert_eq!(normalize("caf&#xe9;"), "café");
        assert_eq!(normalize("&#x41;&#x42;"), "AB");
    }

    #[test]
    fn same_character_encoded_two_ways_compares_equal() {
        assert_eq!(normalize("<v>caf&#xe9;</v>"), normalize("<v>café</v>"));
    }

    #[test]
    fn invalid_character_reference_is_kept_verbatim() {
        assert_eq!(normalize("&#xDFFF;"), "&#xDFFF;");
        assert_eq!(normalize("&#xFFFFFFFF;"), "&#xFFFFFFFF;");
    }

    #[test]
    fn decoding_runs_to_a_fixed_point() {
        // The first decode surfaces a second reference.
        assert_eq!(normalize("&#x26;#x41;"), "A");
    }

    #[test]
    fn stripping_runs_to_a_fixed_point() {
        // Stripping the inner field surfaces an outer one.
        assert_eq!(normalize("<xl<xloc>1</xloc>oc>2</xloc>"), "");
    }

    #[test]
    fn idempotent_on_a_realistic_fragment() {
        let text = "<step>\r\n  <name>Sort rows</name>\r\n  <xloc>96</xloc>\r\n</step>";
        let once = normalize(text);

        assert_eq!(normalize(&once), once);
    }

    proptest! {
        #[test]
        fn idempotent_for_arbitrary_input(
            s in r"(<xloc>|</xloc>|<width>|</width>|<step>|</step>|&#x3c;|&#x3e;|&#xd;|&#x26;|&#x41;|[a-z0-9<>&; \r\n\t]){0,60}"
        ) {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once.clone());
        }

        #[test]
        fn never_leaves_coordinate_fields(
            body in "[a-z0-9 ]{0,12}",
            tag in prop::sample::select(vec!["xloc", "yloc", "width", "height"])
        ) {
            let text = format!("<step><{tag}>{body}</{tag}><name>n</name></step>");
            let needle = format!("<{}>", tag);
            prop_assert!(!normalize(&text).contains(&needle));
        }
    }
}
