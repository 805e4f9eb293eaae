//! Line-level textual diffing
//!
//! Compares two normalized text blocks and produces an ordered edit
//! script. The alignment comes from the `similar` crate's LCS diff over
//! whole lines; every line of either input appears exactly once, tagged
//! unchanged, added, or removed. No other tag kinds exist.

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

/// How a single line changed between two versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditTag {
    Unchanged,
    Added,
    Removed,
}

/// One line of an edit script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineEdit {
    pub tag: EditTag,
    pub text: String,
}

impl LineEdit {
    /// Renders the line with its two-character diff prefix (`"+ "`,
    /// `"- "`, or `"  "`), the form embedded in report payloads.
    pub fn prefixed(&self) -> String {
        let prefix = match self.tag {
            EditTag::Unchanged => "  ",
            EditTag::Added => "+ ",
            EditTag::Removed => "- ",
        };
        format!("{}{}", prefix, self.text)
    }
}

/// Computes the ordered line edit script between two text blocks.
///
/// An empty input contributes zero lines, so a text diffed against `""`
/// comes back all-added or all-removed. Deterministic for identical
/// inputs.
pub fn diff_lines(old: &str, new: &str) -> Vec<LineEdit> {
    let old_lines = split_lines(old);
    let new_lines = split_lines(new);

    TextDiff::from_slices(&old_lines, &new_lines)
        .iter_all_changes()
        .map(|change| LineEdit {
            tag: match change.tag() {
                ChangeTag::Equal => EditTag::Unchanged,
                ChangeTag::Insert => EditTag::Added,
                ChangeTag::Delete => EditTag::Removed,
            },
            text: change.value().to_string(),
        })
        .collect()
}

/// True when the script records any added or removed line.
pub fn has_changes(script: &[LineEdit]) -> bool {
    script.iter().any(|edit| edit.tag != EditTag::Unchanged)
}

fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn new_side(script: &[LineEdit]) -> Vec<&str> {
        script
            .iter()
            .filter(|edit| edit.tag != EditTag::Removed)
            .map(|edit| edit.text.as_str())
            .collect()
    }

    fn old_side(script: &[LineEdit]) -> Vec<&str> {
        script
            .iter()
            .filter(|edit| edit.tag != EditTag::Added)
            .map(|edit| edit.text.as_str())
            .collect()
    }

    #[test]
    fn identical_texts_are_all_unchanged() {
        let script = diff_lines("a\nb\nc", "a\nb\nc");

        assert_eq!(script.len(), 3);
        assert!(!has_changes(&script));
    }

    #[test]
    fn a_changed_line_appears_as_remove_plus_add() {
        let script = diff_lines("a\nb\nc", "a\nx\nc");

        assert!(script.contains(&LineEdit {
            tag: EditTag::Removed,
            text: "b".to_string()
        }));
        assert!(script.contains(&LineEdit {
            tag: EditTag::Added,
            text: "x".to_string()
        }));
        assert!(has_changes(&script));
    }

    #[test]
    fn empty_old_side_degenerates_to_all_added() {
        let script = diff_lines("", "a\nb");

        assert_eq!(script.len(), 2);
        assert!(script.iter().all(|edit| edit.tag == EditTag::Added));
    }

    #[test]
    fn empty_new_side_degenerates_to_all_removed() {
        let script = diff_lines("a\nb", "");

        assert_eq!(script.len(), 2);
        assert!(script.iter().all(|edit| edit.tag == EditTag::Removed));
    }

    #[test]
    fn both_sides_empty_is_an_empty_script() {
        assert!(diff_lines("", "").is_empty());
    }

    #[test]
    fn script_preserves_line_order() {
        let script = diff_lines("a\nb", "b\nc");

        let new: Vec<&str> = new_side(&script);
        assert_eq!(new, vec!["b", "c"]);
        let old: Vec<&str> = old_side(&script);
        assert_eq!(old, vec!["a", "b"]);
    }

    #[test]
    fn edits_serialize_with_lowercase_tags() {
        let edit = LineEdit {
            tag: EditTag::Added,
            text: "<v>1</v>".to_string(),
        };

        assert_eq!(
            serde_json::to_string(&edit).unwrap(),
            r#"{"tag":"added","text":"<v>1</v>"}"#
        );
    }

    #[test]
    fn prefixed_form_uses_two_character_markers() {
        assert_eq!(
            LineEdit {
                tag: EditTag::Added,
                text: "<v>1</v>".to_string()
            }
            .prefixed(),
            "+ <v>1</v>"
        );
        assert_eq!(
            LineEdit {
                tag: EditTag::Removed,
                text: "x".to_string()
            }
            .prefixed(),
            "- x"
        );
        assert_eq!(
            LineEdit {
                tag: EditTag::Unchanged,
                text: "x".to_string()
            }
            .prefixed(),
            "  x"
        );
    }

    proptest! {
        #[test]
        fn reconstruction_reproduces_both_sides(
            old_lines in prop::collection::vec("[a-z<>/ ]{0,8}", 0..12),
            new_lines in prop::collection::vec("[a-z<>/ ]{0,8}", 0..12),
        ) {
            let old = old_lines.join("\n");
            let new = new_lines.join("\n");
            let script = diff_lines(&old, &new);

            prop_assert_eq!(new_side(&script), split_lines(&new));
            prop_assert_eq!(old_side(&script), split_lines(&old));
        }

        #[test]
        fn deterministic_for_identical_inputs(
            old in "[a-z\\n]{0,40}",
            new in "[a-z\\n]{0,40}",
        ) {
            prop_assert_eq!(diff_lines(&old, &new), diff_lines(&old, &new));
        }
    }
}
