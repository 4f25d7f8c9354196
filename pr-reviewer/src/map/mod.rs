//! Coordinate projections over parsed hunks.
//!
//! Two anchoring schemes are derived from the same `Hunk`/`DiffLine` records:
//! - line + side (current): the dual-numbered stream rendered for prompts,
//!   and the per-side bounds used by placement validation;
//! - flat position (legacy): `{line_number, position}` per added line, where
//!   position counts every raw patch line, headers included.

use crate::parser::{Hunk, LineTag, PositionRecord};

/// Placeholder for the side a line does not exist on.
const ABSENT: &str = "---";

/// Renders a hunk body as `OLD|NEW|CHANGED|TEXT` rows, one per line.
///
/// The header line is not included.
pub fn numbered_content(hunk: &Hunk) -> String {
    hunk.lines
        .iter()
        .map(|l| {
            format!(
                "{}|{}|{}|{}",
                fmt_line(l.old_line),
                fmt_line(l.new_line),
                l.is_changed(),
                l.text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn fmt_line(n: Option<u32>) -> String {
    n.map_or_else(|| ABSENT.to_string(), |n| n.to_string())
}

/// Legacy flat-position records for every added line, in patch order.
///
/// Unlike the classic line-walking algorithm, `\ No newline at end of file`
/// markers do not advance the new-side line number here.
pub fn positions(hunks: &[Hunk]) -> Vec<PositionRecord> {
    hunks
        .iter()
        .flat_map(|h| h.lines.iter())
        .filter(|l| l.tag == LineTag::Added)
        .filter_map(|l| {
            l.new_line.map(|line_number| PositionRecord {
                line_number,
                position: l.position,
            })
        })
        .collect()
}

/// Flat position of the added line at `line_number`, if any.
pub fn position_of(hunks: &[Hunk], line_number: u32) -> Option<u32> {
    positions(hunks)
        .into_iter()
        .find(|r| r.line_number == line_number)
        .map(|r| r.position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_patch;

    fn rec(line_number: u32, position: u32) -> PositionRecord {
        PositionRecord {
            line_number,
            position,
        }
    }

    #[test]
    fn one_line_change_in_workflow() {
        let patch = "@@ -43,7 +43,7 @@ jobs:
     runs-on: ubuntu-latest
     steps:
       - uses: actions/checkout@11bd71901bbe5b1630ceea73d27597364c9af683 # v4.2.2
-      - uses: nakamasato/github-actions/llm-pr-reviewer@nakamasato-patch-1
+      - uses: nakamasato/github-actions/llm-pr-reviewer@only-comment
         with:
           github_token: ${{ secrets.GITHUB_TOKEN }}
           openai_api_key: ${{ secrets.OPENAI_API_KEY_PR_AGENT }}";
        let hunks = parse_patch(patch);
        assert_eq!(positions(&hunks), vec![rec(46, 6)]);
        assert_eq!(position_of(&hunks, 46), Some(6));
        assert_eq!(position_of(&hunks, 45), None);
    }

    #[test]
    fn multi_line_change() {
        let patch = "@@ -10,8 +10,9 @@ def analyze_code(changed_content: str, filename: str):
     # Initialize analysis
     results = []

-    # Process code
-    for line in changed_content.split(\"\\n\"):
+    # Process code with improved handling
+    lines = changed_content.split(\"\\n\")
+    for line in lines:
         # Analysis logic here
         pass
         ";
        assert_eq!(
            positions(&parse_patch(patch)),
            vec![rec(13, 7), rec(14, 8), rec(15, 9)]
        );
    }

    #[test]
    fn positions_span_hunks() {
        let patch = "@@ -5,6 +5,7 @@ def foo():
     # First change
     print(\"hello\")
+    print(\"world\")

@@ -20,7 +21,7 @@ def bar():
     # Second change
-    return False
+    return True
     ";
        assert_eq!(positions(&parse_patch(patch)), vec![rec(7, 4), rec(22, 9)]);
    }

    #[test]
    fn no_newline_marker_does_not_shift_positions() {
        let patch = "@@ -1 +1,2 @@\n-a\n\\ No newline at end of file\n+a\n+b";
        assert_eq!(positions(&parse_patch(patch)), vec![rec(1, 4), rec(2, 5)]);
    }

    #[test]
    fn context_only_and_empty_patches_have_no_positions() {
        let patch = "@@ -10,5 +10,5 @@ def analyze_code():
     # This is just context
     # More context
     ";
        assert!(positions(&parse_patch(patch)).is_empty());
        assert!(positions(&parse_patch("")).is_empty());
    }

    #[test]
    fn numbered_rows_mark_absent_sides() {
        let hunks = parse_patch("@@ -25,4 +25,5 @@ jobs:\n   with:\n-  a: 1\n+  a: 2\n+  b: 3\n   run: x");
        assert_eq!(
            numbered_content(&hunks[0]),
            "25|25|false|   with:\n\
             26|---|true|-  a: 1\n\
             ---|26|true|+  a: 2\n\
             ---|27|true|+  b: 3\n\
             27|28|false|   run: x"
        );
    }
}
