use tracing::debug;

use super::hunk_header::parse_hunk_header;
use super::types::{DiffLine, Hunk, HunkHeader, LineTag};

/// Accumulates one hunk while scanning, with its running old/new counters.
///
/// A counter becomes `None` once it runs past `u32::MAX`.
struct HunkBuilder {
    header: HunkHeader,
    header_text: String,
    position: u32,
    old_line: Option<u32>,
    new_line: Option<u32>,
    lines: Vec<DiffLine>,
}

impl HunkBuilder {
    fn new(header: HunkHeader, header_text: &str, position: u32) -> Self {
        Self {
            header,
            header_text: header_text.to_string(),
            position,
            old_line: Some(header.old_start),
            new_line: Some(header.new_start),
            lines: Vec::new(),
        }
    }

    /// Appends one body line. Returns `None` when the line would need a line
    /// number past `u32::MAX`; the line is not recorded then.
    fn push(&mut self, raw: &str, position: u32) -> Option<()> {
        let (tag, old_line, new_line) = if raw.starts_with('-') {
            let old = self.old_line?;
            self.old_line = old.checked_add(1);
            (LineTag::Removed, Some(old), None)
        } else if raw.starts_with('+') {
            let new = self.new_line?;
            self.new_line = new.checked_add(1);
            (LineTag::Added, None, Some(new))
        } else {
            let (old, new) = (self.old_line?, self.new_line?);
            self.old_line = old.checked_add(1);
            self.new_line = new.checked_add(1);
            (LineTag::Context, Some(old), Some(new))
        };

        self.lines.push(DiffLine {
            text: raw.to_string(),
            tag,
            old_line,
            new_line,
            position,
        });
        Some(())
    }

    fn finish(self) -> Hunk {
        Hunk {
            header: self.header,
            header_text: self.header_text,
            position: self.position,
            lines: self.lines,
        }
    }
}

/// Splits one file's unified diff into hunks with dual line numbering.
///
/// - Lines before the first `@@` header are ignored.
/// - A `@@` line that does not parse closes the current hunk; lines up to the
///   next valid header are dropped.
/// - A hunk whose line numbers would run past `u32::MAX` is closed at the
///   last representable line; the rest of its body is dropped.
/// - `\ No newline at end of file` markers keep their raw position but get no
///   coordinates.
/// - Empty input yields an empty list.
pub fn parse_patch(patch: &str) -> Vec<Hunk> {
    let mut hunks = Vec::new();
    let mut current: Option<HunkBuilder> = None;

    for (idx, raw) in patch.lines().enumerate() {
        let position = idx as u32 + 1;

        if raw.starts_with("@@") {
            if let Some(done) = current.take() {
                hunks.push(done.finish());
            }
            match parse_hunk_header(raw) {
                Some(header) => current = Some(HunkBuilder::new(header, raw, position)),
                None => debug!(position, line = raw, "skipping malformed hunk header"),
            }
            continue;
        }

        if raw.starts_with('\\') {
            continue;
        }

        let overflowed = current
            .as_mut()
            .is_some_and(|builder| builder.push(raw, position).is_none());
        if overflowed {
            debug!(position, line = raw, "line number overflow, closing hunk");
            if let Some(done) = current.take() {
                hunks.push(done.finish());
            }
        }
    }

    if let Some(done) = current {
        hunks.push(done.finish());
    }
    hunks
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORKFLOW: &str = "@@ -43,7 +43,7 @@ jobs:
     runs-on: ubuntu-latest
     steps:
       - uses: actions/checkout@11bd71901bbe5b1630ceea73d27597364c9af683 # v4.2.2
-      - uses: nakamasato/github-actions/llm-pr-reviewer@nakamasato-patch-1
+      - uses: nakamasato/github-actions/llm-pr-reviewer@only-comment
         with:
           github_token: ${{ secrets.GITHUB_TOKEN }}
           openai_api_key: ${{ secrets.OPENAI_API_KEY_PR_AGENT }}";

    const TWO_HUNKS: &str = "@@ -5,6 +5,7 @@ def foo():
     # First change
     print(\"hello\")
+    print(\"world\")

@@ -20,7 +21,7 @@ def bar():
     # Second change
-    return False
+    return True
     ";

    #[test]
    fn empty_and_headerless_patches_yield_nothing() {
        assert!(parse_patch("").is_empty());
        assert!(parse_patch("just text\n+added\n-removed").is_empty());
    }

    #[test]
    fn single_hunk_bounds_and_numbering() {
        let hunks = parse_patch(WORKFLOW);
        assert_eq!(hunks.len(), 1);
        let h = &hunks[0];
        assert_eq!(
            (h.old_start_line(), h.old_end_line(), h.new_start_line(), h.new_end_line()),
            (43, 49, 43, 49)
        );
        assert_eq!(h.lines.len(), 8);

        let removed = &h.lines[3];
        assert_eq!(removed.tag, LineTag::Removed);
        assert_eq!((removed.old_line, removed.new_line), (Some(46), None));

        let added = &h.lines[4];
        assert_eq!(added.tag, LineTag::Added);
        assert_eq!((added.old_line, added.new_line), (None, Some(46)));
        assert_eq!(added.position, 6);

        let ctx = &h.lines[5];
        assert!(!ctx.is_changed());
        assert_eq!((ctx.old_line, ctx.new_line), (Some(47), Some(47)));
    }

    #[test]
    fn removal_then_additions() {
        let patch = "@@ -10,8 +10,9 @@ def analyze_code(changed_content: str, filename: str):
     # Initialize analysis
     results = []

-    # Process code
+    # Process code with improved handling
+    lines = changed_content.split(\"\\n\")
     for line in lines:";
        let hunks = parse_patch(patch);
        assert_eq!(hunks.len(), 1);
        assert_eq!(hunks[0].old_end_line(), 17);
        assert_eq!(hunks[0].new_end_line(), 18);

        let added: Vec<_> = hunks[0]
            .lines
            .iter()
            .filter(|l| l.tag == LineTag::Added)
            .map(|l| l.new_line)
            .collect();
        assert_eq!(added, vec![Some(13), Some(14)]);
        let last = hunks[0].lines.last().unwrap();
        assert_eq!((last.old_line, last.new_line), (Some(14), Some(15)));
    }

    #[test]
    fn hunks_keep_independent_counters() {
        let hunks = parse_patch(TWO_HUNKS);
        assert_eq!(hunks.len(), 2);
        assert_eq!((hunks[0].new_start_line(), hunks[0].new_end_line()), (5, 11));
        assert_eq!((hunks[1].old_start_line(), hunks[1].new_start_line()), (20, 21));

        let first_second = &hunks[1].lines[0];
        assert_eq!((first_second.old_line, first_second.new_line), (Some(20), Some(21)));
        assert_eq!(hunks[1].position, 6);
        assert_eq!(hunks[1].header_text, "@@ -20,7 +21,7 @@ def bar():");
    }

    #[test]
    fn parsing_is_idempotent() {
        assert_eq!(parse_patch(TWO_HUNKS), parse_patch(TWO_HUNKS));
        assert_eq!(parse_patch(WORKFLOW), parse_patch(WORKFLOW));
    }

    #[test]
    fn malformed_header_drops_its_body() {
        let patch = "@@ -1,2 +1,2 @@\n a\n-b\n+c\n@@ nonsense @@\n+lost\n@@ -9 +9 @@\n-x\n+y";
        let hunks = parse_patch(patch);
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[0].lines.len(), 3);
        assert_eq!(hunks[1].header.old_start, 9);
        assert!(hunks.iter().flat_map(|h| &h.lines).all(|l| l.text != "+lost"));
    }

    #[test]
    fn counter_overflow_closes_hunk_without_panicking() {
        let hunks = parse_patch("@@ -4294967295,2 +4294967295,2 @@\n a\n b\n+c\n@@ -1 +1 @@\n-x\n+y");
        assert_eq!(hunks.len(), 2);
        assert_eq!(hunks[0].lines.len(), 1);
        assert_eq!(
            (hunks[0].lines[0].old_line, hunks[0].lines[0].new_line),
            (Some(u32::MAX), Some(u32::MAX))
        );
        assert_eq!(hunks[1].lines.len(), 2);
        assert_eq!(hunks[1].lines[1].new_line, Some(1));
    }

    #[test]
    fn no_newline_marker_has_position_but_no_line() {
        let patch = "@@ -1,2 +1,2 @@\n a\n-b\n\\ No newline at end of file\n+c\n\\ No newline at end of file";
        let hunks = parse_patch(patch);
        let lines = &hunks[0].lines;
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].text, "+c");
        assert_eq!(lines[2].position, 5);
        assert_eq!(lines[2].new_line, Some(2));
    }
}
