//! Diff data model shared by the parser, the coordinate projections and
//! the placement check.

use serde::{Deserialize, Serialize};

use crate::git_providers::types::Side;

/// Parsed `@@ -a[,b] +c[,d] @@` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HunkHeader {
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
}

impl HunkHeader {
    /// Last old-side line covered by the hunk (`old_start - 1` when empty).
    pub fn old_end(&self) -> u32 {
        self.old_start.saturating_add(self.old_count).saturating_sub(1)
    }

    /// Last new-side line covered by the hunk (`new_start - 1` when empty).
    pub fn new_end(&self) -> u32 {
        self.new_start.saturating_add(self.new_count).saturating_sub(1)
    }

    /// Inclusive old-side range, `None` for a pure insertion.
    pub fn old_range(&self) -> Option<LineRange> {
        (self.old_count > 0).then(|| LineRange::new(self.old_start, self.old_end()))
    }

    /// Inclusive new-side range, `None` for a pure deletion.
    pub fn new_range(&self) -> Option<LineRange> {
        (self.new_count > 0).then(|| LineRange::new(self.new_start, self.new_end()))
    }
}

/// Inclusive line range on one side of the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// True if `[start, end]` lies fully inside this range.
    pub fn covers(&self, start: u32, end: u32) -> bool {
        start <= end && start >= self.start && end <= self.end
    }
}

/// Kind of a body line inside a hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineTag {
    Context,
    Added,
    Removed,
}

/// One body line of a hunk with its dual coordinates.
///
/// `old_line` is `None` for added lines and `new_line` is `None` for removed
/// lines. `position` is the 1-based index of the line in the raw patch text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub text: String,
    pub tag: LineTag,
    pub old_line: Option<u32>,
    pub new_line: Option<u32>,
    pub position: u32,
}

impl DiffLine {
    /// Added or removed.
    pub fn is_changed(&self) -> bool {
        self.tag != LineTag::Context
    }
}

/// One `@@` block of a file patch. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    pub header: HunkHeader,
    /// The raw `@@ ... @@` line, trailing section heading included.
    pub header_text: String,
    /// Raw patch position of the header line.
    pub position: u32,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    pub fn old_start_line(&self) -> u32 {
        self.header.old_start
    }

    pub fn old_end_line(&self) -> u32 {
        self.header.old_end()
    }

    pub fn new_start_line(&self) -> u32 {
        self.header.new_start
    }

    pub fn new_end_line(&self) -> u32 {
        self.header.new_end()
    }

    /// Bounds a comment on `side` must fall into: old range for LEFT,
    /// new range for RIGHT.
    pub fn bounds(&self, side: Side) -> Option<LineRange> {
        match side {
            Side::Left => self.header.old_range(),
            Side::Right => self.header.new_range(),
        }
    }
}

/// Legacy anchor: new-file line of an added line and its flat patch position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub line_number: u32,
    pub position: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(old_start: u32, old_count: u32, new_start: u32, new_count: u32) -> HunkHeader {
        HunkHeader {
            old_start,
            old_count,
            new_start,
            new_count,
        }
    }

    #[test]
    fn ends_follow_start_plus_count_minus_one() {
        let h = header(10, 8, 10, 9);
        assert_eq!(h.old_end(), 17);
        assert_eq!(h.new_end(), 18);
    }

    #[test]
    fn pure_insertion_has_no_old_range() {
        let h = header(0, 0, 1, 3);
        assert_eq!(h.old_range(), None);
        assert_eq!(h.new_range(), Some(LineRange::new(1, 3)));

        let h = header(12, 0, 13, 2);
        assert_eq!(h.old_end(), 11);
        assert_eq!(h.old_range(), None);
    }

    #[test]
    fn range_rejects_inverted_spans() {
        let r = LineRange::new(5, 9);
        assert!(r.covers(5, 9));
        assert!(r.covers(7, 7));
        assert!(!r.covers(8, 6));
        assert!(!r.covers(4, 6));
        assert!(!r.covers(6, 10));
    }
}
