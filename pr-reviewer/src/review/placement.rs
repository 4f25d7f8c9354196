//! Anchoring check: a candidate may only be posted if its whole span lies
//! inside one hunk, on the side it names.

use crate::parser::Hunk;

use super::candidate::CommentCandidate;

/// First hunk whose `side` bounds contain `[start_line, end_line]`.
///
/// LEFT candidates are checked against old-side bounds, RIGHT against
/// new-side bounds. A span crossing two hunks is not anchored, nor is an
/// inverted span.
pub fn find_anchor<'a>(candidate: &CommentCandidate, hunks: &'a [Hunk]) -> Option<&'a Hunk> {
    hunks.iter().find(|h| {
        h.bounds(candidate.side)
            .is_some_and(|r| r.covers(candidate.start_line, candidate.end_line))
    })
}

pub fn is_anchored(candidate: &CommentCandidate, hunks: &[Hunk]) -> bool {
    find_anchor(candidate, hunks).is_some()
}
