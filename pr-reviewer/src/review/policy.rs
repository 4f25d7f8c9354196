//! Policy utilities: severity buckets, confidence cutoff and the
//! threshold/dedup/sort/cap pipeline applied to one file's candidates.
//!
//! Everything here is pure; callers log what gets dropped.

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use super::candidate::CommentCandidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    Important,
    Moderate,
    Minor,
}

impl Severity {
    /// Buckets an importance score: ≥0.9, ≥0.7, ≥0.5, below.
    pub fn from_importance(importance: f32) -> Self {
        if importance >= 0.9 {
            Severity::Critical
        } else if importance >= 0.7 {
            Severity::Important
        } else if importance >= 0.5 {
            Severity::Moderate
        } else {
            Severity::Minor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Important => "Important",
            Severity::Moderate => "Moderate",
            Severity::Minor => "Minor",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            Severity::Critical => "🔴",
            Severity::Important => "🟠",
            Severity::Moderate => "🟡",
            Severity::Minor => "🟢",
        }
    }
}

/// Why a candidate did not make it to posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    LowConfidence,
    BelowThreshold,
    DuplicateLine,
    OutsideHunk,
    ExcessCount,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DropReason::LowConfidence => "low-confidence",
            DropReason::BelowThreshold => "below-threshold",
            DropReason::DuplicateLine => "duplicate-line",
            DropReason::OutsideHunk => "outside-hunk",
            DropReason::ExcessCount => "excess-count",
        })
    }
}

/// Keeps candidates whose confidence is strictly above `cutoff`.
pub fn retain_confident(candidates: Vec<CommentCandidate>, cutoff: f32) -> Vec<CommentCandidate> {
    candidates
        .into_iter()
        .filter(|c| {
            let keep = c.confidence > cutoff;
            if !keep {
                log_drop(c, DropReason::LowConfidence);
            }
            keep
        })
        .collect()
}

/// Filters one file's candidates for posting.
///
/// 1. drop importance below `threshold` or a `start_line` already commented
/// 2. stable sort by importance, highest first
/// 3. keep at most `max`
///
/// The returned order is the posting order.
pub fn filter_candidates(
    candidates: Vec<CommentCandidate>,
    commented: Option<&BTreeSet<u32>>,
    threshold: f32,
    max: usize,
) -> Vec<CommentCandidate> {
    let mut kept: Vec<CommentCandidate> = candidates
        .into_iter()
        .filter(|c| {
            if c.importance < threshold {
                log_drop(c, DropReason::BelowThreshold);
                false
            } else if commented.is_some_and(|lines| lines.contains(&c.start_line)) {
                log_drop(c, DropReason::DuplicateLine);
                false
            } else {
                true
            }
        })
        .collect();

    kept.sort_by(|a, b| b.importance.total_cmp(&a.importance));

    if kept.len() > max {
        for c in &kept[max..] {
            log_drop(c, DropReason::ExcessCount);
        }
        kept.truncate(max);
    }
    kept
}

pub(crate) fn log_drop(c: &CommentCandidate, reason: DropReason) {
    debug!(
        %reason,
        start_line = c.start_line,
        end_line = c.end_line,
        side = %c.side,
        importance = c.importance,
        confidence = c.confidence,
        "candidate dropped"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git_providers::types::Side;

    fn cand(start_line: u32, importance: f32) -> CommentCandidate {
        CommentCandidate {
            start_line,
            end_line: start_line,
            side: Side::Right,
            explanation: format!("line {start_line}"),
            suggestion: None,
            importance,
            confidence: 0.8,
            issue_type: "bug".into(),
        }
    }

    fn importances(v: &[CommentCandidate]) -> Vec<f32> {
        v.iter().map(|c| c.importance).collect()
    }

    #[test]
    fn threshold_and_dedup_leave_single_candidate() {
        let commented = BTreeSet::from([10]);
        let out = filter_candidates(
            vec![cand(10, 0.9), cand(20, 0.3), cand(30, 0.95)],
            Some(&commented),
            0.7,
            5,
        );
        assert_eq!(importances(&out), vec![0.95]);
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let out = filter_candidates(
            vec![cand(1, 0.7), cand(2, 0.9), cand(3, 0.7), cand(4, 0.8)],
            None,
            0.7,
            10,
        );
        let lines: Vec<u32> = out.iter().map(|c| c.start_line).collect();
        assert_eq!(lines, vec![2, 4, 1, 3]);
    }

    #[test]
    fn cap_truncates_after_sorting() {
        let out = filter_candidates(
            vec![cand(1, 0.71), cand(2, 0.99), cand(3, 0.8)],
            None,
            0.7,
            2,
        );
        assert_eq!(importances(&out), vec![0.99, 0.8]);
        assert!(filter_candidates(vec![cand(1, 1.0)], None, 0.7, 0).is_empty());
    }

    #[test]
    fn threshold_is_inclusive_and_dedup_is_exact() {
        let commented = BTreeSet::from([5]);
        let mut spanning = cand(4, 0.7);
        spanning.end_line = 6;
        let out = filter_candidates(vec![spanning], Some(&commented), 0.7, 5);
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn confidence_cutoff_is_strict() {
        let mut a = cand(1, 0.9);
        a.confidence = 0.4;
        let mut b = cand(2, 0.9);
        b.confidence = 0.41;
        let out = retain_confident(vec![a, b], 0.4);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].start_line, 2);
    }

    #[test]
    fn severity_buckets() {
        assert_eq!(Severity::from_importance(0.95), Severity::Critical);
        assert_eq!(Severity::from_importance(0.9), Severity::Critical);
        assert_eq!(Severity::from_importance(0.7), Severity::Important);
        assert_eq!(Severity::from_importance(0.5), Severity::Moderate);
        assert_eq!(Severity::from_importance(0.49), Severity::Minor);
        assert_eq!(Severity::Important.badge(), "🟠");
    }
}
