//! Snapshot of lines that already carry a review comment, per file.

use std::collections::{BTreeSet, HashMap};

use crate::git_providers::types::ReviewComment;

/// path → set of commented line numbers. Built once per run, then read-only.
#[derive(Debug, Clone, Default)]
pub struct ExistingCommentIndex {
    by_path: HashMap<String, BTreeSet<u32>>,
}

impl ExistingCommentIndex {
    /// Indexes comments by their best anchor line; comments without one are
    /// skipped.
    pub fn from_comments(comments: &[ReviewComment]) -> Self {
        let mut by_path: HashMap<String, BTreeSet<u32>> = HashMap::new();
        for c in comments {
            if let Some(line) = c.anchor_line() {
                by_path.entry(c.path.clone()).or_default().insert(line);
            }
        }
        Self { by_path }
    }

    pub fn lines_for(&self, path: &str) -> Option<&BTreeSet<u32>> {
        self.by_path.get(path)
    }

    pub fn contains(&self, path: &str, line: u32) -> bool {
        self.lines_for(path).is_some_and(|l| l.contains(&line))
    }

    /// Number of distinct (path, line) pairs.
    pub fn total_lines(&self) -> usize {
        self.by_path.values().map(BTreeSet::len).sum()
    }
}
