//! Publisher: renders accepted candidates and posts them as review comments.
//!
//! - Body: severity badge, issue emoji, explanation, optional suggestion block.
//! - A rejected post is retried once with the suggestion block removed.
//! - No async-trait, no Box<dyn ...>; generic over the platform.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::git_providers::{NewComment, ReviewPlatform};
use crate::review::{CommentCandidate, Severity};

const SUGGESTION_FENCE: &str = "```suggestion";

/// Suggestions are only rendered as applicable blocks above this confidence.
pub const SUGGESTION_MIN_CONFIDENCE: f32 = 0.6;

/// Result of publishing one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOutcome {
    Posted,
    /// First attempt failed; the retry without the suggestion block succeeded.
    PostedWithoutSuggestion,
    Failed,
}

impl PostOutcome {
    pub fn is_posted(&self) -> bool {
        !matches!(self, PostOutcome::Failed)
    }
}

/// Python-style capitalization: first char upper, rest lower.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Emoji for a capitalized issue type.
pub fn issue_emoji(issue_type: &str) -> &'static str {
    match issue_type {
        "Bug" => "🐛",
        "Security" => "🔒",
        "Performance" => "⚡",
        "Readability" => "📖",
        "Maintainability" => "🧹",
        "Design" => "📐",
        "Testing" => "🧪",
        _ => "💡",
    }
}

fn instruction_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(change|replace|use|add|remove|consider|should be|update)\b").ok()
    })
    .as_ref()
}

/// True if the text reads like an instruction rather than replacement code.
fn reads_like_instruction(text: &str) -> bool {
    instruction_re().is_some_and(|re| re.is_match(&text.to_lowercase()))
}

/// Renders the markdown body for one candidate.
pub fn render_body(c: &CommentCandidate) -> String {
    let severity = Severity::from_importance(c.importance);
    let issue = capitalize(&c.issue_type);
    let mut body = format!(
        "{} **{}** {} **{}** Suggestion\n\n{}\n\n",
        severity.badge(),
        severity.label(),
        issue_emoji(&issue),
        issue,
        c.explanation
    );

    let suggestion = c.suggestion.as_deref().map(str::trim).unwrap_or_default();
    if !suggestion.is_empty() && c.confidence > SUGGESTION_MIN_CONFIDENCE {
        if reads_like_instruction(suggestion) {
            debug!(suggestion, "suggestion reads like prose, not rendering block");
        } else {
            body.push_str(&format!("{SUGGESTION_FENCE}\n{suggestion}\n```"));
        }
    }
    body
}

/// Body with the suggestion block and everything after it removed, or
/// `None` if there is no block.
pub fn strip_suggestion_block(body: &str) -> Option<String> {
    body.split_once(SUGGESTION_FENCE)
        .map(|(head, _)| head.trim().to_string())
}

/// Builds the platform request for one candidate.
pub fn to_new_comment(c: &CommentCandidate, path: &str, commit_id: &str) -> NewComment {
    NewComment {
        body: render_body(c),
        commit_id: commit_id.to_string(),
        path: path.to_string(),
        line: c.end_line,
        side: c.side,
        start_line: (c.start_line != c.end_line).then_some(c.start_line),
    }
}

/// Posts one candidate, retrying once without the suggestion block.
pub async fn post_with_retry<P: ReviewPlatform>(
    platform: &P,
    c: &CommentCandidate,
    path: &str,
    commit_id: &str,
) -> PostOutcome {
    let comment = to_new_comment(c, path, commit_id);
    debug!(
        path,
        start_line = ?comment.start_line,
        line = comment.line,
        side = %comment.side,
        "step4: posting comment"
    );

    let err = match platform.post_comment(&comment).await {
        Ok(()) => {
            info!("step4: posted {}:{}-{}", path, c.start_line, c.end_line);
            return PostOutcome::Posted;
        }
        Err(e) => e,
    };

    let Some(stripped) = strip_suggestion_block(&comment.body) else {
        warn!(error = %err, path, line = comment.line, "failed to post comment");
        return PostOutcome::Failed;
    };
    warn!(error = %err, path, line = comment.line, "post failed, retrying without suggestion block");

    let retry = NewComment {
        body: stripped,
        ..comment
    };
    match platform.post_comment(&retry).await {
        Ok(()) => {
            info!(
                "step4: posted without suggestion {}:{}-{}",
                path, c.start_line, c.end_line
            );
            PostOutcome::PostedWithoutSuggestion
        }
        Err(e) => {
            warn!(error = %e, path, line = retry.line, "retry failed, skipping comment");
            PostOutcome::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git_providers::types::Side;

    fn cand() -> CommentCandidate {
        CommentCandidate {
            start_line: 3,
            end_line: 4,
            side: Side::Right,
            explanation: "Off by one.".into(),
            suggestion: Some("for i in 0..n {".into()),
            importance: 0.92,
            confidence: 0.8,
            issue_type: "BUG".into(),
        }
    }

    #[test]
    fn body_with_suggestion_block() {
        assert_eq!(
            render_body(&cand()),
            "🔴 **Critical** 🐛 **Bug** Suggestion\n\nOff by one.\n\n```suggestion\nfor i in 0..n {\n```"
        );
    }

    #[test]
    fn low_confidence_or_prose_suggestions_are_not_rendered() {
        let mut c = cand();
        c.confidence = 0.6;
        assert!(!render_body(&c).contains(SUGGESTION_FENCE));

        let mut c = cand();
        c.suggestion = Some("  Consider using an iterator".into());
        assert!(!render_body(&c).contains(SUGGESTION_FENCE));

        let mut c = cand();
        c.suggestion = Some("user_id = lookup(name)".into());
        assert!(render_body(&c).contains(SUGGESTION_FENCE));
    }

    #[test]
    fn instruction_prefixes_need_a_word_boundary() {
        assert!(reads_like_instruction("Should be `>=` here"));
        assert!(reads_like_instruction("should be\treturned early"));
        assert!(reads_like_instruction("  UPDATE the counter"));
        assert!(!reads_like_instruction("should_be_valid = check(x)"));
        assert!(!reads_like_instruction("should   be = 1"));
        assert!(!reads_like_instruction("updated_at = now()"));
        assert!(!reads_like_instruction("let x = 1; // should be fine"));
    }

    #[test]
    fn unknown_issue_type_gets_default_emoji() {
        let mut c = cand();
        c.issue_type = "style".into();
        c.importance = 0.55;
        c.suggestion = None;
        assert_eq!(
            render_body(&c),
            "🟡 **Moderate** 💡 **Style** Suggestion\n\nOff by one.\n\n"
        );
    }

    #[test]
    fn strip_removes_block_and_trims() {
        let body = render_body(&cand());
        assert_eq!(
            strip_suggestion_block(&body).as_deref(),
            Some("🔴 **Critical** 🐛 **Bug** Suggestion\n\nOff by one.")
        );
        assert_eq!(strip_suggestion_block("plain"), None);
    }

    #[test]
    fn start_line_only_for_multi_line() {
        let c = cand();
        assert_eq!(to_new_comment(&c, "a.rs", "sha").start_line, Some(3));
        let mut single = cand();
        single.start_line = 4;
        let nc = to_new_comment(&single, "a.rs", "sha");
        assert_eq!((nc.start_line, nc.line), (None, 4));
    }
}
