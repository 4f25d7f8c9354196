//! Normalization of the generator's reply into [`CommentCandidate`]s.
//!
//! The reply is expected to be a JSON array, optionally wrapped in a fenced
//! code block. Two span field schemes are accepted (`start_line`/`end_line`
//! and the older `line_start`/`line_end`) and canonicalized here, so nothing
//! downstream sees the difference.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::errors::{ResponseError, ReviewResult};
use crate::git_providers::types::Side;

/// Confidence assumed when the generator omits it.
pub const DEFAULT_CONFIDENCE: f32 = 0.5;

/// One generated review suggestion, in canonical form.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentCandidate {
    pub start_line: u32,
    pub end_line: u32,
    pub side: Side,
    pub explanation: String,
    pub suggestion: Option<String>,
    pub importance: f32,
    pub confidence: f32,
    pub issue_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSpan {
    Current { start_line: u32, end_line: u32 },
    Legacy { line_start: u32, line_end: u32 },
}

impl RawSpan {
    fn bounds(&self) -> (u32, u32) {
        match *self {
            RawSpan::Current {
                start_line,
                end_line,
            } => (start_line, end_line),
            RawSpan::Legacy {
                line_start,
                line_end,
            } => (line_start, line_end),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCandidate {
    #[serde(flatten)]
    span: RawSpan,
    explanation: String,
    side: Side,
    #[serde(default)]
    suggestion: Option<String>,
    #[serde(default)]
    importance: Option<f32>,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    issue_type: Option<String>,
}

impl From<RawCandidate> for CommentCandidate {
    fn from(raw: RawCandidate) -> Self {
        let (start_line, end_line) = raw.span.bounds();
        Self {
            start_line,
            end_line,
            side: raw.side,
            explanation: raw.explanation,
            suggestion: raw.suggestion.filter(|s| !s.trim().is_empty()),
            importance: raw.importance.unwrap_or(0.0),
            confidence: raw.confidence.unwrap_or(DEFAULT_CONFIDENCE),
            issue_type: raw.issue_type.unwrap_or_default(),
        }
    }
}

fn fence_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```(?:json)?\s*(\[[\s\S]+?\])\s*```").ok())
        .as_ref()
}

/// Returns the JSON array inside the first fenced block, or the whole text.
fn extract_json(reply: &str) -> &str {
    fence_re()
        .and_then(|re| re.captures(reply))
        .and_then(|c| c.get(1))
        .map_or(reply.trim(), |m| m.as_str())
}

/// Parses a generator reply into candidates.
///
/// # Errors
/// [`ResponseError::Malformed`] if the payload is not a JSON array of objects
/// carrying a span, `explanation` and a LEFT/RIGHT `side`.
pub fn parse_response(reply: &str) -> ReviewResult<Vec<CommentCandidate>> {
    let raw: Vec<RawCandidate> =
        serde_json::from_str(extract_json(reply)).map_err(ResponseError::Malformed)?;
    Ok(raw.into_iter().map(CommentCandidate::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn fenced_json_with_both_span_schemes() {
        let reply = r#"Here you go:
```json
[
  {"start_line": 3, "end_line": 4, "side": "RIGHT", "explanation": "a",
   "suggestion": "let x = 1;", "importance": 0.8, "issue_type": "bug", "confidence": 0.9},
  {"line_start": 10, "line_end": 10, "side": "left", "explanation": "b"}
]
```
Thanks"#;
        let c = parse_response(reply).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!((c[0].start_line, c[0].end_line, c[0].side), (3, 4, Side::Right));
        assert_eq!(c[0].suggestion.as_deref(), Some("let x = 1;"));
        assert_eq!(c[0].issue_type, "bug");

        assert_eq!((c[1].start_line, c[1].end_line, c[1].side), (10, 10, Side::Left));
        assert_eq!(c[1].importance, 0.0);
        assert_eq!(c[1].confidence, DEFAULT_CONFIDENCE);
        assert_eq!(c[1].suggestion, None);
        assert_eq!(c[1].issue_type, "");
    }

    #[test]
    fn bare_fence_and_plain_array() {
        let fenced = "```\n[{\"start_line\":1,\"end_line\":1,\"side\":\"RIGHT\",\"explanation\":\"x\"}]\n```";
        assert_eq!(parse_response(fenced).unwrap().len(), 1);
        assert!(parse_response("  []  ").unwrap().is_empty());
    }

    #[test]
    fn blank_suggestion_is_none() {
        let c = parse_response(
            r#"[{"start_line":1,"end_line":2,"side":"RIGHT","explanation":"x","suggestion":"  "}]"#,
        )
        .unwrap();
        assert_eq!(c[0].suggestion, None);
    }

    #[test]
    fn malformed_replies_are_errors() {
        for reply in [
            "I found no issues.",
            r#"{"start_line":1}"#,
            r#"[{"start_line":1,"end_line":2,"explanation":"no side"}]"#,
            r#"[{"end_line":2,"side":"RIGHT","explanation":"no start"}]"#,
            r#"[{"start_line":1,"end_line":2,"side":"UP","explanation":"bad side"}]"#,
            "```json\n[{\"start_line\": 1,]\n```",
        ] {
            assert!(
                matches!(parse_response(reply), Err(Error::Response(_))),
                "accepted {reply:?}"
            );
        }
    }
}
