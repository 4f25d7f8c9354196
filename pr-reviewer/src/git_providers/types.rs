//! Platform-facing data model for pull requests and review comments.
//!
//! These are the normalized shapes the reviewer works with; provider
//! clients translate their wire payloads into them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Side of a split diff a comment anchors to.
///
/// LEFT is old/removed content, RIGHT is new/added or context content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Left => "LEFT",
            Side::Right => "RIGHT",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LEFT" => Ok(Side::Left),
            "RIGHT" => Ok(Side::Right),
            other => Err(format!("unknown side {other:?}, expected LEFT or RIGHT")),
        }
    }
}

impl Serialize for Side {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Side {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Pull request metadata needed to anchor comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub head_sha: String,
    pub base_sha: String,
}

/// One changed file as listed by the platform.
///
/// `patch` is `None` for binary or oversized diffs. `status` is the platform's
/// change kind (`added`, `modified`, `removed`, `renamed`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub patch: Option<String>,
}

impl ChangedFile {
    /// Deleted files have nothing left at the head commit to comment on.
    pub fn is_removed(&self) -> bool {
        self.status.as_deref() == Some("removed")
    }
}

/// Minimal user info (the token owner, or a comment author).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub login: String,
}

/// An existing review comment on the pull request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewComment {
    pub id: u64,
    pub path: String,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(default)]
    pub original_line: Option<u32>,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub user: Option<User>,
}

impl ReviewComment {
    /// Best available anchor line: `line`, then `original_line`, then `position`.
    pub fn anchor_line(&self) -> Option<u32> {
        self.line.or(self.original_line).or(self.position)
    }
}

/// A review comment to create.
///
/// `start_line` is only sent for multi-line comments; `line` is the last line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewComment {
    pub body: String,
    pub commit_id: String,
    pub path: String,
    pub line: u32,
    pub side: Side,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!("left".parse::<Side>().unwrap(), Side::Left);
        assert_eq!(" Right ".parse::<Side>().unwrap(), Side::Right);
        assert!("middle".parse::<Side>().is_err());
        let s: Side = serde_json::from_str("\"right\"").unwrap();
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"RIGHT\"");
    }

    #[test]
    fn anchor_line_prefers_line_then_original_then_position() {
        let c: ReviewComment = serde_json::from_str(
            r#"{"id":1,"path":"a.rs","line":null,"original_line":12,"position":3}"#,
        )
        .unwrap();
        assert_eq!(c.anchor_line(), Some(12));

        let c: ReviewComment = serde_json::from_str(r#"{"id":2,"path":"a.rs","position":3}"#).unwrap();
        assert_eq!(c.anchor_line(), Some(3));

        let c: ReviewComment = serde_json::from_str(r#"{"id":3,"path":"a.rs"}"#).unwrap();
        assert_eq!(c.anchor_line(), None);
    }

    #[test]
    fn removed_status_is_detected() {
        let f: ChangedFile =
            serde_json::from_str(r#"{"filename":"old.py","status":"removed","patch":"@@ -1 +0,0 @@\n-x"}"#)
                .unwrap();
        assert!(f.is_removed());

        let f: ChangedFile = serde_json::from_str(r#"{"filename":"new.py"}"#).unwrap();
        assert!(!f.is_removed());
        assert!(f.patch.is_none());
    }

    #[test]
    fn single_line_comment_omits_start_line() {
        let c = NewComment {
            body: "b".into(),
            commit_id: "abc".into(),
            path: "a.rs".into(),
            line: 7,
            side: Side::Right,
            start_line: None,
        };
        let json = serde_json::to_value(&c).unwrap();
        assert!(json.get("start_line").is_none());
        assert_eq!(json["side"], "RIGHT");
        assert_eq!(json["line"], 7);
    }
}
