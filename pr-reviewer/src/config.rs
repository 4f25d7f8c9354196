//! Review configuration loaded from environment variables.
//!
//! All knobs live in one [`ReviewConfig`] value that is passed explicitly to
//! the entry points. Parsing goes through a lookup closure so tests never
//! touch the process environment.
//!
//! Variables:
//! - `GITHUB_TOKEN`, `REPO` (`owner/name`), `PR_NUMBER`: required
//! - `GITHUB_API_URL`: default `https://api.github.com`
//! - `FILE_EXTENSIONS`: comma list, default `.js,.ts,.jsx,.tsx,.py,.java,.go,.rb,.md,.yml,.yaml`
//! - `EXCLUDE_PATTERNS`: comma list of globs, default empty
//! - `MAX_COMMENTS` (5), `COMMENT_THRESHOLD` (0.7), `CONFIDENCE_THRESHOLD` (0.4)
//! - `LLM_TEMPERATURE` (0.2), `LLM_MAX_TOKENS` (2000)
//! - `DEBUG`: `true` deletes the bot's earlier comments before reviewing;
//!   unrecognised values count as `false`

use std::fmt;
use std::str::FromStr;

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::warn;

use crate::errors::{ConfigError, ReviewResult};

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_FILE_EXTENSIONS: &str = ".js,.ts,.jsx,.tsx,.py,.java,.go,.rb,.md,.yml,.yaml";
pub const DEFAULT_MAX_COMMENTS: usize = 5;
pub const DEFAULT_COMMENT_THRESHOLD: f32 = 0.7;
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.4;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

const WORKFLOW_DIR: &str = ".github/workflows/";

/// Compiled exclude globs plus the raw patterns for logging.
#[derive(Clone)]
pub struct ExcludeSet {
    patterns: Vec<String>,
    set: GlobSet,
}

impl ExcludeSet {
    /// Compiles `patterns`; empty entries are ignored.
    pub fn new<I, S>(patterns: I) -> ReviewResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut kept = Vec::new();
        for p in patterns {
            let p = p.as_ref().trim();
            if p.is_empty() {
                continue;
            }
            let glob = Glob::new(p).map_err(|e| ConfigError::InvalidGlob {
                pattern: p.to_string(),
                reason: e.to_string(),
            })?;
            builder.add(glob);
            kept.push(p.to_string());
        }
        let set = builder.build().map_err(|e| ConfigError::InvalidGlob {
            pattern: kept.join(","),
            reason: e.to_string(),
        })?;
        Ok(Self {
            patterns: kept,
            set,
        })
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.set.is_match(path)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl fmt::Debug for ExcludeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.patterns).finish()
    }
}

/// Everything one review run needs besides the two collaborators.
#[derive(Clone)]
pub struct ReviewConfig {
    pub github_token: String,
    pub repo: String,
    pub pr_number: u64,
    pub api_base: String,
    pub file_extensions: Vec<String>,
    pub exclude: ExcludeSet,
    pub max_comments: usize,
    pub comment_threshold: f32,
    pub confidence_threshold: f32,
    pub temperature: f32,
    pub max_tokens: u32,
    pub debug: bool,
}

impl fmt::Debug for ReviewConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReviewConfig")
            .field("repo", &self.repo)
            .field("pr_number", &self.pr_number)
            .field("api_base", &self.api_base)
            .field("file_extensions", &self.file_extensions)
            .field("exclude", &self.exclude)
            .field("max_comments", &self.max_comments)
            .field("comment_threshold", &self.comment_threshold)
            .field("confidence_threshold", &self.confidence_threshold)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl ReviewConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> ReviewResult<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    /// - [`ConfigError::MissingVar`] for an absent required variable
    /// - [`ConfigError::InvalidValue`] for unparsable numbers or flags
    /// - [`ConfigError::InvalidRepo`] if `REPO` is not `owner/name`
    /// - [`ConfigError::InvalidGlob`] for a bad exclude pattern
    pub fn from_lookup<F>(lookup: F) -> ReviewResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |k: &'static str| get(k).ok_or(ConfigError::MissingVar(k));

        let github_token = required("GITHUB_TOKEN")?;
        let repo = required("REPO")?;
        if !is_owner_name(&repo) {
            return Err(ConfigError::InvalidRepo(repo).into());
        }
        let pr_number = parse_var("PR_NUMBER", &required("PR_NUMBER")?)?;

        let api_base = get("GITHUB_API_URL").unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(ConfigError::InvalidBaseUrl(api_base).into());
        }

        let file_extensions = split_list(
            &get("FILE_EXTENSIONS").unwrap_or_else(|| DEFAULT_FILE_EXTENSIONS.to_string()),
        );
        let exclude = ExcludeSet::new(split_list(&get("EXCLUDE_PATTERNS").unwrap_or_default()))?;

        Ok(Self {
            github_token,
            repo,
            pr_number,
            api_base,
            file_extensions,
            exclude,
            max_comments: opt_var(&get, "MAX_COMMENTS", DEFAULT_MAX_COMMENTS)?,
            comment_threshold: opt_var(&get, "COMMENT_THRESHOLD", DEFAULT_COMMENT_THRESHOLD)?,
            confidence_threshold: opt_var(
                &get,
                "CONFIDENCE_THRESHOLD",
                DEFAULT_CONFIDENCE_THRESHOLD,
            )?,
            temperature: opt_var(&get, "LLM_TEMPERATURE", DEFAULT_TEMPERATURE)?,
            max_tokens: opt_var(&get, "LLM_MAX_TOKENS", DEFAULT_MAX_TOKENS)?,
            debug: get("DEBUG").is_some_and(|v| parse_flag("DEBUG", &v)),
        })
    }

    /// Whether a changed file is in scope for review.
    ///
    /// Excluded paths never are; workflow files always are; everything else
    /// must end with one of the configured extensions.
    pub fn should_review(&self, filename: &str) -> bool {
        if self.exclude.is_match(filename) {
            return false;
        }
        if is_workflow_file(filename) {
            return true;
        }
        self.file_extensions.iter().any(|ext| filename.ends_with(ext.as_str()))
    }
}

/// `.github/workflows/*.yml` or `*.yaml`.
pub fn is_workflow_file(filename: &str) -> bool {
    filename.starts_with(WORKFLOW_DIR) && (filename.ends_with(".yml") || filename.ends_with(".yaml"))
}

fn is_owner_name(repo: &str) -> bool {
    matches!(repo.split_once('/'), Some((o, n)) if !o.is_empty() && !n.is_empty() && !n.contains('/'))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_var<T: FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        var,
        value: value.to_string(),
    })
}

fn opt_var<T, G>(get: &G, var: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(var) {
        Some(v) => parse_var(var, &v),
        None => Ok(default),
    }
}

fn parse_flag(var: &'static str, value: &str) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" | "" => false,
        _ => {
            warn!(var, value, "unrecognised flag value, treating as false");
            false
        }
    }
}
