//! Per-file review: prompt → generator → normalized candidates.
//!
//! Flow for one file:
//!   1) Build the prompt from the parsed hunks and the file content;
//!   2) Ask the generator;
//!   3) Normalize the reply (fence stripping, span field aliases);
//!   4) Drop candidates at or below the confidence cutoff.
//!
//! Threshold/dedup/cap and placement are applied by the caller, which owns
//! the global comment budget.

pub mod candidate;
pub mod dedup;
pub mod placement;
pub mod policy;
pub mod prompt;

use std::time::Instant;

use ai_llm_service::TextGenerator;
use tracing::debug;

use crate::config::ReviewConfig;
use crate::errors::ReviewResult;
use crate::parser::Hunk;

pub use candidate::{CommentCandidate, parse_response};
pub use dedup::ExistingCommentIndex;
pub use placement::{find_anchor, is_anchored};
pub use policy::{DropReason, Severity, filter_candidates, retain_confident};

/// Generates and normalizes candidates for one file.
///
/// # Errors
/// - `Error::Llm` if the generator call fails
/// - `Error::Response` if the reply is not a valid candidate array
pub async fn review_file<G: TextGenerator>(
    generator: &G,
    cfg: &ReviewConfig,
    filename: &str,
    hunks: &[Hunk],
    content: &str,
) -> ReviewResult<Vec<CommentCandidate>> {
    let t0 = Instant::now();
    let prompt = prompt::build_file_prompt(filename, hunks, content);
    debug!(
        "step3: prompt built file={} hunks={} prompt_len={}",
        filename,
        hunks.len(),
        prompt.chars().count()
    );

    let reply = generator
        .generate(&prompt, cfg.temperature, cfg.max_tokens)
        .await?;
    debug!(
        "step3: reply received file={} reply_len={} in {} ms",
        filename,
        reply.len(),
        t0.elapsed().as_millis()
    );

    let parsed = parse_response(&reply)?;
    let total = parsed.len();
    let confident = retain_confident(parsed, cfg.confidence_threshold);
    debug!(
        "step3: candidates file={} parsed={} confident={}",
        filename,
        total,
        confident.len()
    );
    Ok(confident)
}
