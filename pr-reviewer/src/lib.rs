//! Public entry for the pr-reviewer pipeline.
//!
//! Single high-level function to review one pull request end to end.
//!
//! 1) **Step 1: Platform I/O**
//!    - Fetch PR metadata to get `head_sha`
//!    - List changed files and keep the ones in scope (removed files are dropped)
//!    - Snapshot existing review comments into a per-file line index
//!
//! 2) **Step 2: Cleanup (debug mode only)**
//!    - Delete review comments authored by the token owner
//!
//! 3) **Step 3: Per-file review**
//!    - Parse the patch into hunks with dual line numbering
//!    - Fetch file content at `head_sha`
//!    - Prompt the generator and normalize its reply into candidates
//!    - Threshold, dedup against the index, sort, cap to the remaining budget
//!    - Drop candidates not anchored inside a hunk
//!
//! 4) **Step 4: Publish**
//!    - Post each accepted candidate, retrying once without the suggestion block
//!
//! Files are processed one by one in platform order so the global comment cap
//! is deterministic. Failures local to a file or a comment are logged and
//! skipped; only step 1 failures abort the run.

pub mod config;
pub mod errors;
pub mod git_providers;
pub mod map; // coordinate projections
pub mod parser; // unified-diff parsing
pub mod publish; // step 4
pub mod review; // step 3

use std::collections::HashSet;
use std::time::Instant;

use ai_llm_service::TextGenerator;
use tracing::{debug, info, warn};

use config::ReviewConfig;
use errors::ReviewResult;
use git_providers::{ChangedFile, PullRequest, ReviewPlatform};
use review::{DropReason, ExistingCommentIndex};

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    /// Changed files in scope after filtering.
    pub files_in_scope: usize,
    /// Files for which the generator produced a usable reply.
    pub files_reviewed: usize,
    /// Comments created on the PR.
    pub comments_posted: usize,
    /// Old bot comments removed in debug mode.
    pub comments_deleted: usize,
}

/// Run steps **1–4** for the configured pull request.
///
/// # Logging
/// Emits `DEBUG` logs per sub-stage (`step1: ...` to `step4: ...`) and an
/// `INFO` summary at the end.
///
/// # Errors
/// Only when the initial platform reads (step 1) fail.
pub async fn run_review<P, G>(
    platform: &P,
    generator: &G,
    cfg: &ReviewConfig,
) -> ReviewResult<ReviewSummary>
where
    P: ReviewPlatform,
    G: TextGenerator,
{
    let t0 = Instant::now();
    let mut summary = ReviewSummary::default();

    // ---------------------------
    // Step 1: platform I/O
    // ---------------------------
    debug!("step1: fetch pr meta");
    let pr = platform.pull_request().await?;
    debug!("step1: meta ok, head_sha={}", pr.head_sha);

    let files: Vec<ChangedFile> = platform
        .changed_files()
        .await?
        .into_iter()
        .filter(|f| !f.is_removed() && cfg.should_review(&f.filename))
        .collect();
    summary.files_in_scope = files.len();
    info!("step1: {} files to review", files.len());

    let mut existing = platform.review_comments().await?;

    // ---------------------------
    // Step 2: debug cleanup
    // ---------------------------
    if cfg.debug {
        let deleted = delete_own_comments(platform, &existing).await;
        summary.comments_deleted = deleted.len();
        existing.retain(|c| !deleted.contains(&c.id));
    }

    let index = ExistingCommentIndex::from_comments(&existing);
    info!("step2: {} existing comment lines indexed", index.total_lines());

    // ---------------------------
    // Steps 3-4: per file
    // ---------------------------
    for file in &files {
        let remaining = cfg.max_comments.saturating_sub(summary.comments_posted);
        if remaining == 0 {
            info!("step3: reached maximum comment limit, stopping");
            break;
        }
        match review_one(platform, generator, cfg, &pr, &index, file, remaining).await {
            Some(posted) => {
                summary.files_reviewed += 1;
                summary.comments_posted += posted;
            }
            None => continue,
        }
    }

    info!(
        "review done files={} reviewed={} posted={} deleted={} in {} ms",
        summary.files_in_scope,
        summary.files_reviewed,
        summary.comments_posted,
        summary.comments_deleted,
        t0.elapsed().as_millis()
    );
    Ok(summary)
}

/// Reviews and publishes one file. Returns `None` if the file was skipped,
/// otherwise the number of comments posted for it.
async fn review_one<P, G>(
    platform: &P,
    generator: &G,
    cfg: &ReviewConfig,
    pr: &PullRequest,
    index: &ExistingCommentIndex,
    file: &ChangedFile,
    budget: usize,
) -> Option<usize>
where
    P: ReviewPlatform,
    G: TextGenerator,
{
    let path = file.filename.as_str();
    let hunks = parser::parse_patch(file.patch.as_deref().unwrap_or_default());
    if hunks.is_empty() {
        debug!("step3: no hunks in {}, skipping", path);
        return None;
    }

    let content = match platform.file_content(path, &pr.head_sha).await {
        Ok(Some(text)) if !text.is_empty() => text,
        Ok(_) => {
            warn!("step3: could not retrieve content for {}", path);
            return None;
        }
        Err(e) => {
            warn!(error = %e, "step3: could not retrieve content for {}", path);
            return None;
        }
    };

    debug!("step3: reviewing {} hunks={}", path, hunks.len());
    let candidates = match review::review_file(generator, cfg, path, &hunks, &content).await {
        Ok(c) => c,
        Err(e) => {
            warn!(error = %e, "step3: dropping suggestions for {}", path);
            return None;
        }
    };

    let accepted = review::filter_candidates(
        candidates,
        index.lines_for(path),
        cfg.comment_threshold,
        budget,
    );

    let mut posted = 0usize;
    for c in &accepted {
        if !review::is_anchored(c, &hunks) {
            review::policy::log_drop(c, DropReason::OutsideHunk);
            info!(
                "step3: skipping {}:{}-{} ({}), not inside any patch",
                path, c.start_line, c.end_line, c.side
            );
            continue;
        }
        if publish::post_with_retry(platform, c, path, &pr.head_sha)
            .await
            .is_posted()
        {
            posted += 1;
        }
    }
    debug!("step4: {} posted={} of accepted={}", path, posted, accepted.len());
    Some(posted)
}

/// Deletes review comments authored by the token owner. Best effort;
/// returns the ids actually deleted.
async fn delete_own_comments<P: ReviewPlatform>(
    platform: &P,
    existing: &[git_providers::ReviewComment],
) -> HashSet<u64> {
    let mut deleted = HashSet::new();
    let me = match platform.authenticated_user().await {
        Ok(u) => u,
        Err(e) => {
            warn!(error = %e, "step2: cannot resolve authenticated user, skipping cleanup");
            return deleted;
        }
    };
    debug!("step2: deleting comments authored by {} (id={})", me.login, me.id);

    for c in existing.iter().filter(|c| c.user.as_ref().is_some_and(|u| u.id == me.id)) {
        match platform.delete_comment(c.id).await {
            Ok(()) => {
                deleted.insert(c.id);
            }
            Err(e) => warn!(error = %e, comment_id = c.id, "step2: failed to delete comment"),
        }
    }
    info!("step2: deleted {} comments", deleted.len());
    deleted
}

// -----------------------------------------------------------------------------
// Convenience re-exports for downstream users
// -----------------------------------------------------------------------------

pub use config::ReviewConfig as ReviewerConfig;
pub use git_providers::github::GitHubClient;
pub use review::prompt::SYSTEM_PROMPT;
