//! Platform facade w/o async-trait or dynamic trait objects.
//!
//! `ReviewPlatform` uses return-position `impl Future` so implementations can
//! be plain `async fn`s and callers stay generic (no boxed futures). The only
//! production implementation is [`github::GitHubClient`]; tests plug in
//! in-memory fakes.

pub mod github;
pub mod types;

pub use types::*;

use std::future::Future;

use crate::errors::ReviewResult;

/// Everything the reviewer needs from the hosting platform for one PR.
pub trait ReviewPlatform: Send + Sync {
    /// PR metadata (head/base SHAs).
    fn pull_request(&self) -> impl Future<Output = ReviewResult<PullRequest>> + Send;

    /// Changed files in platform order, with their patches.
    fn changed_files(&self) -> impl Future<Output = ReviewResult<Vec<ChangedFile>>> + Send;

    /// File text at `git_ref`; `Ok(None)` if the file does not exist there
    /// or is not valid UTF-8.
    fn file_content(
        &self,
        path: &str,
        git_ref: &str,
    ) -> impl Future<Output = ReviewResult<Option<String>>> + Send;

    /// All existing review comments (every page).
    fn review_comments(&self) -> impl Future<Output = ReviewResult<Vec<ReviewComment>>> + Send;

    /// Creates one review comment.
    fn post_comment(&self, comment: &NewComment) -> impl Future<Output = ReviewResult<()>> + Send;

    /// The user owning the access token.
    fn authenticated_user(&self) -> impl Future<Output = ReviewResult<User>> + Send;

    /// Deletes one review comment by id.
    fn delete_comment(&self, id: u64) -> impl Future<Output = ReviewResult<()>> + Send;
}
