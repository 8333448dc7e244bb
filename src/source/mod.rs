//! Source-control service seam
//!
//! Provides:
//! - The `SourceControl` trait the pipeline talks to
//! - A CodeCommit implementation

mod codecommit;

pub use codecommit::CodeCommitSource;

use std::future::Future;

use crate::error::RelayResult;
use crate::git::{Commit, DifferencePage};

/// Arguments of a single difference-page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifferenceRequest<'a> {
    pub repository: &'a str,
    /// Baseline commit; `None` diffs against the empty tree
    pub before: Option<&'a str>,
    pub after: &'a str,
    pub next_token: Option<&'a str>,
}

/// The three source-control calls the relay needs
pub trait SourceControl: Send + Sync {
    /// Current tip commit id of `branch`
    fn get_branch(
        &self,
        repository: &str,
        branch: &str,
    ) -> impl Future<Output = RelayResult<String>> + Send;

    fn get_commit(
        &self,
        repository: &str,
        commit_id: &str,
    ) -> impl Future<Output = RelayResult<Commit>> + Send;

    /// One page of differences
    fn get_differences(
        &self,
        request: &DifferenceRequest<'_>,
    ) -> impl Future<Output = RelayResult<DifferencePage>> + Send;
}
