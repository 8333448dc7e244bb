//! Commit notification pipeline
//!
//! One invocation resolves the branch tip, fetches the commit, collects its
//! differences against the first parent, renders the report and publishes it.
//! Each step feeds the next, so the calls run strictly in sequence.

use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::{RelayError, RelayResult};
use crate::git::{collect_differences, parse_author_date, Commit, FileDifference};
use crate::notifications::{Notification, NotificationSink, PublishReceipt};
use crate::report;
use crate::source::SourceControl;

/// Report produced by a run that stops short of publishing
#[derive(Debug, Clone)]
pub struct Preview {
    pub repository: String,
    pub commit: Commit,
    pub differences: Vec<FileDifference>,
    pub text: String,
}

/// Relays the tip commit of the configured branch to a notification sink.
///
/// Holds the process-wide clients; build it once and share it across
/// invocations.
pub struct CommitNotifier<S, N> {
    config: Config,
    source: S,
    sink: N,
}

impl<S: SourceControl, N: NotificationSink> CommitNotifier<S, N> {
    pub fn new(config: Config, source: S, sink: N) -> Self {
        Self {
            config,
            source,
            sink,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Tip commit id of `branch`
    pub async fn resolve_tip(&self, repository: &str, branch: &str) -> RelayResult<String> {
        self.source.get_branch(repository, branch).await
    }

    pub async fn fetch_commit(&self, repository: &str, commit_id: &str) -> RelayResult<Commit> {
        self.source.get_commit(repository, commit_id).await
    }

    /// Every difference between `before` and `after`; `None` means the empty tree
    pub async fn list_differences(
        &self,
        repository: &str,
        after: &str,
        before: Option<&str>,
    ) -> RelayResult<Vec<FileDifference>> {
        collect_differences(&self.source, repository, after, before).await
    }

    pub async fn publish(&self, repository: &str, message: String) -> RelayResult<PublishReceipt> {
        let notification = Notification::for_repository(repository, message);
        self.sink.publish(&notification).await
    }

    /// Handle one invocation.
    ///
    /// The repository always comes from configuration; the triggering event is
    /// only logged. Failures are logged with a hint and returned unchanged.
    pub async fn handle(&self, event: &Value) -> RelayResult<PublishReceipt> {
        debug!(%event, "invocation event (repository is taken from configuration)");

        let result = async {
            let preview = self.prepare().await?;
            self.publish(&preview.repository, preview.text).await
        }
        .await;

        if let Err(ref e) = result {
            self.log_failure(e);
        }

        result
    }

    /// Run every step except publishing
    pub async fn preview(&self) -> RelayResult<Preview> {
        let result = self.prepare().await;

        if let Err(ref e) = result {
            self.log_failure(e);
        }

        result
    }

    async fn prepare(&self) -> RelayResult<Preview> {
        let repository = self.config.repository()?;
        let branch = self.config.branch();

        let commit_id = self.resolve_tip(repository, branch).await?;
        let commit = self.fetch_commit(repository, &commit_id).await?;
        let previous = commit.first_parent();

        info!(
            repository,
            branch,
            commit = %commit_id,
            previous = previous.unwrap_or("none"),
            committed_at = ?parse_author_date(&commit.author.date),
            "resolved tip commit"
        );

        let differences = self
            .list_differences(repository, &commit_id, previous)
            .await?;
        let text = report::render(&commit, &differences);

        Ok(Preview {
            repository: repository.to_string(),
            commit,
            differences,
            text,
        })
    }

    fn log_failure(&self, err: &RelayError) {
        error!(kind = err.kind(), "{}", err);
        error!(
            "Error getting repository {}. Make sure it exists and that your repository is in the same region as this function.",
            self.config.repository_name
        );
    }
}
