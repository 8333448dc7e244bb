//! CodeCommit-backed source control

use aws_sdk_codecommit::types::{BlobMetadata, Difference};
use aws_sdk_codecommit::Client;

use super::{DifferenceRequest, SourceControl};
use crate::error::{from_sdk_error, RelayError, RelayResult};
use crate::git::{BlobRef, ChangeKind, Commit, CommitAuthor, DifferencePage, FileDifference};

/// CodeCommit client wrapper. Build once per process and share it.
#[derive(Debug, Clone)]
pub struct CodeCommitSource {
    client: Client,
}

impl CodeCommitSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn from_conf(sdk_config: &aws_config::SdkConfig) -> Self {
        Self::new(Client::new(sdk_config))
    }
}

impl SourceControl for CodeCommitSource {
    async fn get_branch(&self, repository: &str, branch: &str) -> RelayResult<String> {
        let output = self
            .client
            .get_branch()
            .repository_name(repository)
            .branch_name(branch)
            .send()
            .await
            .map_err(|e| from_sdk_error("GetBranch", e))?;

        output
            .branch()
            .and_then(|b| b.commit_id())
            .map(str::to_string)
            .ok_or_else(|| {
                RelayError::Service(format!(
                    "GetBranch: no commit id returned for {}/{}",
                    repository, branch
                ))
            })
    }

    async fn get_commit(&self, repository: &str, commit_id: &str) -> RelayResult<Commit> {
        let output = self
            .client
            .get_commit()
            .repository_name(repository)
            .commit_id(commit_id)
            .send()
            .await
            .map_err(|e| from_sdk_error("GetCommit", e))?;

        let commit = output.commit().ok_or_else(|| {
            RelayError::Service(format!("GetCommit: empty response for {}", commit_id))
        })?;

        let author = commit
            .author()
            .map(|a| CommitAuthor {
                name: a.name().unwrap_or_default().to_string(),
                email: a.email().unwrap_or_default().to_string(),
                date: a.date().unwrap_or_default().to_string(),
            })
            .unwrap_or_default();

        Ok(Commit {
            id: commit.commit_id().unwrap_or(commit_id).to_string(),
            author,
            message: commit.message().unwrap_or_default().to_string(),
            parents: commit.parents().to_vec(),
        })
    }

    async fn get_differences(&self, request: &DifferenceRequest<'_>) -> RelayResult<DifferencePage> {
        let output = self
            .client
            .get_differences()
            .repository_name(request.repository)
            .set_before_commit_specifier(request.before.map(str::to_string))
            .after_commit_specifier(request.after)
            .set_next_token(request.next_token.map(str::to_string))
            .send()
            .await
            .map_err(|e| from_sdk_error("GetDifferences", e))?;

        let differences = output
            .differences()
            .iter()
            .map(convert_difference)
            .collect::<RelayResult<Vec<_>>>()?;

        Ok(DifferencePage {
            differences,
            next_token: output.next_token().map(str::to_string),
        })
    }
}

fn convert_difference(diff: &Difference) -> RelayResult<FileDifference> {
    let code = diff.change_type().map(|c| c.as_str()).unwrap_or_default();

    Ok(FileDifference {
        kind: ChangeKind::from_code(code)?,
        before: diff.before_blob().map(convert_blob),
        after: diff.after_blob().map(convert_blob),
    })
}

fn convert_blob(blob: &BlobMetadata) -> BlobRef {
    BlobRef::new(
        blob.path().unwrap_or_default(),
        blob.blob_id().unwrap_or_default(),
    )
}
