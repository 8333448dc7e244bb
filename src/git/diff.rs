//! File differences between two commit states

use serde::Serialize;
use tracing::debug;

use crate::error::{RelayError, RelayResult};
use crate::source::{DifferenceRequest, SourceControl};

/// Kind of change recorded for a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChangeKind {
    Addition,
    Modification,
    Deletion,
}

impl ChangeKind {
    /// Parse the service's single-letter change type code
    pub fn from_code(code: &str) -> RelayResult<Self> {
        match code {
            "A" => Ok(ChangeKind::Addition),
            "M" => Ok(ChangeKind::Modification),
            "D" => Ok(ChangeKind::Deletion),
            other => Err(RelayError::UnknownChangeKind(other.to_string())),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChangeKind::Addition => "Addition",
            ChangeKind::Modification => "Modification",
            ChangeKind::Deletion => "Deletion",
        }
    }
}

/// Map a change type code to its report label. Unknown codes are an error,
/// never a default.
pub fn classify(code: &str) -> RelayResult<&'static str> {
    ChangeKind::from_code(code).map(ChangeKind::label)
}

/// A file at one side of a difference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlobRef {
    pub path: String,
    pub blob_id: String,
}

impl BlobRef {
    pub fn new(path: impl Into<String>, blob_id: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            blob_id: blob_id.into(),
        }
    }
}

/// One file-level difference
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileDifference {
    pub kind: ChangeKind,
    pub before: Option<BlobRef>,
    pub after: Option<BlobRef>,
}

impl FileDifference {
    pub fn added(after: BlobRef) -> Self {
        Self {
            kind: ChangeKind::Addition,
            before: None,
            after: Some(after),
        }
    }

    pub fn modified(before: BlobRef, after: BlobRef) -> Self {
        Self {
            kind: ChangeKind::Modification,
            before: Some(before),
            after: Some(after),
        }
    }

    pub fn deleted(before: BlobRef) -> Self {
        Self {
            kind: ChangeKind::Deletion,
            before: Some(before),
            after: None,
        }
    }
}

/// One page of a difference listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DifferencePage {
    pub differences: Vec<FileDifference>,
    pub next_token: Option<String>,
}

/// Collect every difference between `before` and `after`.
///
/// Without `before` the service diffs against the empty tree. Pages are
/// appended in arrival order, each exactly once, until a response comes back
/// without a continuation token.
pub async fn collect_differences<S: SourceControl>(
    source: &S,
    repository: &str,
    after: &str,
    before: Option<&str>,
) -> RelayResult<Vec<FileDifference>> {
    let mut differences = Vec::new();
    let mut next_token: Option<String> = None;
    let mut pages = 0;

    loop {
        let request = DifferenceRequest {
            repository,
            before,
            after,
            next_token: next_token.as_deref(),
        };

        let mut page = source.get_differences(&request).await?;
        pages += 1;
        differences.append(&mut page.differences);

        match page.next_token {
            Some(token) => next_token = Some(token),
            None => break,
        }
    }

    debug!(repository, after, ?before, pages, count = differences.len(), "collected differences");

    Ok(differences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::testing::FakeSource;

    fn added(path: &str) -> FileDifference {
        FileDifference::added(BlobRef::new(path, format!("blob-{}", path)))
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("M").unwrap(), "Modification");
        assert_eq!(classify("D").unwrap(), "Deletion");
        assert_eq!(classify("A").unwrap(), "Addition");
    }

    #[test]
    fn test_classify_unknown_code_fails() {
        assert_eq!(
            classify("X"),
            Err(RelayError::UnknownChangeKind("X".to_string()))
        );
        assert!(classify("").is_err());
        assert!(classify("m").is_err());
    }

    #[tokio::test]
    async fn test_collect_concatenates_pages_in_order() {
        let source = FakeSource::new().with_pages(vec![
            DifferencePage {
                differences: vec![added("a"), added("b")],
                next_token: Some("t1".to_string()),
            },
            DifferencePage {
                differences: vec![added("c")],
                next_token: Some("t2".to_string()),
            },
            DifferencePage {
                differences: vec![added("d"), added("e")],
                next_token: None,
            },
        ]);

        let diffs = collect_differences(&source, "repo", "c2", Some("c1")).await.unwrap();

        let paths: Vec<_> = diffs
            .iter()
            .map(|d| d.after.as_ref().unwrap().path.as_str())
            .collect();
        assert_eq!(paths, vec!["a", "b", "c", "d", "e"]);

        let calls = source.difference_calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].next_token, None);
        assert_eq!(calls[1].next_token.as_deref(), Some("t1"));
        assert_eq!(calls[2].next_token.as_deref(), Some("t2"));
        for call in &calls {
            assert_eq!(call.before.as_deref(), Some("c1"));
            assert_eq!(call.after, "c2");
        }
    }

    #[tokio::test]
    async fn test_collect_root_commit_has_no_before() {
        let source = FakeSource::new().with_pages(vec![DifferencePage {
            differences: vec![added("README.md"), added("src/main.rs")],
            next_token: None,
        }]);

        let diffs = collect_differences(&source, "repo", "root", None).await.unwrap();

        assert_eq!(diffs.len(), 2);
        assert!(diffs.iter().all(|d| d.kind == ChangeKind::Addition));

        let calls = source.difference_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].before, None);
    }

    #[tokio::test]
    async fn test_collect_empty_response() {
        let source = FakeSource::new().with_pages(vec![DifferencePage::default()]);

        let diffs = collect_differences(&source, "repo", "c2", Some("c1")).await.unwrap();

        assert!(diffs.is_empty());
        assert_eq!(source.difference_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_collect_propagates_page_error() {
        let source = FakeSource::new().with_pages(vec![DifferencePage {
            differences: vec![added("a")],
            next_token: Some("t1".to_string()),
        }]);
        source.fail_differences_after(1, RelayError::Service("Throttled".to_string()));

        let result = collect_differences(&source, "repo", "c2", Some("c1")).await;

        assert_eq!(result, Err(RelayError::Service("Throttled".to_string())));
        assert_eq!(source.difference_calls().len(), 2);
    }
}
