//! commit-relay - CodeCommit commit notifications
//!
//! A library for relaying the tip commit of a tracked branch:
//! - Branch tip resolution and commit lookup
//! - Paginated file difference collection against the first parent
//! - Plain-text commit reports
//! - SNS topic delivery
//! - An AWS Lambda handler that ties the steps together

pub mod config;
pub mod error;
pub mod git;
pub mod logging;
pub mod notifications;
pub mod relay;
pub mod report;
pub mod source;

pub use config::Config;
pub use error::{RelayError, RelayResult};
pub use git::{classify, ChangeKind, Commit, FileDifference};
pub use notifications::{NotificationSink, PublishReceipt, SnsNotifier};
pub use relay::{CommitNotifier, Preview};
pub use report::render;
pub use source::{CodeCommitSource, SourceControl};
