//! Source-control model
//!
//! Provides:
//! - Commit metadata as returned by the source-control service
//! - File difference model and change classification
//! - Paginated difference collection

pub mod commits;
pub mod diff;

pub use commits::{parse_author_date, Commit, CommitAuthor};
pub use diff::{classify, collect_differences, BlobRef, ChangeKind, DifferencePage, FileDifference};
