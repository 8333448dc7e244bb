use std::fmt::Write;

use crate::git::{BlobRef, ChangeKind, Commit, FileDifference};

/// Render the plain-text commit report.
///
/// For a difference carrying both blobs the after-blob line comes first.
pub fn render(commit: &Commit, differences: &[FileDifference]) -> String {
    let mut text = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(text, "commit ID: {}", commit.id);
    let _ = writeln!(
        text,
        "author: {} ({}) - {}",
        commit.author.name, commit.author.email, commit.author.date
    );
    let _ = writeln!(text, "message: {}", commit.message);

    for diff in differences {
        if let Some(ref after) = diff.after {
            push_file_line(&mut text, after, diff.kind);
        }
        if let Some(ref before) = diff.before {
            push_file_line(&mut text, before, diff.kind);
        }
    }

    text
}

fn push_file_line(text: &mut String, blob: &BlobRef, kind: ChangeKind) {
    let _ = writeln!(
        text,
        "File: {} {} - Blob ID: {}",
        blob.path,
        kind.label(),
        blob.blob_id
    );
}
