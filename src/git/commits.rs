//! Commit metadata

use chrono::{DateTime, FixedOffset, TimeZone};
use serde::Serialize;

/// Author of a commit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitAuthor {
    pub name: String,
    pub email: String,
    /// Raw date string as the service returns it, e.g. `1484167798 -0800`
    pub date: String,
}

/// Information about a commit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub id: String,
    pub author: CommitAuthor,
    pub message: String,
    /// Parent commit ids, first parent first. Empty for a root commit.
    pub parents: Vec<String>,
}

impl Commit {
    /// First parent, the baseline the commit is diffed against
    pub fn first_parent(&self) -> Option<&str> {
        self.parents.first().map(String::as_str)
    }

    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn short_id(&self) -> &str {
        self.id.get(..7).unwrap_or(&self.id)
    }
}

/// Parse a service author date (`<epoch seconds> <+HHMM|-HHMM>`).
///
/// Returns `None` for anything else; callers only use the parsed value for
/// log fields, the report prints the raw string.
pub fn parse_author_date(date: &str) -> Option<DateTime<FixedOffset>> {
    let mut parts = date.split_whitespace();
    let seconds: i64 = parts.next()?.parse().ok()?;

    let offset = match parts.next() {
        Some(tz) => parse_offset(tz)?,
        None => FixedOffset::east_opt(0)?,
    };

    offset.timestamp_opt(seconds, 0).single()
}

fn parse_offset(tz: &str) -> Option<FixedOffset> {
    let (sign, digits) = match tz.split_at_checked(1)? {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => return None,
    };

    if digits.len() != 4 || !digits.is_ascii() {
        return None;
    }

    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_parent() {
        let commit = Commit {
            id: "c3".to_string(),
            parents: vec!["c2".to_string(), "feature".to_string()],
            ..Default::default()
        };
        assert_eq!(commit.first_parent(), Some("c2"));
        assert!(!commit.is_root());

        let root = Commit::default();
        assert_eq!(root.first_parent(), None);
        assert!(root.is_root());
    }

    #[test]
    fn test_short_id() {
        let commit = Commit {
            id: "0123456789abcdef".to_string(),
            ..Default::default()
        };
        assert_eq!(commit.short_id(), "0123456");

        let commit = Commit {
            id: "abc".to_string(),
            ..Default::default()
        };
        assert_eq!(commit.short_id(), "abc");
    }

    #[test]
    fn test_parse_author_date() {
        let parsed = parse_author_date("1484167798 -0800").unwrap();
        assert_eq!(parsed.timestamp(), 1484167798);
        assert_eq!(parsed.offset().local_minus_utc(), -8 * 3600);

        let parsed = parse_author_date("1700000000 +0530").unwrap();
        assert_eq!(parsed.offset().local_minus_utc(), 5 * 3600 + 30 * 60);

        assert!(parse_author_date("1700000000").is_some());
        assert!(parse_author_date("2024-01-01T00:00:00Z").is_none());
        assert!(parse_author_date("1700000000 0800").is_none());
    }
}
