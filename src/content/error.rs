//! Errors raised while loading a content collection

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A single schema violation found in an entry's front-matter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Front-matter key the issue refers to
    pub field: String,
    pub kind: IssueKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Required field is absent
    Missing,
    /// Field is present but has the wrong type
    WrongType { expected: &'static str },
    /// Array has more items than allowed
    TooMany { max: usize, found: usize },
    /// Value could not be coerced into a date
    InvalidDate(String),
    /// Two keys describe the same field
    Conflict(String),
}

impl Issue {
    pub fn new(field: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            field: field.into(),
            kind,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::Missing => write!(f, "`{}`: required field is missing", self.field),
            IssueKind::WrongType { expected } => {
                write!(f, "`{}`: expected {}", self.field, expected)
            }
            IssueKind::TooMany { max, found } => write!(
                f,
                "`{}`: at most {} items allowed, found {}",
                self.field, max, found
            ),
            IssueKind::InvalidDate(value) => {
                write!(f, "`{}`: cannot read {:?} as a date", self.field, value)
            }
            IssueKind::Conflict(other) => write!(
                f,
                "`{}`: conflicts with `{}`, use only one of them",
                self.field, other
            ),
        }
    }
}

/// Collection loading error
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed front-matter in {path:?}: {message}")]
    FrontMatter { path: PathBuf, message: String },

    #[error("Invalid entry {path:?}: {}", join_issues(.issues))]
    Validation { path: PathBuf, issues: Vec<Issue> },

    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    #[error("Duplicate entry id `{id}` in collection `{collection}`")]
    DuplicateId { collection: String, id: String },

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

impl ContentError {
    /// Schema issues if this is a validation failure
    pub fn issues(&self) -> &[Issue] {
        match self {
            ContentError::Validation { issues, .. } => issues,
            _ => &[],
        }
    }
}

fn join_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_every_issue() {
        let err = ContentError::Validation {
            path: PathBuf::from("blog/a.mdx"),
            issues: vec![
                Issue::new("title", IssueKind::Missing),
                Issue::new("tags", IssueKind::TooMany { max: 3, found: 4 }),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("`title`: required field is missing"));
        assert!(msg.contains("at most 3 items allowed, found 4"));
        assert_eq!(err.issues().len(), 2);
    }
}
