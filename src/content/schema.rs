//! Entry schema and validation
//!
//! Every entry in a collection must satisfy the same schema:
//!
//! | key           | type                         | required |
//! |---------------|------------------------------|----------|
//! | `title`       | string                       | yes      |
//! | `description` | string                       | yes      |
//! | `dateCreated` | date string or ms timestamp  | yes      |
//! | `tags`        | array of at most 3 strings   | yes      |
//! | `published`   | boolean (default `false`)    | no       |
//!
//! `categories` is read as an alias of `tags` for older content. Any other
//! key is kept in [`EntryData::extra`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use indexmap::IndexMap;

use super::error::{Issue, IssueKind};
use super::FrontMatter;

/// Upper bound on the number of tags per entry
pub const MAX_TAGS: usize = 3;

const KNOWN_KEYS: [&str; 6] = [
    "title",
    "description",
    "dateCreated",
    "tags",
    "categories",
    "published",
];

/// Validated front-matter of an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryData {
    pub title: String,
    pub description: String,
    #[serde(rename = "dateCreated")]
    pub date_created: DateTime<Utc>,
    pub tags: Vec<String>,
    pub published: bool,
    /// Keys outside the schema, passed through untouched
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

/// The schema shared by every collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Schema;

impl Schema {
    /// Check front-matter against the schema.
    ///
    /// All issues are collected instead of stopping at the first one.
    pub fn validate(&self, fm: &FrontMatter) -> Result<EntryData, Vec<Issue>> {
        let mut issues = Vec::new();

        let title = required_string(fm, "title", &mut issues);
        let description = required_string(fm, "description", &mut issues);
        let date_created = required_date(fm, "dateCreated", &mut issues);
        let tags = self.tags(fm, &mut issues);
        let published = optional_bool(fm, "published", &mut issues);

        let extra = fm
            .fields
            .iter()
            .filter_map(|(k, v)| {
                let key = k.as_str()?;
                (!KNOWN_KEYS.contains(&key)).then(|| (key.to_string(), v.clone()))
            })
            .collect();

        match (title, description, date_created, tags) {
            (Some(title), Some(description), Some(date_created), Some(tags))
                if issues.is_empty() =>
            {
                Ok(EntryData {
                    title,
                    description,
                    date_created,
                    tags,
                    published,
                    extra,
                })
            }
            _ => Err(issues),
        }
    }

    fn tags(&self, fm: &FrontMatter, issues: &mut Vec<Issue>) -> Option<Vec<String>> {
        let (key, value) = match (present(fm, "tags"), present(fm, "categories")) {
            (Some(_), Some(_)) => {
                issues.push(Issue::new(
                    "categories",
                    IssueKind::Conflict("tags".to_string()),
                ));
                return None;
            }
            (Some(v), None) => ("tags", v),
            (None, Some(v)) => ("categories", v),
            (None, None) => {
                issues.push(Issue::new("tags", IssueKind::Missing));
                return None;
            }
        };

        let Value::Sequence(items) = value else {
            issues.push(Issue::new(
                key,
                IssueKind::WrongType {
                    expected: "an array of strings",
                },
            ));
            return None;
        };

        let mut tags = Vec::with_capacity(items.len());
        let mut ok = true;
        for (i, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(s) => tags.push(s.to_string()),
                None => {
                    ok = false;
                    issues.push(Issue::new(
                        format!("{}[{}]", key, i),
                        IssueKind::WrongType {
                            expected: "a string",
                        },
                    ));
                }
            }
        }

        if items.len() > MAX_TAGS {
            ok = false;
            issues.push(Issue::new(
                key,
                IssueKind::TooMany {
                    max: MAX_TAGS,
                    found: items.len(),
                },
            ));
        }

        ok.then_some(tags)
    }
}

/// A key with an explicit `null` value counts as absent
fn present<'a>(fm: &'a FrontMatter, key: &str) -> Option<&'a Value> {
    fm.get(key).filter(|v| !v.is_null())
}

fn required_string(fm: &FrontMatter, key: &str, issues: &mut Vec<Issue>) -> Option<String> {
    match present(fm, key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            issues.push(Issue::new(
                key,
                IssueKind::WrongType {
                    expected: "a string",
                },
            ));
            None
        }
        None => {
            issues.push(Issue::new(key, IssueKind::Missing));
            None
        }
    }
}

fn required_date(fm: &FrontMatter, key: &str, issues: &mut Vec<Issue>) -> Option<DateTime<Utc>> {
    let value = match present(fm, key) {
        Some(v) => v,
        None => {
            issues.push(Issue::new(key, IssueKind::Missing));
            return None;
        }
    };

    let parsed = match value {
        Value::String(s) => parse_date_string(s),
        Value::Number(n) => timestamp_millis(n),
        _ => {
            issues.push(Issue::new(
                key,
                IssueKind::WrongType {
                    expected: "a date",
                },
            ));
            return None;
        }
    };

    if parsed.is_none() {
        let shown = match value {
            Value::String(s) => s.clone(),
            other => serde_yaml::to_string(other)
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
        };
        issues.push(Issue::new(key, IssueKind::InvalidDate(shown)));
    }
    parsed
}

/// Millisecond timestamp; fractional milliseconds are truncated
fn timestamp_millis(n: &serde_yaml::Number) -> Option<DateTime<Utc>> {
    let millis = match n.as_i64() {
        Some(ms) => ms,
        None => {
            let ms = n.as_f64().filter(|f| f.is_finite())?.trunc();
            if ms < i64::MIN as f64 || ms > i64::MAX as f64 {
                return None;
            }
            ms as i64
        }
    };
    DateTime::<Utc>::from_timestamp_millis(millis)
}

fn optional_bool(fm: &FrontMatter, key: &str, issues: &mut Vec<Issue>) -> bool {
    match present(fm, key) {
        Some(Value::Bool(b)) => *b,
        Some(_) => {
            issues.push(Issue::new(
                key,
                IssueKind::WrongType {
                    expected: "a boolean",
                },
            ));
            false
        }
        None => false,
    }
}

/// Parse a date string in the formats content authors commonly write.
///
/// Values without an offset are taken as UTC.
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let offset_formats = ["%Y-%m-%dT%H:%M:%S%z", "%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%z"];
    for fmt in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fm(yaml: &str) -> FrontMatter {
        let content = format!("---\n{}\n---\n", yaml);
        FrontMatter::parse(&content).unwrap().0
    }

    const VALID: &str = r#"title: Hello
description: First post
dateCreated: 2024-01-15
tags: [rust, web]
published: true"#;

    #[test]
    fn test_valid_entry() {
        let data = Schema::default().validate(&fm(VALID)).unwrap();
        assert_eq!(data.title, "Hello");
        assert_eq!(data.description, "First post");
        assert_eq!(data.date_created.format("%Y-%m-%d").to_string(), "2024-01-15");
        assert_eq!(data.tags, vec!["rust", "web"]);
        assert!(data.published);
        assert!(data.extra.is_empty());
    }

    #[test]
    fn test_published_defaults_to_false() {
        let data = Schema::default()
            .validate(&fm("title: A\ndescription: d\ndateCreated: 2024-01-15\ntags: []"))
            .unwrap();
        assert!(!data.published);
    }

    #[test]
    fn test_missing_title() {
        let issues = Schema::default()
            .validate(&fm("description: d\ndateCreated: 2024-01-15\ntags: []"))
            .unwrap_err();
        assert_eq!(issues, vec![Issue::new("title", IssueKind::Missing)]);
    }

    #[test]
    fn test_empty_frontmatter_reports_every_required_field() {
        let issues = Schema::default().validate(&FrontMatter::default()).unwrap_err();
        let fields: Vec<_> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "description", "dateCreated", "tags"]);
    }

    #[test]
    fn test_four_tags_rejected() {
        let issues = Schema::default()
            .validate(&fm(
                "title: A\ndescription: d\ndateCreated: 2024-01-15\ntags: [a, b, c, d]",
            ))
            .unwrap_err();
        assert_eq!(
            issues,
            vec![Issue::new("tags", IssueKind::TooMany { max: 3, found: 4 })]
        );
    }

    #[test]
    fn test_three_tags_accepted() {
        let data = Schema::default()
            .validate(&fm(
                "title: A\ndescription: d\ndateCreated: 2024-01-15\ntags: [a, b, c]",
            ))
            .unwrap();
        assert_eq!(data.tags.len(), 3);
    }

    #[test]
    fn test_categories_alias_has_the_same_tag_limit() {
        let issues = Schema::default()
            .validate(&fm(
                "title: A\ndescription: d\ndateCreated: 2024-01-15\ncategories: [a, b, c, d, e]",
            ))
            .unwrap_err();
        assert_eq!(
            issues,
            vec![Issue::new(
                "categories",
                IssueKind::TooMany { max: 3, found: 5 }
            )]
        );
    }

    #[test]
    fn test_categories_alias() {
        let data = Schema::default()
            .validate(&fm(
                "title: A\ndescription: d\ndateCreated: 2024-01-15\ncategories: [notes]",
            ))
            .unwrap();
        assert_eq!(data.tags, vec!["notes"]);
    }

    #[test]
    fn test_tags_and_categories_conflict() {
        let issues = Schema::default()
            .validate(&fm(
                "title: A\ndescription: d\ndateCreated: 2024-01-15\ntags: [a]\ncategories: [b]",
            ))
            .unwrap_err();
        assert_eq!(
            issues,
            vec![Issue::new(
                "categories",
                IssueKind::Conflict("tags".to_string())
            )]
        );
    }

    #[test]
    fn test_wrong_types() {
        let issues = Schema::default()
            .validate(&fm(
                "title: 42\ndescription: d\ndateCreated: true\ntags: [a, 7]\npublished: \"yes\"",
            ))
            .unwrap_err();
        let fields: Vec<_> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "dateCreated", "tags[1]", "published"]);
        assert!(issues
            .iter()
            .all(|i| matches!(i.kind, IssueKind::WrongType { .. })));
    }

    #[test]
    fn test_invalid_date() {
        let issues = Schema::default()
            .validate(&fm("title: A\ndescription: d\ndateCreated: someday\ntags: []"))
            .unwrap_err();
        assert_eq!(
            issues,
            vec![Issue::new(
                "dateCreated",
                IssueKind::InvalidDate("someday".to_string())
            )]
        );
    }

    #[test]
    fn test_millisecond_timestamp() {
        let data = Schema::default()
            .validate(&fm(
                "title: A\ndescription: d\ndateCreated: 1705276800000\ntags: []",
            ))
            .unwrap();
        assert_eq!(data.date_created.to_rfc3339(), "2024-01-15T00:00:00+00:00");
    }

    #[test]
    fn test_fractional_timestamp() {
        let data = Schema::default()
            .validate(&fm(
                "title: A\ndescription: d\ndateCreated: 1705276800000.9\ntags: []",
            ))
            .unwrap();
        assert_eq!(data.date_created.to_rfc3339(), "2024-01-15T00:00:00+00:00");

        let issues = Schema::default()
            .validate(&fm("title: A\ndescription: d\ndateCreated: .nan\ntags: []"))
            .unwrap_err();
        assert!(matches!(issues[0].kind, IssueKind::InvalidDate(_)));
    }

    #[test]
    fn test_unknown_keys_keep_their_order() {
        let data = Schema::default()
            .validate(&fm(
                "zeta: 1\ntitle: A\nalpha: 2\ndescription: d\ndateCreated: 2024-01-15\ntags: []\nmid: 3",
            ))
            .unwrap();
        let keys: Vec<_> = data.extra.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_unknown_keys_kept() {
        let data = Schema::default()
            .validate(&fm(
                "title: A\ndescription: d\ndateCreated: 2024-01-15\ntags: []\nheroImage: /a.png",
            ))
            .unwrap();
        assert_eq!(
            data.extra.get("heroImage").and_then(Value::as_str),
            Some("/a.png")
        );
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = "2024-01-15T10:30:00+00:00";
        for s in [
            "2024-01-15 10:30:00",
            "2024/01/15 10:30:00",
            "2024-01-15T10:30:00",
            "2024-01-15T10:30:00Z",
            "2024-01-15T12:30:00+02:00",
        ] {
            assert_eq!(parse_date_string(s).unwrap().to_rfc3339(), expected, "{}", s);
        }
        assert!(parse_date_string("15th of January").is_none());
    }
}
