//! Front-matter splitting

use serde_yaml::{Mapping, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("opening `---` has no closing `---`")]
    Unclosed,

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("front-matter must be a mapping of keys to values")]
    NotAMapping,
}

/// Raw front-matter fields of a content file, not yet checked against a schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub fields: Mapping,
}

impl FrontMatter {
    /// Split content into front-matter and body.
    ///
    /// Content that does not open with a `---` line has no front-matter: the
    /// result is an empty mapping and the whole content as body.
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        let Some(rest) = content.strip_prefix("---") else {
            return Ok((FrontMatter::default(), content));
        };

        // The opening delimiter must be alone on its line; `----` or
        // `--- text` is markdown, not front-matter.
        let (opening, rest) = match rest.find('\n') {
            Some(pos) => (&rest[..pos], &rest[pos + 1..]),
            None => (rest, ""),
        };
        if !opening.trim().is_empty() {
            return Ok((FrontMatter::default(), content));
        }

        let mut offset = 0;
        for line in rest.split_inclusive('\n') {
            if line.trim_end() == "---" {
                let yaml = &rest[..offset];
                let body = rest[offset + line.len()..].trim_start_matches(['\n', '\r']);
                return Ok((Self::from_yaml(yaml)?, body));
            }
            offset += line.len();
        }

        Err(FrontMatterError::Unclosed)
    }

    fn from_yaml(yaml: &str) -> Result<Self, FrontMatterError> {
        if yaml.trim().is_empty() {
            return Ok(FrontMatter::default());
        }

        match serde_yaml::from_str::<Value>(yaml)? {
            Value::Mapping(fields) => Ok(Self { fields }),
            Value::Null => Ok(FrontMatter::default()),
            _ => Err(FrontMatterError::NotAMapping),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
