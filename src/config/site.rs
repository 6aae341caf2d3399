//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::content::visibility::{POSTS, PROJECTS};

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub url: String,

    /// Declared collections, by name. Declaring this key replaces the
    /// default `blog` and `projects` collections.
    pub collections: IndexMap<String, CollectionConfig>,

    /// Exact-path redirects, source path to target path
    pub redirects: IndexMap<String, String>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let mut collections = IndexMap::new();
        collections.insert(
            POSTS.to_string(),
            CollectionConfig::new("src/content/blog", "*.mdx"),
        );
        collections.insert(
            PROJECTS.to_string(),
            CollectionConfig::new("src/content/projects", "*.mdx"),
        );

        Self {
            title: "Folio".to_string(),
            url: "http://example.com".to_string(),
            collections,
            redirects: IndexMap::new(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig =
            serde_yaml::from_str(&content).with_context(|| format!("Invalid config {:?}", path))?;
        Ok(config)
    }
}

/// Where a collection's files live and how they are matched.
///
/// The entry schema is fixed and not configurable per collection, so keys
/// other than `base` and `pattern` are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectionConfig {
    /// Base directory, relative to the site directory
    pub base: String,
    /// Glob matched against paths relative to `base`
    pub pattern: String,
}

impl CollectionConfig {
    pub fn new(base: &str, pattern: &str) -> Self {
        Self {
            base: base.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self::new("src/content", "*.mdx")
    }
}
