//! folio: content collections for a static blog and portfolio
//!
//! Collections of MDX entries are declared in `_config.yml`, loaded from
//! their base directories with a glob pattern, validated against a fixed
//! front-matter schema and filtered by publication status.

pub mod commands;
pub mod config;
pub mod content;
pub mod redirects;

use anyhow::Result;
use std::path::Path;

use content::{ContentError, ContentLoader, Entry, Visibility};

/// Name of the site configuration file
pub const CONFIG_FILE: &str = "_config.yml";

/// A content site rooted at a directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory; collection bases are resolved against it
    pub base_dir: std::path::PathBuf,
}

impl Site {
    /// Open a site directory, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };

        Ok(Self { config, base_dir })
    }

    pub fn loader(&self) -> ContentLoader<'_> {
        ContentLoader::new(self)
    }

    /// Visible blog posts
    pub fn posts(&self, visibility: Visibility) -> std::result::Result<Vec<Entry>, ContentError> {
        content::get_posts(&self.loader(), visibility)
    }

    /// Visible projects
    pub fn projects(&self, visibility: Visibility) -> std::result::Result<Vec<Entry>, ContentError> {
        content::get_projects(&self.loader(), visibility)
    }

    pub fn redirects(&self) -> redirects::Redirects {
        redirects::Redirects::new(self.config.redirects.clone())
    }
}
