//! Publication filtering for posts and projects

use std::env;

use super::error::Result;
use super::loader::{Collection, ContentLoader};
use super::Entry;

/// Collection holding blog posts
pub const POSTS: &str = "blog";

/// Collection holding portfolio projects
pub const PROJECTS: &str = "projects";

/// Environment variables consulted by [`Mode::from_env`], in order
pub const MODE_VARS: [&str; 2] = ["FOLIO_ENV", "NODE_ENV"];

/// Execution mode of the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    Development,
    #[default]
    Production,
}

impl Mode {
    /// Read the mode from `FOLIO_ENV`, falling back to `NODE_ENV`.
    ///
    /// Only the value `development` selects development mode.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Resolve the mode with `get` standing in for the environment.
    ///
    /// The first variable that is set decides, even when its value is not
    /// `development`.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let value = MODE_VARS.iter().find_map(|var| get(var));
        Self::from_value(value.as_deref())
    }

    /// Exact comparison: surrounding whitespace or other casing is production
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("development") => Mode::Development,
            _ => Mode::Production,
        }
    }
}

/// Which entries a filter lets through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Visibility {
    pub include_unpublished: bool,
}

impl Visibility {
    /// Only published entries
    pub const PUBLIC: Visibility = Visibility {
        include_unpublished: false,
    };

    /// Every entry, published or not
    pub const ALL: Visibility = Visibility {
        include_unpublished: true,
    };

    pub fn allows(&self, entry: &Entry) -> bool {
        entry.data.published || self.include_unpublished
    }
}

impl From<Mode> for Visibility {
    fn from(mode: Mode) -> Self {
        Visibility {
            include_unpublished: mode == Mode::Development,
        }
    }
}

/// Keep the entries `visibility` allows, in load order
pub fn filter_visible(collection: Collection, visibility: Visibility) -> Vec<Entry> {
    collection
        .into_iter()
        .filter(|entry| visibility.allows(entry))
        .collect()
}

/// Load a collection and keep its visible entries
pub fn get_visible(
    loader: &ContentLoader<'_>,
    name: &str,
    visibility: Visibility,
) -> Result<Vec<Entry>> {
    let collection = loader.load_collection(name)?;
    let total = collection.len();
    let visible = filter_visible(collection, visibility);
    tracing::debug!(
        "Collection `{}`: {} of {} entries visible",
        name,
        visible.len(),
        total
    );
    Ok(visible)
}

/// Blog posts visible under `visibility`
pub fn get_posts(loader: &ContentLoader<'_>, visibility: Visibility) -> Result<Vec<Entry>> {
    get_visible(loader, POSTS, visibility)
}

/// Projects visible under `visibility`
pub fn get_projects(loader: &ContentLoader<'_>, visibility: Visibility) -> Result<Vec<Entry>> {
    get_visible(loader, PROJECTS, visibility)
}
