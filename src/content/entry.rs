//! Content entry model

use serde::Serialize;
use std::path::{Component, Path, PathBuf};

use super::schema::EntryData;
use super::MarkdownRenderer;

/// One validated content item (a post or a project)
#[derive(Debug, Clone, Serialize)]
pub struct Entry {
    /// Slug derived from the path relative to the collection base
    pub id: String,

    /// Name of the collection the entry was loaded into
    pub collection: String,

    /// Source file path relative to the collection base
    pub source: String,

    /// Full source file path
    #[serde(skip)]
    pub full_source: PathBuf,

    /// Validated front-matter
    pub data: EntryData,

    /// Raw body after the front-matter block
    #[serde(skip)]
    pub body: String,
}

impl Entry {
    /// Render the body to HTML
    pub fn render_html(&self) -> String {
        MarkdownRenderer::new().render(&self.body)
    }

    pub fn is_published(&self) -> bool {
        self.data.published
    }
}

/// Build an entry id from a path relative to the collection base.
///
/// The extension is dropped and every directory component is slugified,
/// so `Notes/Hello World.mdx` becomes `notes/hello-world`. A component with
/// nothing to slugify (`!!!.mdx`) is kept as written.
pub fn entry_id(relative: &Path) -> String {
    let without_ext = relative.with_extension("");
    let parts: Vec<String> = without_ext
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => {
                let raw = s.to_string_lossy();
                let slug = slug::slugify(&raw);
                Some(if slug.is_empty() { raw.into_owned() } else { slug })
            }
            _ => None,
        })
        .collect();
    parts.join("/")
}
