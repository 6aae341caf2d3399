//! Content loader - loads collections from their base directories

use glob::{MatchOptions, Pattern};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::entry::entry_id;
use super::error::{ContentError, Result};
use super::{Entry, FrontMatter, Schema};
use crate::Site;

/// A named, ordered set of validated entries
#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub name: String,
    pub entries: Vec<Entry>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Look up an entry by id
    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }
}

impl IntoIterator for Collection {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Loads the collections declared in the site configuration
pub struct ContentLoader<'a> {
    site: &'a Site,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    /// Load one declared collection by name
    pub fn load_collection(&self, name: &str) -> Result<Collection> {
        let config = self
            .site
            .config
            .collections
            .get(name)
            .ok_or_else(|| ContentError::UnknownCollection(name.to_string()))?;

        let base = self.site.base_dir.join(&config.base);
        load_dir(name, &base, &config.pattern, &Schema)
    }

    /// Load every declared collection, in declaration order
    pub fn load_all(&self) -> Result<Vec<Collection>> {
        self.site
            .config
            .collections
            .keys()
            .map(|name| self.load_collection(name))
            .collect()
    }
}

/// Load a collection from `base`, keeping files whose path relative to
/// `base` matches `pattern`.
///
/// A missing base directory yields an empty collection. Any file that fails
/// to read, split or validate aborts the whole load.
pub fn load_dir(name: &str, base: &Path, pattern: &str, schema: &Schema) -> Result<Collection> {
    let mut collection = Collection::new(name);

    if !base.is_dir() {
        tracing::debug!(
            "Collection `{}`: base {:?} does not exist, treating as empty",
            name,
            base
        );
        return Ok(collection);
    }

    let mut seen = HashSet::new();
    for (path, relative) in matching_files(base, pattern)? {
        let entry = load_entry(name, &path, &relative, schema)?;
        if !seen.insert(entry.id.clone()) {
            return Err(ContentError::DuplicateId {
                collection: name.to_string(),
                id: entry.id,
            });
        }
        collection.entries.push(entry);
    }

    tracing::debug!(
        "Collection `{}`: loaded {} entries from {:?}",
        name,
        collection.len(),
        base
    );
    Ok(collection)
}

/// How collection patterns match relative paths: `*` stays inside one
/// directory, `**` crosses them
pub fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

/// Files under `base` matching `pattern`, as (full path, relative path)
pub fn matching_files(base: &Path, pattern: &str) -> Result<Vec<(PathBuf, PathBuf)>> {
    let pattern = Pattern::new(pattern)?;
    let options = match_options();

    let mut files = Vec::new();
    for entry in WalkDir::new(base).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| ContentError::Io {
            path: e.path().unwrap_or(base).to_path_buf(),
            source: e.into(),
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(base).unwrap_or(path);
        if pattern.matches_with(&to_slash(relative), options) {
            files.push((path.to_path_buf(), relative.to_path_buf()));
        }
    }

    Ok(files)
}

/// Read, split and validate one file
fn load_entry(collection: &str, path: &Path, relative: &Path, schema: &Schema) -> Result<Entry> {
    let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let (fm, body) = FrontMatter::parse(&content).map_err(|e| ContentError::FrontMatter {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let data = schema
        .validate(&fm)
        .map_err(|issues| ContentError::Validation {
            path: path.to_path_buf(),
            issues,
        })?;

    Ok(Entry {
        id: entry_id(relative),
        collection: collection.to_string(),
        source: to_slash(relative),
        full_source: path.to_path_buf(),
        data,
        body: body.to_string(),
    })
}

/// Relative path with `/` separators on every platform
fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::IssueKind;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn post(title: &str, published: bool) -> String {
        format!(
            "---\ntitle: {}\ndescription: about {}\ndateCreated: 2024-01-15\ntags: [notes]\npublished: {}\n---\n\nBody of {}.\n",
            title, title, published, title
        )
    }

    #[test]
    fn test_load_matching_files() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.mdx", &post("A", true));
        write(tmp.path(), "b.mdx", &post("B", false));
        write(tmp.path(), "notes.md", &post("Ignored", true));
        write(tmp.path(), "drafts/c.mdx", &post("Nested", true));

        let collection = load_dir("blog", tmp.path(), "*.mdx", &Schema::default()).unwrap();
        let ids: Vec<_> = collection.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);

        let a = collection.get("a").unwrap();
        assert_eq!(a.collection, "blog");
        assert_eq!(a.source, "a.mdx");
        assert_eq!(a.data.title, "A");
        assert_eq!(a.body, "Body of A.\n");
    }

    #[test]
    fn test_recursive_pattern() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.mdx", &post("A", true));
        write(tmp.path(), "2024/c.mdx", &post("C", true));

        let collection = load_dir("blog", tmp.path(), "**/*.mdx", &Schema::default()).unwrap();
        let ids: Vec<_> = collection.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["2024/c", "a"]);
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        let collection = load_dir(
            "blog",
            &tmp.path().join("nope"),
            "*.mdx",
            &Schema::default(),
        )
        .unwrap();
        assert!(collection.is_empty());
    }

    #[test]
    fn test_no_matching_files_is_empty() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "readme.txt", "hello");
        let collection = load_dir("blog", tmp.path(), "*.mdx", &Schema::default()).unwrap();
        assert!(collection.is_empty());
    }

    #[test]
    fn test_invalid_entry_aborts_collection() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.mdx", &post("A", true));
        write(
            tmp.path(),
            "b.mdx",
            "---\ndescription: no title\ndateCreated: 2024-01-15\ntags: []\n---\nBody",
        );

        let err = load_dir("blog", tmp.path(), "*.mdx", &Schema::default()).unwrap_err();
        match &err {
            ContentError::Validation { path, issues } => {
                assert!(path.ends_with("b.mdx"));
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].field, "title");
                assert_eq!(issues[0].kind, IssueKind::Missing);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_too_many_tags_aborts_collection() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            "a.mdx",
            "---\ntitle: A\ndescription: d\ndateCreated: 2024-01-15\ntags: [a, b, c, d]\n---\n",
        );
        let err = load_dir("blog", tmp.path(), "*.mdx", &Schema::default()).unwrap_err();
        assert_eq!(
            err.issues()[0].kind,
            IssueKind::TooMany { max: 3, found: 4 }
        );
    }

    #[test]
    fn test_unclosed_frontmatter() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.mdx", "---\ntitle: A\n");
        let err = load_dir("blog", tmp.path(), "*.mdx", &Schema::default()).unwrap_err();
        assert!(matches!(err, ContentError::FrontMatter { .. }));
    }

    #[test]
    fn test_duplicate_ids() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "Hello World.mdx", &post("A", true));
        write(tmp.path(), "hello-world.mdx", &post("B", true));
        let err = load_dir("blog", tmp.path(), "*.mdx", &Schema::default()).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateId { ref id, .. } if id == "hello-world"));
    }

    #[test]
    fn test_punctuation_file_names_get_distinct_ids() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "!!!.mdx", &post("Bang", true));
        write(tmp.path(), "???.mdx", &post("Query", true));
        let collection = load_dir("blog", tmp.path(), "*.mdx", &Schema::default()).unwrap();
        let ids: Vec<_> = collection.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["!!!", "???"]);
    }

    #[test]
    fn test_invalid_pattern() {
        let tmp = TempDir::new().unwrap();
        let err = load_dir("blog", tmp.path(), "[*.mdx", &Schema::default()).unwrap_err();
        assert!(matches!(err, ContentError::Pattern(_)));
    }

    #[test]
    fn test_load_through_site_config() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "src/content/blog/a.mdx", &post("A", true));
        write(tmp.path(), "src/content/projects/p.mdx", &post("P", false));

        let site = Site::new(tmp.path()).unwrap();
        let loader = ContentLoader::new(&site);

        let all = loader.load_all().unwrap();
        let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["blog", "projects"]);
        assert_eq!(all[0].len(), 1);
        assert_eq!(all[1].len(), 1);

        let err = loader.load_collection("docs").unwrap_err();
        assert!(matches!(err, ContentError::UnknownCollection(ref n) if n == "docs"));
    }
}
