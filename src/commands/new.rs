//! Create a new entry

use anyhow::{bail, Context, Result};
use glob::Pattern;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::PathBuf;

use super::list::collection_name;
use crate::content::loader::match_options;
use crate::Site;

/// Scaffold an unpublished entry in a collection, returning its path
pub fn create_entry(site: &Site, content_type: &str, title: &str) -> Result<PathBuf> {
    let name = collection_name(content_type);
    let config = site
        .config
        .collections
        .get(name)
        .with_context(|| format!("Unknown collection: {}", name))?;

    let slug = slug::slugify(title);
    if slug.is_empty() {
        bail!("Title {:?} has no characters usable in a file name", title);
    }

    let file_name = format!("{}.{}", slug, extension_for(&config.pattern));
    let relative = match literal_dir(&config.pattern) {
        Some(dir) => format!("{}/{}", dir, file_name),
        None => file_name,
    };

    // The entry must be picked up by its own collection
    let pattern = Pattern::new(&config.pattern)
        .with_context(|| format!("Invalid pattern for collection {}", name))?;
    if !pattern.matches_with(&relative, match_options()) {
        bail!(
            "Cannot place a new entry for pattern {:?} in collection {}; create it by hand",
            config.pattern,
            name
        );
    }

    let file_path = site.base_dir.join(&config.base).join(&relative);
    if file_path.exists() {
        bail!("{:?} already exists", file_path);
    }

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, scaffold(title)?)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Leading directories of a pattern that contain no wildcards
fn literal_dir(pattern: &str) -> Option<String> {
    let (dirs, _file) = pattern.rsplit_once('/')?;
    let literal: Vec<&str> = dirs
        .split('/')
        .take_while(|part| !part.is_empty() && !part.contains(['*', '?', '[']))
        .collect();
    (!literal.is_empty()).then(|| literal.join("/"))
}

/// File extension implied by a collection's glob pattern
fn extension_for(pattern: &str) -> &str {
    pattern
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("mdx")
}

fn scaffold(title: &str) -> Result<String> {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();

    let mut fm = Mapping::new();
    fm.insert("title".into(), title.into());
    fm.insert("description".into(), "".into());
    fm.insert("dateCreated".into(), today.into());
    fm.insert("tags".into(), Value::Sequence(Vec::new()));
    fm.insert("published".into(), false.into());

    Ok(format!("---\n{}---\n\n", serde_yaml::to_string(&fm)?))
}
