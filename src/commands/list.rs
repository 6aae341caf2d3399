//! List collection entries

use anyhow::Result;

use crate::content::visibility::{get_visible, POSTS, PROJECTS};
use crate::content::{Entry, Visibility};
use crate::Site;

/// Map the CLI's content type to a collection name
pub fn collection_name(content_type: &str) -> &str {
    match content_type {
        "post" | "posts" => POSTS,
        "project" | "projects" => PROJECTS,
        other => other,
    }
}

/// List the visible entries of a collection
pub fn run(site: &Site, content_type: &str, visibility: Visibility, json: bool) -> Result<()> {
    let name = collection_name(content_type);
    let entries = get_visible(&site.loader(), name, visibility)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("{} ({}):", name, entries.len());
    for entry in &entries {
        println!("  {}", format_line(entry));
    }

    Ok(())
}

fn format_line(entry: &Entry) -> String {
    let draft = if entry.data.published { "" } else { " (draft)" };
    let tags = if entry.data.tags.is_empty() {
        String::new()
    } else {
        format!(" #{}", entry.data.tags.join(" #"))
    };
    format!(
        "{} - {}{} [{}]{}",
        entry.data.date_created.format("%Y-%m-%d"),
        entry.data.title,
        draft,
        entry.id,
        tags
    )
}
