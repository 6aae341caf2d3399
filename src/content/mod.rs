//! Content module - collections, entry schema and publication filtering

mod entry;
mod error;
mod frontmatter;
pub mod loader;
mod markdown;
pub mod schema;
pub mod visibility;

pub use entry::{entry_id, Entry};
pub use error::{ContentError, Issue, IssueKind};
pub use frontmatter::{FrontMatter, FrontMatterError};
pub use loader::{Collection, ContentLoader};
pub use markdown::MarkdownRenderer;
pub use schema::{EntryData, Schema};
pub use visibility::{get_posts, get_projects, Mode, Visibility};
