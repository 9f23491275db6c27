//! Content module - post records, front-matter and Markdown processing

mod frontmatter;
mod item;
pub mod loader;
mod markdown;

pub use frontmatter::FrontMatter;
pub use item::{ContentItem, ImageDescriptor, ReadingTime};
pub use markdown::{prune_excerpt, to_plain_text};
