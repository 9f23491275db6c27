//! Content index - the build-time snapshot of every post and the read side
//! that page rendering queries.
//!
//! The snapshot is materialized once by [`crate::content::loader`] and saved
//! as JSON. Rendering opens a [`RenderContext`] on it and reads published
//! posts through a [`ContentIndexReader`]; nothing on the read side mutates
//! the snapshot.

mod error;
mod query;
mod reader;

pub use error::IndexError;
pub use query::{
    ContentIndexResult, IndexFilter, IndexQuery, QueryExecutor, SortField, SortOrder, SortSpec,
};
pub use reader::{ContentIndexReader, RenderContext};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::content::{ImageDescriptor, ReadingTime};

/// File name of the saved index inside the index directory
pub const INDEX_FILE: &str = "index.json";

/// One post as recorded in the snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexNode {
    pub id: String,
    pub title: String,
    /// Full timestamp in the offset it was authored in. Queries sort on the
    /// instant and display the calendar date of that offset.
    pub date: DateTime<FixedOffset>,
    pub published: bool,
    pub tags: Vec<String>,
    pub slug: String,
    pub reading_time: ReadingTime,
    pub excerpt: String,
    pub featured_image: Option<ImageDescriptor>,
    /// Source path relative to the source directory
    pub source: String,
}

/// Immutable snapshot of all posts, published or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentIndex {
    version: u32,
    nodes: Vec<IndexNode>,
}

impl Default for ContentIndex {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ContentIndex {
    /// Current index format version
    pub const VERSION: u32 = 1;

    pub fn new(nodes: Vec<IndexNode>) -> Self {
        Self {
            version: Self::VERSION,
            nodes,
        }
    }

    pub fn nodes(&self) -> &[IndexNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check that slugs and ids are unique across the snapshot
    pub fn validate(&self) -> Result<(), IndexError> {
        let mut slugs: HashMap<&str, &str> = HashMap::new();
        let mut ids: HashMap<&str, &str> = HashMap::new();

        for node in &self.nodes {
            if let Some(first) = slugs.insert(&node.slug, &node.source) {
                return Err(IndexError::DuplicateSlug {
                    slug: node.slug.clone(),
                    first: first.to_string(),
                    second: node.source.clone(),
                });
            }
            if let Some(first) = ids.insert(&node.id, &node.source) {
                return Err(IndexError::DuplicateId {
                    id: node.id.clone(),
                    first: first.to_string(),
                    second: node.source.clone(),
                });
            }
        }

        Ok(())
    }

    /// Write the snapshot as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), IndexError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        tracing::debug!("Saved {} index nodes to {:?}", self.nodes.len(), path);
        Ok(())
    }

    /// Load and validate a saved snapshot.
    ///
    /// Typed deserialization is the shape check: unknown or missing fields
    /// fail here rather than at render time.
    pub fn load(path: &Path) -> Result<Self, IndexError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(IndexError::NotBuilt(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let value: serde_json::Value = serde_json::from_str(&content)?;
        let found = value.get("version").and_then(|v| v.as_u64()).unwrap_or(0);
        if found != u64::from(Self::VERSION) {
            return Err(IndexError::VersionMismatch {
                found,
                expected: Self::VERSION,
            });
        }

        let index: ContentIndex = serde_json::from_value(value)?;
        index.validate()?;
        tracing::debug!("Loaded {} index nodes from {:?}", index.nodes.len(), path);
        Ok(index)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    /// Index node dated at UTC midnight
    pub(crate) fn node(id: &str, published: bool, (y, m, d): (i32, u32, u32)) -> IndexNode {
        IndexNode {
            id: id.to_string(),
            title: format!("Post {}", id),
            date: FixedOffset::east_opt(0)
                .unwrap()
                .with_ymd_and_hms(y, m, d, 0, 0, 0)
                .unwrap(),
            published,
            tags: vec!["rust".to_string(), id.to_lowercase()],
            slug: format!("/{}/", id.to_lowercase()),
            reading_time: ReadingTime {
                text: "1 min read".to_string(),
                minutes: 0.25,
                words: 50,
            },
            excerpt: format!("Excerpt of {}", id),
            featured_image: None,
            source: format!("posts/{}.md", id.to_lowercase()),
        }
    }

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".site-index").join(INDEX_FILE);

        let mut with_image = node("B", true, (2021, 6, 1));
        with_image.featured_image = Some(ImageDescriptor::new(
            "/posts/b/cover.jpg",
            &crate::config::ImageConfig::default(),
        ));
        let index = ContentIndex::new(vec![node("A", true, (2021, 1, 1)), with_image]);
        index.save(&path).unwrap();

        let loaded = ContentIndex::load(&path).unwrap();
        assert_eq!(loaded, index);
    }

    #[test]
    fn test_load_missing_is_not_built() {
        let tmp = TempDir::new().unwrap();
        let err = ContentIndex::load(&tmp.path().join(INDEX_FILE)).unwrap_err();
        assert!(matches!(err, IndexError::NotBuilt(_)));
    }

    #[test]
    fn test_load_rejects_other_version() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(INDEX_FILE);
        fs::write(&path, r#"{"version": 99, "nodes": []}"#).unwrap();
        let err = ContentIndex::load(&path).unwrap_err();
        assert!(matches!(
            err,
            IndexError::VersionMismatch {
                found: 99,
                expected: 1
            }
        ));
    }

    #[test]
    fn test_load_rejects_version_past_u32() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(INDEX_FILE);
        fs::write(&path, r#"{"version": 4294967297, "nodes": []}"#).unwrap();
        let err = ContentIndex::load(&path).unwrap_err();
        assert!(matches!(
            err,
            IndexError::VersionMismatch {
                found: 4294967297,
                expected: 1
            }
        ));
    }

    #[test]
    fn test_load_keeps_authored_offset() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(INDEX_FILE);
        let mut a = node("A", true, (2021, 1, 1));
        a.date = FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2021, 3, 1, 0, 0, 0)
            .unwrap();
        ContentIndex::new(vec![a]).save(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("2021-03-01T00:00:00+08:00"));

        let loaded = ContentIndex::load(&path).unwrap();
        assert_eq!(loaded.nodes()[0].date.offset().local_minus_utc(), 8 * 3600);
    }

    #[test]
    fn test_load_rejects_wrong_shape() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(INDEX_FILE);
        fs::write(
            &path,
            r#"{"version": 1, "nodes": [{"id": "x", "title": "No other fields"}]}"#,
        )
        .unwrap();
        let err = ContentIndex::load(&path).unwrap_err();
        assert!(matches!(err, IndexError::Schema(_)));
    }

    #[test]
    fn test_validate_duplicate_slug() {
        let mut b = node("B", true, (2021, 2, 1));
        b.slug = "/a/".to_string();
        let index = ContentIndex::new(vec![node("A", true, (2021, 1, 1)), b]);
        let err = index.validate().unwrap_err();
        assert!(matches!(err, IndexError::DuplicateSlug { .. }));
    }

    #[test]
    fn test_validate_duplicate_id() {
        let mut b = node("B", true, (2021, 2, 1));
        b.id = "A".to_string();
        let index = ContentIndex::new(vec![node("A", true, (2021, 1, 1)), b]);
        let err = index.validate().unwrap_err();
        assert!(matches!(err, IndexError::DuplicateId { .. }));
    }
}
