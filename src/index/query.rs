//! Declarative index queries and the executor seam

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use super::{ContentIndex, IndexError, IndexNode};
use crate::content::ContentItem;
use crate::helpers::format_date;

/// Published posts, newest first
pub type ContentIndexResult = Vec<ContentItem>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Date,
    Title,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

/// Equality filters on node fields; `None` matches everything
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexFilter {
    pub published: Option<bool>,
}

impl IndexFilter {
    fn matches(&self, node: &IndexNode) -> bool {
        self.published.map_or(true, |p| node.published == p)
    }
}

/// Shape of an index read: which nodes, in what order, projected how
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexQuery {
    pub filter: IndexFilter,
    pub sort: SortSpec,
    /// Moment-style display format for `publication_date`
    pub date_format: String,
}

impl IndexQuery {
    /// The site index: published posts, newest first
    pub fn site_index() -> Self {
        Self {
            filter: IndexFilter {
                published: Some(true),
            },
            sort: SortSpec {
                field: SortField::Date,
                order: SortOrder::Desc,
            },
            date_format: "DD MMMM YYYY".to_string(),
        }
    }

    /// Reject queries that cannot produce a well-formed `ContentItem`
    pub fn validate(&self) -> Result<(), IndexError> {
        if self.date_format.trim().is_empty() {
            return Err(IndexError::InvalidQuery(
                "date_format must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    fn compare(&self, a: &IndexNode, b: &IndexNode) -> Ordering {
        let ord = match self.sort.field {
            SortField::Date => a.date.cmp(&b.date),
            SortField::Title => a.title.cmp(&b.title),
        };
        match self.sort.order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    }

    fn project(&self, node: &IndexNode) -> ContentItem {
        ContentItem {
            id: node.id.clone(),
            title: node.title.clone(),
            publication_date: format_date(&node.date, &self.date_format),
            published: node.published,
            tags: node.tags.clone(),
            slug: node.slug.clone(),
            reading_time_text: node.reading_time.text.clone(),
            // Pruned by the builder
            excerpt: node.excerpt.clone(),
            featured_image: node.featured_image.clone(),
        }
    }
}

/// Runs an index query against some materialized data.
///
/// Injected into [`super::ContentIndexReader`]; implementations decide
/// whether data is available at all.
pub trait QueryExecutor {
    fn run_query(&self, query: &IndexQuery) -> Result<ContentIndexResult, IndexError>;
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for &E {
    fn run_query(&self, query: &IndexQuery) -> Result<ContentIndexResult, IndexError> {
        (**self).run_query(query)
    }
}

impl QueryExecutor for ContentIndex {
    fn run_query(&self, query: &IndexQuery) -> Result<ContentIndexResult, IndexError> {
        query.validate()?;

        let mut matched: Vec<&IndexNode> = self
            .nodes()
            .iter()
            .filter(|node| query.filter.matches(node))
            .collect();
        // Stable: equal keys keep snapshot order
        matched.sort_by(|a, b| query.compare(a, b));

        Ok(matched.into_iter().map(|node| query.project(node)).collect())
    }
}
