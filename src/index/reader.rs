//! Read side used by page rendering

use std::sync::Arc;

use super::{ContentIndex, ContentIndexResult, IndexError, IndexQuery, QueryExecutor};

/// Rendering context an index read is valid inside.
///
/// Holds the materialized snapshot for the duration of a render. A detached
/// or closed context has no data and every query against it fails with
/// [`IndexError::DataUnavailable`].
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    snapshot: Option<Arc<ContentIndex>>,
}

impl RenderContext {
    /// Open a context over a materialized snapshot
    pub fn new(snapshot: Arc<ContentIndex>) -> Self {
        Self {
            snapshot: Some(snapshot),
        }
    }

    /// A context with no snapshot behind it
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.snapshot.is_some()
    }

    /// End the render; later queries see no data
    pub fn close(&mut self) {
        self.snapshot = None;
    }
}

impl QueryExecutor for RenderContext {
    fn run_query(&self, query: &IndexQuery) -> Result<ContentIndexResult, IndexError> {
        match &self.snapshot {
            Some(snapshot) => snapshot.run_query(query),
            None => Err(IndexError::DataUnavailable(
                "index queried outside a render context".to_string(),
            )),
        }
    }
}

/// Fetches the published site index through an injected executor
pub struct ContentIndexReader<E> {
    executor: E,
}

impl<E: QueryExecutor> ContentIndexReader<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// All published posts, newest first.
    ///
    /// Errors from the executor are returned unchanged.
    pub fn fetch_published_index(&self) -> Result<ContentIndexResult, IndexError> {
        let result = self.executor.run_query(&IndexQuery::site_index())?;
        tracing::debug!("Fetched {} published posts", result.len());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::node;
    use std::cell::Cell;

    fn scenario_context() -> (Arc<ContentIndex>, RenderContext) {
        let index = Arc::new(ContentIndex::new(vec![
            node("A", true, (2021, 1, 1)),
            node("B", false, (2021, 6, 1)),
            node("C", true, (2021, 3, 1)),
            node("D", true, (2020, 12, 31)),
            node("E", false, (2019, 1, 1)),
        ]));
        let ctx = RenderContext::new(Arc::clone(&index));
        (index, ctx)
    }

    #[test]
    fn test_three_item_scenario() {
        let ctx = RenderContext::new(Arc::new(ContentIndex::new(vec![
            node("A", true, (2021, 1, 1)),
            node("B", false, (2021, 6, 1)),
            node("C", true, (2021, 3, 1)),
        ])));
        let reader = ContentIndexReader::new(&ctx);
        let result = reader.fetch_published_index().unwrap();
        let ids: Vec<&str> = result.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["C", "A"]);
    }

    #[test]
    fn test_only_published_items() {
        let (_, ctx) = scenario_context();
        let result = ContentIndexReader::new(&ctx)
            .fetch_published_index()
            .unwrap();
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|item| item.published));
    }

    #[test]
    fn test_sorted_newest_first() {
        let (index, ctx) = scenario_context();
        let result = ContentIndexReader::new(&ctx)
            .fetch_published_index()
            .unwrap();

        let dates: Vec<_> = result
            .iter()
            .map(|item| {
                index
                    .nodes()
                    .iter()
                    .find(|n| n.id == item.id)
                    .unwrap()
                    .date
            })
            .collect();
        assert!(dates.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_repeated_reads_are_identical() {
        let (_, ctx) = scenario_context();
        let reader = ContentIndexReader::new(&ctx);
        let first = reader.fetch_published_index().unwrap();
        let second = reader.fetch_published_index().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fields_pass_through() {
        let (index, ctx) = scenario_context();
        let result = ContentIndexReader::new(ctx).fetch_published_index().unwrap();

        for item in &result {
            let source = index.nodes().iter().find(|n| n.id == item.id).unwrap();
            assert_eq!(item.slug, source.slug);
            assert_eq!(item.tags, source.tags);
            assert_eq!(item.excerpt, source.excerpt);
            assert_eq!(item.reading_time_text, source.reading_time.text);
            assert_eq!(item.title, source.title);
            assert_eq!(item.featured_image, source.featured_image);
        }
    }

    #[test]
    fn test_empty_index_is_not_an_error() {
        let ctx = RenderContext::new(Arc::new(ContentIndex::default()));
        let result = ContentIndexReader::new(&ctx)
            .fetch_published_index()
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_detached_context_is_unavailable() {
        let ctx = RenderContext::detached();
        let err = ContentIndexReader::new(&ctx)
            .fetch_published_index()
            .unwrap_err();
        assert!(matches!(err, IndexError::DataUnavailable(_)));
    }

    #[test]
    fn test_closed_context_is_unavailable() {
        let (_, mut ctx) = scenario_context();
        assert!(ctx.is_open());
        ctx.close();
        assert!(!ctx.is_open());
        let err = ContentIndexReader::new(&ctx)
            .fetch_published_index()
            .unwrap_err();
        assert!(matches!(err, IndexError::DataUnavailable(_)));
    }

    #[test]
    fn test_saved_snapshot_shows_authored_date() {
        use chrono::{FixedOffset, TimeZone};

        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join(crate::index::INDEX_FILE);
        let mut a = node("A", true, (2021, 1, 1));
        a.date = FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2021, 3, 1, 0, 0, 0)
            .unwrap();
        ContentIndex::new(vec![a]).save(&path).unwrap();

        let ctx = RenderContext::new(Arc::new(ContentIndex::load(&path).unwrap()));
        let result = ContentIndexReader::new(&ctx)
            .fetch_published_index()
            .unwrap();
        assert_eq!(result[0].publication_date, "01 March 2021");
    }

    struct CountingExecutor {
        calls: Cell<usize>,
    }

    impl QueryExecutor for CountingExecutor {
        fn run_query(&self, query: &IndexQuery) -> Result<ContentIndexResult, IndexError> {
            self.calls.set(self.calls.get() + 1);
            assert_eq!(query, &IndexQuery::site_index());
            Err(IndexError::InvalidQuery("stub".to_string()))
        }
    }

    #[test]
    fn test_executor_errors_propagate_unchanged() {
        let exec = CountingExecutor {
            calls: Cell::new(0),
        };
        let reader = ContentIndexReader::new(&exec);
        let err = reader.fetch_published_index().unwrap_err();
        assert!(matches!(err, IndexError::InvalidQuery(ref m) if m == "stub"));
        assert_eq!(exec.calls.get(), 1);
    }
}
