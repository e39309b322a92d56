//! Drives a [`SearchQuery`] across pages until every match is consumed.
//!
//! # Design
//! [`Paginator`] is the host-does-IO form: it hands out the next query,
//! the caller executes it, and the resulting page is fed back with
//! [`Paginator::record`]. [`pages`] wraps the same state machine around a
//! fetch closure as an `Iterator`.
//!
//! `total` is taken from the first page and never re-read. Each page moves
//! the offset by the number of results actually returned, so a short page
//! is harmless. Iteration ends once `offset >= total`; a first page with
//! `total == 0` ends it after one request.

use tracing::{debug, warn};

use crate::error::ApiError;
use crate::search::{SearchQuery, SearchResults};

#[derive(Debug, Clone)]
pub struct Paginator {
    query: SearchQuery,
    total: Option<u64>,
    page_size: Option<u32>,
    requests: usize,
    done: bool,
}

impl Paginator {
    pub fn new(query: SearchQuery) -> Self {
        Self {
            query,
            total: None,
            page_size: None,
            requests: 0,
            done: false,
        }
    }

    /// Query for the next page, or `None` once iteration has finished.
    pub fn next_query(&self) -> Option<&SearchQuery> {
        (!self.done).then_some(&self.query)
    }

    /// Account for a page fetched with the current query.
    pub fn record<T>(&mut self, page: &SearchResults<T>) {
        if self.done {
            return;
        }
        self.requests += 1;
        let total = *self.total.get_or_insert(page.total);
        if page.count.is_some() {
            self.page_size = page.count;
        }

        let returned = page.results.len() as u64;
        self.query = self.query.advanced_by(returned);
        let offset = self.query.current_offset();
        debug!(offset, total, returned, requests = self.requests, "recorded search page");

        if offset >= total {
            self.done = true;
        } else if returned == 0 {
            warn!(offset, total, "search page returned no results before reaching total");
            self.done = true;
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Offset the next request would use.
    pub fn offset(&self) -> u64 {
        self.query.current_offset()
    }

    /// Total reported by the first page, once known.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// Page size last reported by the server.
    pub fn page_size(&self) -> Option<u32> {
        self.page_size
    }

    /// Number of pages recorded so far.
    pub fn requests(&self) -> usize {
        self.requests
    }
}

/// Iterate pages of `query`, calling `fetch` once per page.
///
/// The first error is yielded and the iterator then ends. Pages already
/// yielded remain with the caller.
pub fn pages<T, F>(query: SearchQuery, fetch: F) -> Pages<T, F>
where
    F: FnMut(&SearchQuery) -> Result<SearchResults<T>, ApiError>,
{
    Pages {
        paginator: Paginator::new(query),
        fetch,
        failed: false,
        _marker: std::marker::PhantomData,
    }
}

pub struct Pages<T, F> {
    paginator: Paginator,
    fetch: F,
    failed: bool,
    _marker: std::marker::PhantomData<fn() -> T>,
}

impl<T, F> Pages<T, F>
where
    F: FnMut(&SearchQuery) -> Result<SearchResults<T>, ApiError>,
{
    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    /// Every entity across all pages, or the first error.
    pub fn items(self) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        for page in self {
            items.extend(page?.results);
        }
        Ok(items)
    }
}

impl<T, F> Iterator for Pages<T, F>
where
    F: FnMut(&SearchQuery) -> Result<SearchResults<T>, ApiError>,
{
    type Item = Result<SearchResults<T>, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let query = self.paginator.next_query()?.clone();
        match (self.fetch)(&query) {
            Ok(page) => {
                self.paginator.record(&page);
                Some(Ok(page))
            }
            Err(err) => {
                debug!(offset = query.current_offset(), error = %err, "search page failed");
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

impl<T, F> std::iter::FusedIterator for Pages<T, F> where
    F: FnMut(&SearchQuery) -> Result<SearchResults<T>, ApiError>
{
}
