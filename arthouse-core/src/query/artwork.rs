use super::{LimitPolicy, Page, QueryParams, QuerySpec, PARAM_SEARCH};
use crate::config::LimitConfig;
use crate::pipeline::{Filter, FindOptions, SortSpec, Stage};

/// Artwork list query: paging, sorting and full-text search.
///
/// Limits above the configured max clamp to the max; limits below the min
/// reset to the default.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtworkQuery {
    page: Page,
    search: Option<String>,
}

impl ArtworkQuery {
    pub fn new(limits: LimitConfig) -> Self {
        Self {
            page: Page::new(limits, LimitPolicy::ClampToMax),
            search: None,
        }
    }

    pub fn from_params(params: &QueryParams, limits: LimitConfig) -> Self {
        let mut query = Self {
            page: Page::from_params(params, limits, LimitPolicy::ClampToMax),
            search: None,
        };
        if let Some(search) = params.first(PARAM_SEARCH) {
            query.set_search(search);
        }
        query
    }

    /// Set the search text. An empty string leaves the query unchanged.
    pub fn set_search(&mut self, search: &str) {
        if !search.is_empty() {
            self.search = Some(search.to_string());
        }
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }
}

impl QuerySpec for ArtworkQuery {
    fn filter(&self) -> Filter {
        match &self.search {
            Some(search) => Filter::text(search.clone()),
            None => Filter::All,
        }
    }

    fn find_options(&self) -> FindOptions {
        self.page.find_options()
    }

    fn pipeline(&self) -> Vec<Stage> {
        self.page.pipeline(self.filter())
    }

    fn set_limit(&mut self, limit: i64) {
        self.page.set_limit(limit);
    }

    fn set_skip(&mut self, skip: i64) {
        self.page.set_skip(skip);
    }

    fn set_sort(&mut self, pairs: &[String]) {
        self.page.set_sort(pairs);
    }

    fn limit(&self) -> i64 {
        self.page.limit()
    }

    fn skip(&self) -> i64 {
        self.page.skip()
    }

    fn sort(&self) -> &SortSpec {
        self.page.sort()
    }
}
