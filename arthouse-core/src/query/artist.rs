use super::{LimitPolicy, Page, QueryParams, QuerySpec};
use crate::config::LimitConfig;
use crate::pipeline::{Filter, FindOptions, SortSpec, Stage};

/// Artist list query. Out-of-range limits reset to the default.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistQuery {
    page: Page,
}

impl ArtistQuery {
    pub fn new(limits: LimitConfig) -> Self {
        Self {
            page: Page::new(limits, LimitPolicy::ResetToDefault),
        }
    }

    pub fn from_params(params: &QueryParams, limits: LimitConfig) -> Self {
        Self {
            page: Page::from_params(params, limits, LimitPolicy::ResetToDefault),
        }
    }
}

impl QuerySpec for ArtistQuery {
    fn filter(&self) -> Filter {
        Filter::All
    }

    fn find_options(&self) -> FindOptions {
        self.page.find_options()
    }

    fn pipeline(&self) -> Vec<Stage> {
        self.page.pipeline(Filter::All)
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
