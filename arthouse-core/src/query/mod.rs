//! Query specifications built from untrusted request parameters.
//!
//! Each entity kind has its own builder ([`ArtistQuery`], [`ArtworkQuery`],
//! [`ExhibitionQuery`]). All of them implement [`QuerySpec`], which is what the
//! entity stores consume. Builders never fail: malformed input falls back to
//! defaults so the read path stays total.

mod artist;
mod artwork;
mod exhibition;
mod params;

pub use artist::ArtistQuery;
pub use artwork::ArtworkQuery;
pub use exhibition::ExhibitionQuery;
pub use params::QueryParams;

use std::fmt;

use crate::config::LimitConfig;
use crate::pipeline::{Filter, FindOptions, SortDirection, SortSpec, Stage};

pub const PARAM_LIMIT: &str = "limit";
pub const PARAM_SKIP: &str = "skip";
pub const PARAM_SORT: &str = "sort";
pub const PARAM_SEARCH: &str = "search";

/// Validated, bounded query over one collection.
pub trait QuerySpec: fmt::Debug + Send + Sync {
    /// Simple filter form.
    fn filter(&self) -> Filter;

    /// `{sort?, skip?, limit}` for a plain find.
    fn find_options(&self) -> FindOptions;

    /// `[match?, sort?, skip?, limit]`. Limit is always present and last.
    fn pipeline(&self) -> Vec<Stage>;

    fn set_limit(&mut self, limit: i64);

    fn set_skip(&mut self, skip: i64);

    /// Replace the sort keys with the valid `field:direction` pairs in `pairs`.
    fn set_sort(&mut self, pairs: &[String]);

    fn limit(&self) -> i64;

    fn skip(&self) -> i64;

    fn sort(&self) -> &SortSpec;
}

/// What `set_limit` does with a value outside `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitPolicy {
    /// Out of range in either direction resets to the default.
    ResetToDefault,
    /// Below `min` resets to the default, above `max` clamps to `max`.
    ClampToMax,
}

impl LimitPolicy {
    pub fn resolve(self, value: i64, limits: &LimitConfig) -> i64 {
        if value < limits.min {
            return limits.default;
        }
        if value > limits.max {
            return match self {
                LimitPolicy::ResetToDefault => limits.default,
                LimitPolicy::ClampToMax => limits.max,
            };
        }
        value
    }
}

/// Sort/skip/limit state shared by every builder.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Page {
    limits: LimitConfig,
    policy: LimitPolicy,
    limit: i64,
    skip: i64,
    sort: SortSpec,
}

impl Page {
    pub(crate) fn new(limits: LimitConfig, policy: LimitPolicy) -> Self {
        Self {
            limits,
            policy,
            limit: limits.default,
            skip: 0,
            sort: SortSpec::new(),
        }
    }

    pub(crate) fn from_params(params: &QueryParams, limits: LimitConfig, policy: LimitPolicy) -> Self {
        let mut page = Self::new(limits, policy);
        if let Some(raw) = params.first(PARAM_LIMIT) {
            page.set_limit_from_str(raw);
        }
        if let Some(raw) = params.first(PARAM_SKIP) {
            if let Some(skip) = parse_int(raw) {
                page.set_skip(skip);
            }
        }
        if let Some(pairs) = params.all(PARAM_SORT) {
            page.set_sort(pairs);
        }
        page
    }

    fn set_limit_from_str(&mut self, raw: &str) {
        match parse_int(raw) {
            Some(limit) => self.set_limit(limit),
            None => self.limit = self.limits.default,
        }
    }

    pub(crate) fn set_limit(&mut self, limit: i64) {
        self.limit = self.policy.resolve(limit, &self.limits);
    }

    pub(crate) fn set_skip(&mut self, skip: i64) {
        if skip > 0 {
            self.skip = skip;
        }
    }

    pub(crate) fn set_sort(&mut self, pairs: &[String]) {
        let mut sort = SortSpec::new();
        for (field, direction) in pairs.iter().filter_map(|pair| parse_sort(pair)) {
            sort.push(field, direction);
        }
        self.sort = sort;
    }

    pub(crate) fn limit(&self) -> i64 {
        self.limit
    }

    pub(crate) fn skip(&self) -> i64 {
        self.skip
    }

    pub(crate) fn sort(&self) -> &SortSpec {
        &self.sort
    }

    pub(crate) fn find_options(&self) -> FindOptions {
        FindOptions {
            sort: (!self.sort.is_empty()).then(|| self.sort.clone()),
            skip: (self.skip > 0).then_some(self.skip as u64),
            limit: Some(self.limit.max(0) as u64),
        }
    }

    /// `[match?] + [sort?, skip?, limit]`.
    pub(crate) fn pipeline(&self, filter: Filter) -> Vec<Stage> {
        let mut stages = Vec::with_capacity(4);
        if !filter.is_all() {
            stages.push(Stage::Match(filter));
        }
        stages.extend(self.find_options().into_stages());
        stages
    }
}

/// Parse a `field:direction` sort pair. Anything other than exactly one `:`
/// separating a non-empty field from `asc` or `desc` yields `None`.
pub fn parse_sort(pair: &str) -> Option<(String, SortDirection)> {
    let mut tokens = pair.split(':');
    let field = tokens.next()?;
    let direction = tokens.next()?;
    if tokens.next().is_some() || field.is_empty() {
        return None;
    }
    Some((field.to_string(), SortDirection::from_token(direction)?))
}

/// Parse a signed 64-bit integer, inferring the base from its prefix.
///
/// Accepts an optional sign, then `0x`/`0X` (hex), `0o`/`0O` or a bare leading
/// `0` (octal), `0b`/`0B` (binary), or plain decimal. A single `_` may sit
/// between digits, or between a base prefix and the first digit. Out-of-range
/// values are `None`.
pub fn parse_int(input: &str) -> Option<i64> {
    let (negative, body) = match input.as_bytes().first()? {
        b'+' => (false, &input[1..]),
        b'-' => (true, &input[1..]),
        _ => (false, input),
    };
    if body.is_empty() {
        return None;
    }

    let (radix, digits, prefixed) = match body.get(..2) {
        Some("0x") | Some("0X") => (16, &body[2..], true),
        Some("0o") | Some("0O") => (8, &body[2..], true),
        Some("0b") | Some("0B") => (2, &body[2..], true),
        _ if body.len() > 1 && body.starts_with('0') => (8, &body[1..], true),
        _ => (10, body, false),
    };

    if digits.contains('_')
        && ((!prefixed && digits.starts_with('_'))
            || digits.ends_with('_')
            || digits.contains("__"))
    {
        return None;
    }
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }

    let magnitude = u64::from_str_radix(&cleaned, radix).ok()?;
    if negative {
        if magnitude > i64::MAX as u64 + 1 {
            return None;
        }
        Some((magnitude as i64).wrapping_neg())
    } else {
        i64::try_from(magnitude).ok()
    }
}
