//! Offset-paginated search contract shared by every searchable resource.
//!
//! # Design
//! `SearchQuery` is an immutable value: builder methods consume and return
//! it, and [`SearchQuery::advanced_by`] produces the query for the next page
//! without touching the current one. The wire shape produced by
//! [`SearchQuery::to_params`] is identical for diseases and glossary terms;
//! resource-specific filters simply add parameters.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::{DiseaseType, GlossaryCategory};

/// Page size the service applies when `count` is not sent.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// How multiple query terms combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    And,
    Or,
}

impl SearchMode {
    pub fn as_param(self) -> &'static str {
        match self {
            SearchMode::And => "AND",
            SearchMode::Or => "OR",
        }
    }
}

/// Level of detail for each returned entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    Min,
    Partial,
    Full,
}

impl OutputType {
    pub fn as_param(self) -> &'static str {
        match self {
            OutputType::Min => "MIN",
            OutputType::Partial => "PARTIAL",
            OutputType::Full => "FULL",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    query: Option<String>,
    disease_type: Option<DiseaseType>,
    site_category: Option<String>,
    categories: Vec<GlossaryCategory>,
    mode: Option<SearchMode>,
    status: Option<String>,
    assigned_to: Option<String>,
    modified_from: Option<NaiveDate>,
    modified_to: Option<NaiveDate>,
    published_from: Option<NaiveDate>,
    published_to: Option<NaiveDate>,
    been_published: Option<bool>,
    hidden: Option<bool>,
    count: Option<u32>,
    offset: u64,
    count_only: Option<bool>,
    include_glossary: Option<bool>,
    output_type: Option<OutputType>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Free-text query.
    pub fn text(q: impl Into<String>) -> Self {
        Self::new().query(q)
    }

    pub fn query(mut self, q: impl Into<String>) -> Self {
        self.query = Some(q.into());
        self
    }

    pub fn disease_type(mut self, disease_type: DiseaseType) -> Self {
        self.disease_type = Some(disease_type);
        self
    }

    pub fn site_category(mut self, category: impl Into<String>) -> Self {
        self.site_category = Some(category.into());
        self
    }

    /// Glossary category filter; may be given more than once.
    pub fn category(mut self, category: GlossaryCategory) -> Self {
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
        self
    }

    pub fn mode(mut self, mode: SearchMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn assigned_to(mut self, user: impl Into<String>) -> Self {
        self.assigned_to = Some(user.into());
        self
    }

    pub fn modified_between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.modified_from = from;
        self.modified_to = to;
        self
    }

    pub fn published_between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.published_from = from;
        self.published_to = to;
        self
    }

    pub fn been_published(mut self, flag: bool) -> Self {
        self.been_published = Some(flag);
        self
    }

    pub fn hidden(mut self, flag: bool) -> Self {
        self.hidden = Some(flag);
        self
    }

    pub fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn count_only(mut self, flag: bool) -> Self {
        self.count_only = Some(flag);
        self
    }

    pub fn include_glossary(mut self, flag: bool) -> Self {
        self.include_glossary = Some(flag);
        self
    }

    pub fn output_type(mut self, output_type: OutputType) -> Self {
        self.output_type = Some(output_type);
        self
    }

    pub fn requested_count(&self) -> Option<u32> {
        self.count
    }

    pub fn current_offset(&self) -> u64 {
        self.offset
    }

    /// The same query positioned `n` items further.
    pub fn advanced_by(&self, n: u64) -> Self {
        let mut next = self.clone();
        next.offset = self.offset.saturating_add(n);
        next
    }

    /// Wire parameters in their fixed order. `offset` is always present.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = Vec::new();
        let mut push = |key: &str, value: String| params.push((key.to_string(), value));

        if let Some(q) = &self.query {
            push("q", q.clone());
        }
        if let Some(t) = self.disease_type {
            push("type", t.as_param().to_string());
        }
        if let Some(c) = &self.site_category {
            push("site_category", c.clone());
        }
        for c in &self.categories {
            push("category", c.as_param().to_string());
        }
        if let Some(m) = self.mode {
            push("mode", m.as_param().to_string());
        }
        if let Some(s) = &self.status {
            push("status", s.clone());
        }
        if let Some(a) = &self.assigned_to {
            push("assigned_to", a.clone());
        }
        for (key, date) in [
            ("modified_from", self.modified_from),
            ("modified_to", self.modified_to),
            ("published_from", self.published_from),
            ("published_to", self.published_to),
        ] {
            if let Some(d) = date {
                push(key, d.format(DATE_FORMAT).to_string());
            }
        }
        if let Some(b) = self.been_published {
            push("been_published", b.to_string());
        }
        if let Some(h) = self.hidden {
            push("hidden", h.to_string());
        }
        if let Some(c) = self.count {
            push("count", c.to_string());
        }
        push("offset", self.offset.to_string());
        if let Some(c) = self.count_only {
            push("count_only", c.to_string());
        }
        if let Some(g) = self.include_glossary {
            push("glossary", g.to_string());
        }
        if let Some(o) = self.output_type {
            push("output_type", o.as_param().to_string());
        }
        params
    }
}

/// One page of search results.
///
/// `count` is the page size the server used, which may be its default
/// rather than the requested one. `total` counts every match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResults<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default)]
    pub total: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(default)]
    pub terms: Vec<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T> SearchResults<T> {
    /// Effective page size, falling back to [`DEFAULT_PAGE_SIZE`].
    pub fn page_size(&self) -> u32 {
        self.count.unwrap_or(DEFAULT_PAGE_SIZE)
    }
}
