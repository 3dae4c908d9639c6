//! Read-only client for the remote product API.
//!
//! Request construction lives in [`Endpoint`] so the exact path and query
//! of every call can be checked without a network. [`CatalogClient`] sends
//! them with a blocking `reqwest` client and decodes the JSON bodies.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config;
use crate::error::{Result, StoreError};
use crate::feed::PageSource;
use crate::models::{Category, Product, ProductPage};

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortField {
    Title,
    Price,
    Rating,
    /// Any other product field the API accepts in `sortBy`.
    Other(String),
}

impl SortField {
    pub fn as_str(&self) -> &str {
        match self {
            SortField::Title => "title",
            SortField::Price => "price",
            SortField::Rating => "rating",
            SortField::Other(name) => name,
        }
    }
}

impl From<&str> for SortField {
    fn from(name: &str) -> Self {
        match name {
            "title" => SortField::Title,
            "price" => SortField::Price,
            "rating" => SortField::Rating,
            other => SortField::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(StoreError::InvalidArgument(format!(
                "Unknown sort order: {}",
                other
            ))),
        }
    }
}

/// A server-side ordering. Field and order always travel together; pass
/// `None` where a sort is optional to get the server default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Sort {
    pub fn new(field: impl Into<SortField>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    pub fn asc(field: impl Into<SortField>) -> Self {
        Self::new(field, SortOrder::Ascending)
    }

    pub fn desc(field: impl Into<SortField>) -> Self {
        Self::new(field, SortOrder::Descending)
    }
}

impl From<SortField> for Sort {
    fn from(field: SortField) -> Self {
        Self::asc(field)
    }
}

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// One request against the product API.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    List { limit: usize, skip: usize },
    Search { query: String, sort: Option<Sort> },
    Category { slug: String, sort: Option<Sort> },
    Product { id: i64 },
    Categories,
}

impl Endpoint {
    /// Path segments below the API base.
    pub fn segments(&self) -> Vec<String> {
        match self {
            Endpoint::List { .. } => vec!["products".into()],
            Endpoint::Search { .. } => vec!["products".into(), "search".into()],
            Endpoint::Category { slug, .. } => {
                vec!["products".into(), "category".into(), slug.clone()]
            }
            Endpoint::Product { id } => vec!["products".into(), id.to_string()],
            Endpoint::Categories => vec!["products".into(), "categories".into()],
        }
    }

    /// Query pairs in the order they are sent.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        match self {
            Endpoint::List { limit, skip } => {
                pairs.push(("limit", limit.to_string()));
                pairs.push(("skip", skip.to_string()));
            }
            Endpoint::Search { query, sort } => {
                pairs.push(("q", query.clone()));
                push_sort(&mut pairs, sort.as_ref());
            }
            Endpoint::Category { sort, .. } => push_sort(&mut pairs, sort.as_ref()),
            Endpoint::Product { .. } | Endpoint::Categories => {}
        }
        pairs
    }

    /// Full request URL under `base`. Path segments are percent-encoded.
    pub fn url(&self, base: &str) -> Result<Url> {
        let mut url = Url::parse(base)
            .map_err(|e| StoreError::InvalidArgument(format!("Invalid base URL {}: {}", base, e)))?;
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                StoreError::InvalidArgument(format!("Base URL cannot have a path: {}", base))
            })?;
            path.pop_if_empty();
            for segment in self.segments() {
                path.push(&segment);
            }
        }
        let query = self.query();
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }
}

fn push_sort(pairs: &mut Vec<(&'static str, String)>, sort: Option<&Sort>) {
    if let Some(sort) = sort {
        pairs.push(("sortBy", sort.field.as_str().to_string()));
        pairs.push(("order", sort.order.as_str().to_string()));
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments().join("/"))
    }
}

// ---------------------------------------------------------------------------
// CatalogClient
// ---------------------------------------------------------------------------

/// Stateless request/response client for the product API.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    base_url: String,
    client: Client,
}

impl CatalogClient {
    /// Create a client for the API at `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Client for the public API with default settings.
    pub fn public() -> Result<Self> {
        Self::new(config::API_BASE, config::DEFAULT_TIMEOUT)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// One page of the full catalog.
    pub fn list_products(&self, limit: usize, offset: usize) -> Result<ProductPage> {
        self.fetch(&Endpoint::List {
            limit,
            skip: offset,
        })
    }

    /// Full-text search. The query must contain a non-blank character.
    pub fn search_products(&self, query: &str, sort: Option<Sort>) -> Result<ProductPage> {
        let query = query.trim();
        if query.is_empty() {
            return Err(StoreError::InvalidArgument(
                "Search query must not be empty".into(),
            ));
        }
        self.fetch(&Endpoint::Search {
            query: query.to_string(),
            sort,
        })
    }

    /// All products in one category.
    pub fn list_by_category(&self, slug: &str, sort: Option<Sort>) -> Result<ProductPage> {
        self.fetch(&Endpoint::Category {
            slug: slug.to_string(),
            sort,
        })
    }

    /// A single product. Unknown ids fail with [`StoreError::NotFound`].
    pub fn get_product(&self, id: i64) -> Result<Product> {
        self.fetch(&Endpoint::Product { id })
    }

    pub fn categories(&self) -> Result<Vec<Category>> {
        self.fetch(&Endpoint::Categories)
    }

    /// Send `endpoint` and decode its JSON body.
    ///
    /// A 404 maps to `NotFound`, any other non-success status to `Network`,
    /// and a body that does not decode to `Parse`.
    pub fn fetch<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T> {
        let url = endpoint.url(&self.base_url)?;
        debug!(%url, "Fetching");
        let resp = self.client.get(url).send()?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(format!("{} returned 404", endpoint)));
        }
        let body = resp.error_for_status()?.text()?;
        decode(&body)
    }
}

/// Decode a response body.
pub fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(StoreError::from)
}

impl PageSource for CatalogClient {
    fn fetch_page(&self, limit: usize, offset: usize) -> Result<ProductPage> {
        self.list_products(limit, offset)
    }
}
