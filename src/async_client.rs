//! Async wrapper around [`CatalogClient`] for use in async runtimes (Tokio, etc.).
//!
//! Runs catalog requests on the blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free, and
//! drives [`PaginatedFeed`] loads under a deadline so a hung request cannot
//! hold the feed's fetch guard forever.
//!
//! # Example
//!
//! ```no_run
//! use kwebstore_sdk::{AsyncCatalog, PaginatedFeed};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let catalog = AsyncCatalog::public().await.unwrap();
//!     let mut feed = PaginatedFeed::default();
//!     catalog.load_more(&mut feed).await.unwrap();
//!
//!     let product = catalog.get_product(1).await.unwrap();
//!     println!("{}", product.title);
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::catalog::{CatalogClient, Sort};
use crate::config;
use crate::error::{Result, StoreError};
use crate::feed::{LoadOutcome, PageSource, PaginatedFeed};
use crate::models::{Category, Product, ProductPage};

// ---------------------------------------------------------------------------
// AsyncCatalog
// ---------------------------------------------------------------------------

/// Async wrapper around [`CatalogClient`].
pub struct AsyncCatalog {
    inner: Arc<CatalogClient>,
}

impl AsyncCatalog {
    /// Build a client for `base_url`.
    ///
    /// Construction runs on the blocking thread pool since the blocking
    /// HTTP client cannot be created on an async worker.
    pub async fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        let client =
            tokio::task::spawn_blocking(move || CatalogClient::new(base_url, timeout))
                .await
                .map_err(join_error)??;
        Ok(Self {
            inner: Arc::new(client),
        })
    }

    /// Client for the public API with default settings.
    pub async fn public() -> Result<Self> {
        Self::new(config::API_BASE, config::DEFAULT_TIMEOUT).await
    }

    /// Run a sync catalog operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&CatalogClient) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let client = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(&client))
            .await
            .map_err(join_error)?
    }

    pub async fn list_products(&self, limit: usize, offset: usize) -> Result<ProductPage> {
        self.run(move |c| c.list_products(limit, offset)).await
    }

    pub async fn search_products(&self, query: &str, sort: Option<Sort>) -> Result<ProductPage> {
        let query = query.to_string();
        self.run(move |c| c.search_products(&query, sort)).await
    }

    pub async fn list_by_category(&self, slug: &str, sort: Option<Sort>) -> Result<ProductPage> {
        let slug = slug.to_string();
        self.run(move |c| c.list_by_category(&slug, sort)).await
    }

    pub async fn get_product(&self, id: i64) -> Result<Product> {
        self.run(move |c| c.get_product(id)).await
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.run(|c| c.categories()).await
    }

    /// Load the next page of `feed`, giving up after the feed's stall timeout.
    pub async fn load_more(&self, feed: &mut PaginatedFeed) -> Result<LoadOutcome> {
        load_more_with(Arc::clone(&self.inner), feed).await
    }
}

/// Load the next page of `feed` from any thread-safe source.
///
/// The fetch runs on the blocking pool. If it does not finish within the
/// feed's stall timeout the load fails with [`StoreError::Timeout`] and the
/// fetch guard is released, so the next call retries the same page.
pub async fn load_more_with<S>(source: Arc<S>, feed: &mut PaginatedFeed) -> Result<LoadOutcome>
where
    S: PageSource + Send + Sync + ?Sized + 'static,
{
    let Some(ticket) = feed.begin() else {
        return Ok(LoadOutcome::Skipped);
    };
    let (limit, offset) = (ticket.limit(), ticket.offset());
    let deadline = feed.stall_timeout();

    let fetch = tokio::task::spawn_blocking(move || source.fetch_page(limit, offset));
    let result = match tokio::time::timeout(deadline, fetch).await {
        Ok(joined) => joined.map_err(join_error).and_then(|r| r),
        Err(_) => {
            warn!(offset, ?deadline, "Page request timed out");
            Err(StoreError::Timeout(deadline))
        }
    };
    feed.complete(ticket, result)
}

fn join_error(e: tokio::task::JoinError) -> StoreError {
    StoreError::InvalidArgument(format!("Task join error: {e}"))
}
