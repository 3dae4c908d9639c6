//! KWEBstore SDK for Rust.
//!
//! Client-side core of the KWEBstore storefront: a read-only client for the
//! public product API, a cart store persisted to durable key-value storage,
//! and a paginated listing feed that accumulates catalog pages on demand.
//!
//! # Quick start
//!
//! ```no_run
//! use kwebstore_sdk::StorefrontSdk;
//!
//! let sdk = StorefrontSdk::builder().build().unwrap();
//!
//! // Browse the catalog
//! let mut feed = sdk.feed();
//! feed.load_more(sdk.catalog()).unwrap();
//!
//! // Put the first product in the cart
//! let cart = sdk.cart();
//! if let Some(product) = feed.items().first() {
//!     cart.borrow_mut().add(product.clone(), 1).unwrap();
//! }
//! let cart = cart.borrow();
//! println!("{} items, {} selected", cart.item_count(), cart.selected_subtotal());
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod storage;
pub mod theme;

#[cfg(feature = "async")]
pub use async_client::AsyncCatalog;
pub use cart::CartStore;
pub use catalog::{CatalogClient, Endpoint, Sort, SortField, SortOrder};
pub use error::{Result, StoreError};
pub use feed::{LoadOutcome, PageSource, PageTicket, PaginatedFeed};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use theme::{Theme, ThemeStore};

use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

/// Storage handle shared by the stores an SDK hands out.
pub type SharedStorage = Rc<dyn Storage>;

/// The SDK's single cart store, shared with every consumer.
pub type SharedCart = Rc<RefCell<CartStore<SharedStorage>>>;

/// The SDK's single theme store.
pub type SharedTheme = Rc<RefCell<ThemeStore<SharedStorage>>>;

// ---------------------------------------------------------------------------
// StorefrontSdkBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`StorefrontSdk`] instance.
///
/// Use [`StorefrontSdk::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](StorefrontSdkBuilder::build) to create the SDK.
pub struct StorefrontSdkBuilder {
    base_url: String,
    storage_dir: Option<PathBuf>,
    storage: Option<SharedStorage>,
    timeout: Duration,
    page_size: usize,
}

impl Default for StorefrontSdkBuilder {
    fn default() -> Self {
        Self {
            base_url: config::API_BASE.to_string(),
            storage_dir: None,
            storage: None,
            timeout: config::DEFAULT_TIMEOUT,
            page_size: config::DEFAULT_PAGE_SIZE,
        }
    }
}

impl StorefrontSdkBuilder {
    /// Point the catalog client at a different API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the directory used by the default file-backed storage.
    ///
    /// If not set, the platform-appropriate local data directory is used
    /// (e.g. `~/.local/share/kwebstore` on Linux). Ignored when a storage
    /// backend is supplied with [`storage()`](Self::storage).
    pub fn storage_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.storage_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Use the given storage backend instead of files on disk.
    pub fn storage(mut self, storage: SharedStorage) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Set the HTTP request timeout for catalog calls.
    ///
    /// Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the number of products per feed page. Defaults to 8.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Build the SDK, opening storage and the HTTP client.
    ///
    /// No requests are made and nothing is read from storage until a store
    /// or feed is used.
    pub fn build(self) -> Result<StorefrontSdk> {
        let catalog = CatalogClient::new(self.base_url, self.timeout)?;
        let storage: SharedStorage = match self.storage {
            Some(storage) => storage,
            None => Rc::new(FileStorage::new(self.storage_dir)?),
        };
        Ok(StorefrontSdk {
            catalog,
            storage,
            page_size: self.page_size,
            cart: OnceCell::new(),
            theme: OnceCell::new(),
        })
    }
}

// ---------------------------------------------------------------------------
// StorefrontSdk
// ---------------------------------------------------------------------------

/// The main entry point for the KWEBstore SDK.
///
/// Holds the catalog client and the storage backend. It owns exactly one
/// cart store and one theme store, each the sole writer of its storage key;
/// every accessor call hands out the same instance. Feeds are independent
/// and a new one is created per call.
pub struct StorefrontSdk {
    catalog: CatalogClient,
    storage: SharedStorage,
    page_size: usize,
    cart: OnceCell<SharedCart>,
    theme: OnceCell<SharedTheme>,
}

impl StorefrontSdk {
    /// Create a new builder for configuring the SDK.
    pub fn builder() -> StorefrontSdkBuilder {
        StorefrontSdkBuilder::default()
    }

    /// Access the product API client.
    pub fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }

    /// The cart store, hydrated from storage on first access.
    ///
    /// Later calls return a handle to the same store, so two consumers
    /// never hold diverging copies of the cart.
    pub fn cart(&self) -> SharedCart {
        let cart = self
            .cart
            .get_or_init(|| Rc::new(RefCell::new(CartStore::open(Rc::clone(&self.storage)))));
        Rc::clone(cart)
    }

    /// Create an empty listing feed with the configured page size.
    pub fn feed(&self) -> PaginatedFeed {
        PaginatedFeed::new(self.page_size)
    }

    /// The theme store, loaded on first access. `prefers_dark` is the host's
    /// system preference, used when no theme has been saved; it only has an
    /// effect on the first call.
    pub fn theme(&self, prefers_dark: bool) -> SharedTheme {
        let theme = self.theme.get_or_init(|| {
            Rc::new(RefCell::new(ThemeStore::open(
                Rc::clone(&self.storage),
                prefers_dark,
            )))
        });
        Rc::clone(theme)
    }

    /// Return the storage backend.
    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for StorefrontSdk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "StorefrontSdk(base_url={}, page_size={})",
            self.catalog.base_url(),
            self.page_size
        )
    }
}
