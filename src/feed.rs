//! Incrementally loaded product listing.
//!
//! A [`PaginatedFeed`] accumulates pages from a [`PageSource`] as the
//! consumer asks for more. Loading is split in two phases so it works the
//! same whether the fetch is blocking or awaited:
//!
//! 1. [`PaginatedFeed::begin`] claims the fetch guard and hands out a
//!    [`PageTicket`] naming the page to request, or `None` when a fetch is
//!    already in flight or the feed is exhausted.
//! 2. [`PaginatedFeed::complete`] applies the fetch result for that ticket.
//!
//! Tickets issued before a [`reset`](PaginatedFeed::reset), or abandoned
//! because they outlived the stall timeout, are discarded on completion.
//!
//! ```no_run
//! use kwebstore_sdk::{CatalogClient, PaginatedFeed};
//!
//! let client = CatalogClient::public().unwrap();
//! let mut feed = PaginatedFeed::new(8);
//! feed.load_more(&client).unwrap();
//! println!("{} products", feed.items().len());
//! ```

use std::time::{Duration, Instant};

use tracing::{debug, error, warn};

use crate::config;
use crate::error::Result;
use crate::models::{Product, ProductPage};

/// Anything that can serve a page of the catalog by limit and offset.
pub trait PageSource {
    fn fetch_page(&self, limit: usize, offset: usize) -> Result<ProductPage>;
}

impl<S: PageSource + ?Sized> PageSource for &S {
    fn fetch_page(&self, limit: usize, offset: usize) -> Result<ProductPage> {
        (**self).fetch_page(limit, offset)
    }
}

/// Claim on the feed's single in-flight fetch.
#[derive(Debug)]
pub struct PageTicket {
    id: u64,
    limit: usize,
    offset: usize,
}

impl PageTicket {
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// What a load attempt did to the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// No fetch was made: one is already in flight or the feed is exhausted.
    Skipped,
    /// A page with this many products was appended.
    Appended(usize),
    /// The source returned an empty page; the feed will not fetch again.
    Exhausted,
    /// The result belonged to a reset or abandoned request and was dropped.
    Discarded,
}

struct InFlight {
    id: u64,
    issued_at: Instant,
}

// ---------------------------------------------------------------------------
// PaginatedFeed
// ---------------------------------------------------------------------------

pub struct PaginatedFeed {
    items: Vec<Product>,
    cursor: usize,
    exhausted: bool,
    in_flight: Option<InFlight>,
    next_id: u64,
    page_size: usize,
    stall_timeout: Duration,
}

impl PaginatedFeed {
    /// Create an empty feed requesting `page_size` products per page.
    ///
    /// A page size of zero is bumped to one.
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            cursor: 0,
            exhausted: false,
            in_flight: None,
            next_id: 0,
            page_size: page_size.max(1),
            stall_timeout: config::DEFAULT_STALL_TIMEOUT,
        }
    }

    /// Set how long an unanswered request may hold the fetch guard.
    pub fn with_stall_timeout(mut self, timeout: Duration) -> Self {
        self.stall_timeout = timeout;
        self
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn stall_timeout(&self) -> Duration {
        self.stall_timeout
    }

    /// Claim the fetch guard for the page at the current cursor.
    ///
    /// Returns `None` if the feed is exhausted or a request younger than the
    /// stall timeout is still in flight. An older request is abandoned and
    /// its eventual result discarded.
    pub fn begin(&mut self) -> Option<PageTicket> {
        if self.exhausted {
            return None;
        }
        if let Some(current) = &self.in_flight {
            let age = current.issued_at.elapsed();
            if age < self.stall_timeout {
                return None;
            }
            warn!(
                request = current.id,
                age_ms = age.as_millis() as u64,
                "Abandoning stalled page request"
            );
        }
        let id = self.next_id;
        self.next_id += 1;
        self.in_flight = Some(InFlight {
            id,
            issued_at: Instant::now(),
        });
        Some(PageTicket {
            id,
            limit: self.page_size,
            offset: self.cursor,
        })
    }

    /// Apply the result of the fetch made for `ticket`.
    ///
    /// On success the page is appended and the cursor advances by the page
    /// size that was requested; an empty page marks the feed exhausted. On
    /// failure the error is logged and returned, the guard is released, and
    /// cursor and exhaustion are left as they were so the next load retries
    /// the same page.
    pub fn complete(
        &mut self,
        ticket: PageTicket,
        result: Result<ProductPage>,
    ) -> Result<LoadOutcome> {
        let current = self.in_flight.as_ref().map(|f| f.id);
        if current != Some(ticket.id) {
            debug!(request = ticket.id, "Discarding stale page result");
            return Ok(LoadOutcome::Discarded);
        }
        self.in_flight = None;

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                error!(error = %e, offset = ticket.offset, "Failed to load products");
                return Err(e);
            }
        };

        if page.products.is_empty() {
            debug!(offset = ticket.offset, "Feed exhausted");
            self.exhausted = true;
            return Ok(LoadOutcome::Exhausted);
        }

        let received = page.products.len();
        if received < ticket.limit {
            warn!(
                offset = ticket.offset,
                requested = ticket.limit,
                received,
                "Partial page received"
            );
        }
        debug!(offset = ticket.offset, received, "Page appended");
        self.items.extend(page.products);
        self.cursor = ticket.offset + ticket.limit;
        Ok(LoadOutcome::Appended(received))
    }

    /// Fetch and apply the next page from `source` in one call.
    pub fn load_more<S: PageSource + ?Sized>(&mut self, source: &S) -> Result<LoadOutcome> {
        let Some(ticket) = self.begin() else {
            return Ok(LoadOutcome::Skipped);
        };
        let result = source.fetch_page(ticket.limit, ticket.offset);
        self.complete(ticket, result)
    }

    /// Drop all items and restart from offset zero.
    ///
    /// Any request in flight is released; its result will be discarded.
    pub fn reset(&mut self) {
        self.items.clear();
        self.cursor = 0;
        self.exhausted = false;
        self.in_flight = None;
    }
}

impl Default for PaginatedFeed {
    fn default() -> Self {
        Self::new(config::DEFAULT_PAGE_SIZE)
    }
}

/// Scroll trigger for the listing view: true once the bottom of the
/// viewport is within [`config::SCROLL_THRESHOLD_PX`] of the content end.
pub fn near_bottom(viewport_height: f64, scroll_top: f64, content_height: f64) -> bool {
    viewport_height + scroll_top >= content_height - config::SCROLL_THRESHOLD_PX
}
