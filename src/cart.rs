//! Cart store backed by durable storage.
//!
//! The cart is an insertion-ordered list of [`CartLine`]s with at most one
//! line per product id. It is hydrated once from the storage backend when
//! the store is opened; after that every mutation re-serializes the whole
//! cart and writes it back before returning.

use tracing::{debug, warn};

use crate::config;
use crate::error::{Result, StoreError};
use crate::models::{CartLine, OrderReceipt, Product};
use crate::storage::Storage;

// ---------------------------------------------------------------------------
// CartStore
// ---------------------------------------------------------------------------

/// Owns the cart lines and keeps them in sync with the `kwebstore-cart` key.
pub struct CartStore<S: Storage> {
    storage: S,
    lines: Vec<CartLine>,
}

impl<S: Storage> CartStore<S> {
    /// Open the store, hydrating from storage.
    ///
    /// Never fails: a missing value starts an empty cart, and an unreadable
    /// or malformed value is logged and discarded. Hydration itself does not
    /// write back to storage.
    pub fn open(storage: S) -> Self {
        let lines = match storage.get(config::CART_STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLine>>(&raw) {
                Ok(lines) => normalize(lines),
                Err(e) => {
                    warn!(error = %e, "Failed to parse persisted cart, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted cart, starting empty");
                Vec::new()
            }
        };
        debug!(lines = lines.len(), "Cart hydrated");
        Self { storage, lines }
    }

    // -- Mutations ---------------------------------------------------------

    /// Add `quantity` units of `product`.
    ///
    /// Increments the existing line for `product.id`, or appends a new
    /// selected line. Stock is not checked.
    pub fn add(&mut self, product: Product, quantity: i64) -> Result<()> {
        if quantity <= 0 {
            return Err(StoreError::InvalidArgument(format!(
                "Quantity must be positive, got {}",
                quantity
            )));
        }
        debug!(product_id = product.id, quantity, "Adding to cart");
        if let Some(line) = self.line_mut(product.id) {
            line.quantity = line.quantity.checked_add(quantity).ok_or_else(|| {
                StoreError::InvalidArgument(format!(
                    "Quantity overflow for product {}",
                    product.id
                ))
            })?;
        } else {
            self.lines.push(CartLine::new(product, quantity));
        }
        self.persist()
    }

    /// Remove the line for `product_id`. Absent ids are a no-op.
    pub fn remove(&mut self, product_id: i64) -> Result<()> {
        debug!(product_id, "Removing from cart");
        self.lines.retain(|line| line.product.id != product_id);
        self.persist()
    }

    /// Set the quantity of a line to exactly `quantity`.
    ///
    /// A quantity of zero or less removes the line. Absent ids are a no-op.
    pub fn set_quantity(&mut self, product_id: i64, quantity: i64) -> Result<()> {
        if quantity <= 0 {
            return self.remove(product_id);
        }
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
        }
        self.persist()
    }

    /// Flip the selected flag of one line. Absent ids are a no-op.
    pub fn toggle_selected(&mut self, product_id: i64) -> Result<()> {
        if let Some(line) = self.line_mut(product_id) {
            line.selected = !line.selected;
        }
        self.persist()
    }

    /// Invert the selected flag of every line.
    ///
    /// This is a toggle, not a set-all: with mixed selection, selected lines
    /// become unselected and vice versa.
    pub fn select_all(&mut self) -> Result<()> {
        for line in &mut self.lines {
            line.selected = !line.selected;
        }
        self.persist()
    }

    /// Delete every selected line.
    pub fn remove_selected(&mut self) -> Result<()> {
        self.lines.retain(|line| !line.selected);
        self.persist()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.lines.clear();
        self.persist()
    }

    /// Complete a simulated checkout of the selected lines.
    ///
    /// Returns a receipt for the selected lines, then empties the whole
    /// cart. Fails with [`StoreError::InvalidArgument`] when nothing is
    /// selected. If the emptied cart cannot be persisted the lines are
    /// restored and the storage error returned, so memory and storage agree
    /// that no order was placed.
    pub fn place_order(&mut self) -> Result<OrderReceipt> {
        let lines: Vec<CartLine> = self.selected_lines().into_iter().cloned().collect();
        if lines.is_empty() {
            return Err(StoreError::InvalidArgument(
                "No selected items to order".into(),
            ));
        }
        let receipt = OrderReceipt {
            item_count: total_quantity(&lines),
            subtotal: self.selected_subtotal(),
            lines,
        };
        let previous = std::mem::take(&mut self.lines);
        if let Err(e) = self.persist() {
            warn!(error = %e, "Failed to persist emptied cart, order not placed");
            self.lines = previous;
            return Err(e);
        }
        debug!(
            items = receipt.item_count,
            subtotal = receipt.subtotal,
            "Order placed"
        );
        Ok(receipt)
    }

    // -- Derived values ----------------------------------------------------

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn get(&self, product_id: i64) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == product_id)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines (not the number of lines).
    ///
    /// Saturates at `i64::MAX`.
    pub fn item_count(&self) -> i64 {
        total_quantity(&self.lines)
    }

    /// Sum of `price * quantity` over selected lines.
    pub fn selected_subtotal(&self) -> f64 {
        self.lines
            .iter()
            .filter(|line| line.selected)
            .map(CartLine::line_total)
            .sum()
    }

    /// Selected lines in cart order.
    pub fn selected_lines(&self) -> Vec<&CartLine> {
        self.lines.iter().filter(|line| line.selected).collect()
    }

    /// True when the cart has lines and every one is selected.
    pub fn all_selected(&self) -> bool {
        !self.lines.is_empty() && self.lines.iter().all(|line| line.selected)
    }

    /// Return a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    // -- Internals ---------------------------------------------------------

    fn line_mut(&mut self, product_id: i64) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product.id == product_id)
    }

    fn persist(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.lines)?;
        self.storage.set(config::CART_STORAGE_KEY, &raw)
    }
}

fn total_quantity(lines: &[CartLine]) -> i64 {
    lines
        .iter()
        .fold(0i64, |total, line| total.saturating_add(line.quantity))
}

/// Drop hydrated lines that would break the cart invariants: non-positive
/// quantities and repeated product ids (the first occurrence wins).
fn normalize(lines: Vec<CartLine>) -> Vec<CartLine> {
    let mut kept: Vec<CartLine> = Vec::with_capacity(lines.len());
    for line in lines {
        if line.quantity <= 0 {
            warn!(
                product_id = line.product.id,
                quantity = line.quantity,
                "Dropping persisted cart line with non-positive quantity"
            );
            continue;
        }
        if kept.iter().any(|k| k.product.id == line.product.id) {
            warn!(
                product_id = line.product.id,
                "Dropping duplicate persisted cart line"
            );
            continue;
        }
        kept.push(line);
    }
    kept
}
