use serde::{Deserialize, Serialize};

use super::product::Product;

// ---------------------------------------------------------------------------
// CartLine — One product in the cart with its quantity and selection flag
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product: Product,
    pub quantity: i64,
    pub selected: bool,
}

impl CartLine {
    pub fn new(product: Product, quantity: i64) -> Self {
        Self {
            product,
            quantity,
            selected: true,
        }
    }

    pub fn product_id(&self) -> i64 {
        self.product.id
    }

    pub fn line_total(&self) -> f64 {
        self.product.price * self.quantity as f64
    }
}

// ---------------------------------------------------------------------------
// OrderReceipt — Summary of a simulated checkout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub lines: Vec<CartLine>,
    pub item_count: i64,
    pub subtotal: f64,
}
