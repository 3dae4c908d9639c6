//! Shared test fixtures for the KWEBstore SDK integration tests.
//!
//! Provides sample products in the shape the product API returns, and a
//! scripted [`PageSource`] that replays queued pages and counts fetches.

#![allow(dead_code)]

use kwebstore_sdk::models::{Product, ProductPage};
use kwebstore_sdk::{PageSource, Result, StoreError};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// A product with the given id and price and plausible other fields.
pub fn product(id: i64, price: f64) -> Product {
    Product {
        id,
        title: format!("Product {}", id),
        description: format!("Description of product {}", id),
        price,
        discount_percentage: 0.0,
        rating: 4.5,
        stock: 10,
        brand: Some("Essence".to_string()),
        category: "beauty".to_string(),
        weight: Some(2.0),
        warranty_information: Some("1 month warranty".to_string()),
        thumbnail: format!("https://cdn.example.com/{}/thumbnail.png", id),
        images: vec![format!("https://cdn.example.com/{}/1.png", id)],
    }
}

/// A page of products with consecutive ids starting at `first_id`.
pub fn page(first_id: i64, count: usize) -> ProductPage {
    let products: Vec<Product> = (0..count as i64)
        .map(|i| product(first_id + i, 10.0 * (first_id + i) as f64))
        .collect();
    ProductPage {
        total: 100,
        skip: first_id - 1,
        limit: count as i64,
        products,
    }
}

pub fn empty_page() -> ProductPage {
    ProductPage {
        products: Vec::new(),
        total: 100,
        skip: 100,
        limit: 0,
    }
}

/// Raw JSON for a single product as the remote API serves it.
pub fn product_json(id: i64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": "Essence Mascara Lash Princess",
        "description": "The Essence Mascara Lash Princess is a popular mascara.",
        "category": "beauty",
        "price": 9.99,
        "discountPercentage": 7.17,
        "rating": 4.94,
        "stock": 5,
        "tags": ["beauty", "mascara"],
        "brand": "Essence",
        "sku": "RCH45Q1A",
        "weight": 2,
        "warrantyInformation": "1 month warranty",
        "availabilityStatus": "Low Stock",
        "images": ["https://cdn.dummyjson.com/products/images/beauty/1.png"],
        "thumbnail": "https://cdn.dummyjson.com/products/images/beauty/thumbnail.png"
    })
}

/// Replays a queue of fetch results and records every request.
pub struct ScriptedSource {
    script: RefCell<VecDeque<Result<ProductPage>>>,
    calls: Cell<usize>,
    requests: RefCell<Vec<(usize, usize)>>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<ProductPage>>) -> Self {
        Self {
            script: RefCell::new(script.into()),
            calls: Cell::new(0),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// `(limit, offset)` of every request made, in order.
    pub fn requests(&self) -> Vec<(usize, usize)> {
        self.requests.borrow().clone()
    }
}

impl PageSource for ScriptedSource {
    fn fetch_page(&self, limit: usize, offset: usize) -> Result<ProductPage> {
        self.calls.set(self.calls.get() + 1);
        self.requests.borrow_mut().push((limit, offset));
        self.script
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(StoreError::NotFound("script exhausted".into())))
    }
}

/// Log sink shared between a test and its subscriber.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber installed and return its result together
/// with everything that was logged.
pub fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap()).into_owned();
    (result, logs)
}
