use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Product — A catalog entry as served by the remote API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: i64,
    pub brand: Option<String>,
    #[serde(default)]
    pub category: String,
    pub weight: Option<f64>,
    pub warranty_information: Option<String>,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// One of the five glyphs in a rating display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Star {
    Full,
    Half,
    Empty,
}

impl Product {
    pub fn has_discount(&self) -> bool {
        self.discount_percentage > 0.0
    }

    /// Price before the discount was applied.
    ///
    /// Returns the current price when there is no discount or the
    /// percentage is out of range.
    pub fn original_price(&self) -> f64 {
        if !self.has_discount() || self.discount_percentage >= 100.0 {
            return self.price;
        }
        self.price / (1.0 - self.discount_percentage / 100.0)
    }

    /// Five-star breakdown of the rating: whole stars, then a half star if
    /// the fractional part is at least .5, then empties.
    pub fn star_ratings(&self) -> [Star; 5] {
        let rating = self.rating.clamp(0.0, 5.0);
        let full = rating.floor() as usize;
        let half = rating.fract() >= 0.5;
        let mut stars = [Star::Empty; 5];
        for (i, star) in stars.iter_mut().enumerate() {
            if i < full {
                *star = Star::Full;
            } else if i == full && half {
                *star = Star::Half;
            }
        }
        stars
    }

    /// Image to show first on the detail page.
    pub fn primary_image(&self) -> &str {
        self.images
            .first()
            .map(String::as_str)
            .unwrap_or(&self.thumbnail)
    }
}

// ---------------------------------------------------------------------------
// ProductPage — Envelope for every listing endpoint
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub skip: i64,
    #[serde(default)]
    pub limit: i64,
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
}
