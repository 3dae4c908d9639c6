use std::path::PathBuf;
use std::time::Duration;

pub const API_BASE: &str = "https://dummyjson.com";

pub const CART_STORAGE_KEY: &str = "kwebstore-cart";
pub const THEME_STORAGE_KEY: &str = "kwebstore-theme";

/// Products requested per feed page.
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Distance from the bottom of the content, in pixels, at which the
/// listing asks for another page.
pub const SCROLL_THRESHOLD_PX: f64 = 1000.0;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Age after which an in-flight feed request stops holding the fetch guard.
pub const DEFAULT_STALL_TIMEOUT: Duration = Duration::from_secs(60);

pub fn default_storage_dir() -> PathBuf {
    if let Some(data) = dirs::data_local_dir() {
        data.join("kwebstore")
    } else {
        PathBuf::from(".kwebstore")
    }
}
