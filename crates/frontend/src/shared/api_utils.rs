//! API utilities for frontend-backend communication
//!
//! The put-away API is served from the same origin as the page, so the base URL is simply
//! the page origin.

/// Get the base URL for API requests
///
/// # Returns
/// - Page origin like "https://warehouse.example.com"
/// - Empty string if window is not available (relative URLs are used then)
pub fn api_base() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_default()
}

/// Build a full API URL from a path
///
/// # Example
/// ```rust,ignore
/// let url = api_url("/openboxes/api/putaways?location.id=5");
/// ```
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}
