//! API utilities for frontend-backend communication

use contracts::dashboards::d400_sales_analytics::ErrorResponse;
use gloo_net::http::Response;

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path ("/api/...")
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

/// Error text for a failed response: the server's message when present
pub async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<ErrorResponse>().await {
        Ok(body) => body.message,
        Err(_) => format!("HTTP error: {}", status),
    }
}
