//! Static Assets
//!
//! The client script is compiled into the binary so the server is a single
//! artifact with no runtime asset directory.
//!
//! - GET /static/app.js - chat page client script

use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

/// Client script: clock, 60-second refresh loop, clear-chat action.
pub const APP_JS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/app.js"));

/// GET /static/app.js
pub async fn app_js() -> Response {
    ([(CONTENT_TYPE, "application/javascript")], APP_JS).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_carries_the_page_tasks() {
        assert!(APP_JS.contains("/refresh"));
        assert!(APP_JS.contains("/clear"));
        assert!(APP_JS.contains("clock"));
        assert!(APP_JS.contains("60000"));
        assert!(APP_JS.contains("1000"));
    }
}
