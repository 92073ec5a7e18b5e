//! Build-time configuration for the browser bundle.

use gloo::console;
use marquee_session::ApiConfig;

/// Backend base URL baked in at build time, e.g.
/// `MARQUEE_API_BASE_URL=https://api.example.com trunk build`.
const BUILD_API_BASE_URL: Option<&str> = option_env!("MARQUEE_API_BASE_URL");

pub(crate) fn api_config() -> ApiConfig {
    let Some(raw) = BUILD_API_BASE_URL else {
        return ApiConfig::default();
    };
    ApiConfig::new(raw).unwrap_or_else(|err| {
        console::error!("invalid MARQUEE_API_BASE_URL; using default", err.to_string());
        ApiConfig::default()
    })
}
