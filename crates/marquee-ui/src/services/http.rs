//! `fetch` transport built on `gloo-net`.

use async_trait::async_trait;
use gloo_net::http::Request;
use marquee_session::{ApiRequest, ApiResponse, Method, Transport, TransportError};

/// Sends API requests through the browser's `fetch`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut req = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Put => Request::put(&request.url),
            Method::Delete => Request::delete(&request.url),
        };
        if let Some(bearer) = &request.bearer {
            req = req.header("Authorization", &bearer.bearer_header());
        }
        if let Some(body) = request.body {
            req = req.header("Content-Type", "application/json").body(body);
        }
        let response = req
            .send()
            .await
            .map_err(|err| TransportError::new(err.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| TransportError::new(err.to_string()))?;
        Ok(ApiResponse::new(status, body))
    }
}
