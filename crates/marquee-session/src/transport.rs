//! HTTP seam implemented by the browser (`gloo-net`) and CLI (`reqwest`) hosts.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use marquee_api_models::ErrorBody;

use crate::credential::Credential;
use crate::error::ApiError;

/// HTTP verbs used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case verb.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// Outbound request description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Verb.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Bearer credential to attach, if any.
    pub bearer: Option<Credential>,
    /// JSON body text.
    pub body: Option<String>,
}

impl ApiRequest {
    /// Request without bearer or body.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            bearer: None,
            body: None,
        }
    }

    /// Attach a bearer credential when one is present.
    #[must_use]
    pub fn bearer(mut self, credential: Option<Credential>) -> Self {
        self.bearer = credential;
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transient`] if `body` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let text = serde_json::to_string(body).map_err(|err| ApiError::Transient {
            detail: format!("failed to encode request body: {err}"),
        })?;
        self.body = Some(text);
        Ok(self)
    }
}

/// Raw response: status plus body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Body bytes.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Build a response from a status and body text.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Message from an `{ "error": ... }` body, if the body is one.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        serde_json::from_slice::<ErrorBody>(&self.body)
            .ok()
            .map(|body| body.error)
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transient`] when the payload is malformed.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(|err| ApiError::Transient {
            detail: format!("malformed response payload: {err}"),
        })
    }
}

/// The request never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("network failure: {0}")]
pub struct TransportError(pub String);

impl TransportError {
    /// Wrap any displayable failure.
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}

/// Sends requests on the host's event loop.
#[async_trait(?Send)]
pub trait Transport {
    /// Issue `request` and return the raw response.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// Send, classify non-2xx responses, and decode the success body.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    transport: &dyn Transport,
    request: ApiRequest,
) -> Result<T, ApiError> {
    let method = request.method;
    let url = request.url.clone();
    let bearer = request.bearer.clone();
    let response = transport.send(request).await.map_err(|err| {
        tracing::debug!(method = method.as_str(), %url, error = %err, "request failed");
        ApiError::from(err)
    })?;
    if response.is_success() {
        response.decode()
    } else {
        tracing::debug!(method = method.as_str(), %url, status = response.status, "request rejected");
        Err(ApiError::from_response(&response).sent_with(bearer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_reads_error_documents_only() {
        let response = ApiResponse::new(400, r#"{"error":"Username already taken"}"#);
        assert_eq!(response.error_message().as_deref(), Some("Username already taken"));
        assert_eq!(ApiResponse::new(500, "oops").error_message(), None);
    }

    #[test]
    fn decode_failure_is_transient() {
        let response = ApiResponse::new(200, "not json");
        let result = response.decode::<serde_json::Value>();
        assert!(matches!(result, Err(ApiError::Transient { .. })));
    }

    #[test]
    fn bearer_and_body_are_attached() {
        let request = ApiRequest::new(Method::Post, "http://x/shows")
            .bearer(Credential::new("tok"))
            .json(&serde_json::json!({"a": 1}))
            .expect("encode");
        assert_eq!(request.body.as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(
            request.bearer.map(|c| c.bearer_header()),
            Some("Bearer tok".to_string())
        );
    }
}
