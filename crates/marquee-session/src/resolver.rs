//! Session resolver: stored credential → verified identity.
//!
//! # Design
//! - No credential means no request: the result is `Anonymous` immediately.
//! - 401/403 (and 404, the account no longer exists) are `Unauthorized`; the
//!   caller must clear the credential. Everything else that goes wrong is
//!   `Transient` and the credential stays.
//! - The resolver never writes the store and keeps no state between calls;
//!   ordering between overlapping calls is the session context's job.

use std::rc::Rc;

use marquee_api_models::Identity;

use crate::config::ApiConfig;
use crate::credential::CredentialReader;
use crate::error::{ApiError, SessionFailure};
use crate::transport::{ApiRequest, Method, Transport};

/// Identity verification endpoint.
pub const IDENTITY_PATH: &str = "/auth/me";

/// Outcome of one resolution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No credential stored.
    Anonymous,
    /// Credential verified.
    Resolved(Identity),
    /// Verification failed.
    Failed(SessionFailure),
}

/// Validates the stored credential against `GET /auth/me`.
#[derive(Clone)]
pub struct SessionResolver {
    config: ApiConfig,
    transport: Rc<dyn Transport>,
    credentials: CredentialReader,
}

impl SessionResolver {
    /// Build a resolver over a transport and a read-only credential view.
    #[must_use]
    pub fn new(config: ApiConfig, transport: Rc<dyn Transport>, credentials: CredentialReader) -> Self {
        Self {
            config,
            transport,
            credentials,
        }
    }

    /// Resolve the current credential.
    pub async fn resolve(&self) -> Resolution {
        let Some(credential) = self.credentials.read() else {
            return Resolution::Anonymous;
        };
        let request =
            ApiRequest::new(Method::Get, self.config.endpoint(IDENTITY_PATH)).bearer(Some(credential));
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(error = %err, "identity lookup did not complete");
                return Resolution::Failed(SessionFailure::transient(
                    "Could not reach the server to verify your session.",
                ));
            }
        };

        if response.is_success() {
            return match response.decode::<Identity>() {
                Ok(identity) => Resolution::Resolved(identity),
                Err(err) => {
                    tracing::warn!(error = %err, "identity payload malformed");
                    Resolution::Failed(SessionFailure::transient(
                        "The server returned an unreadable identity.",
                    ))
                }
            };
        }

        match response.status {
            404 => Resolution::Failed(SessionFailure::unauthorized(
                response
                    .error_message()
                    .unwrap_or_else(|| "Account not found".to_string()),
            )),
            _ => match ApiError::from_response(&response) {
                ApiError::Unauthorized { message, .. } => {
                    Resolution::Failed(SessionFailure::unauthorized(message))
                }
                other => {
                    tracing::debug!(status = response.status, error = %other, "identity lookup failed");
                    Resolution::Failed(SessionFailure::transient(format!(
                        "Could not verify your session: {other}"
                    )))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::MemoryCredentialStore;
    use crate::error::FailureKind;
    use crate::testing::ScriptedTransport;
    use marquee_api_models::Role;
    use serde_json::json;

    fn resolver(token: Option<&str>, transport: &Rc<ScriptedTransport>) -> SessionResolver {
        let store = Rc::new(token.map_or_else(MemoryCredentialStore::new, MemoryCredentialStore::with_token));
        SessionResolver::new(
            ApiConfig::default(),
            transport.clone(),
            CredentialReader::new(store),
        )
    }

    #[tokio::test]
    async fn no_credential_skips_the_network() {
        let transport = Rc::new(ScriptedTransport::new());
        let outcome = resolver(None, &transport).resolve().await;
        assert_eq!(outcome, Resolution::Anonymous);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn success_yields_identity_and_sends_bearer() {
        let transport = Rc::new(ScriptedTransport::new());
        transport.reply(200, &json!({"id": 1, "username": "alex", "role": "admin"}));
        let outcome = resolver(Some("tok"), &transport).resolve().await;
        assert_eq!(
            outcome,
            Resolution::Resolved(Identity {
                id: 1,
                username: "alex".into(),
                role: Role::Admin
            })
        );
        let sent = transport.requests();
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].url, "http://127.0.0.1:5000/auth/me");
        assert_eq!(
            sent[0].bearer.as_ref().map(crate::Credential::bearer_header),
            Some("Bearer tok".to_string())
        );
    }

    #[tokio::test]
    async fn rejected_credentials_are_unauthorized() {
        for status in [401, 403, 404] {
            let transport = Rc::new(ScriptedTransport::new());
            transport.reply(status, &json!({"error": "Invalid token"}));
            let Resolution::Failed(failure) = resolver(Some("tok"), &transport).resolve().await else {
                panic!("expected failure for {status}");
            };
            assert_eq!(failure.kind, FailureKind::Unauthorized);
        }
    }

    #[tokio::test]
    async fn network_and_payload_problems_are_transient() {
        let transport = Rc::new(ScriptedTransport::new());
        transport.fail("connection refused");
        transport.reply(200, &json!({"username": "alex"}));
        transport.reply(500, &json!({"error": "db down"}));
        let resolver = resolver(Some("tok"), &transport);
        for _ in 0..3 {
            let Resolution::Failed(failure) = resolver.resolve().await else {
                panic!("expected transient failure");
            };
            assert_eq!(failure.kind, FailureKind::Transient);
        }
    }
}
