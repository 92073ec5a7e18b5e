//! `/auth/*` calls that are not identity resolution.
//!
//! Sign-in and sign-up failures belong to the form that submitted them, so a
//! 401 from `/auth/signin` ("Invalid credentials") is reported as
//! [`ApiError::Validation`] and can never be mistaken for a session rejection.

use std::rc::Rc;

use marquee_api_models::{Identity, SignInRequest, SignInResponse, SignUpRequest, SignUpResponse};

use crate::config::ApiConfig;
use crate::credential::Credential;
use crate::error::ApiError;
use crate::transport::{ApiRequest, Method, Transport, fetch_json};

const SIGN_IN_PATH: &str = "/auth/signin";
const SIGN_UP_PATH: &str = "/auth/signup";
const USERS_PATH: &str = "/auth/users";

/// Client for the account endpoints.
#[derive(Clone)]
pub struct AuthClient {
    config: ApiConfig,
    transport: Rc<dyn Transport>,
}

impl AuthClient {
    /// Build a client over a transport.
    #[must_use]
    pub fn new(config: ApiConfig, transport: Rc<dyn Transport>) -> Self {
        Self { config, transport }
    }

    /// Exchange username and password for a token.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] with the backend message when the credentials
    /// are refused, [`ApiError::Transient`] when the server cannot be reached
    /// or answers with an unusable payload.
    pub async fn sign_in(&self, request: &SignInRequest) -> Result<SignInResponse, ApiError> {
        let request = ApiRequest::new(Method::Post, self.config.endpoint(SIGN_IN_PATH)).json(request)?;
        let response: SignInResponse = fetch_json(self.transport.as_ref(), request)
            .await
            .map_err(as_form_error)?;
        if response.token.trim().is_empty() {
            return Err(ApiError::Transient {
                detail: "sign-in response carried an empty token".to_string(),
            });
        }
        Ok(response)
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] with the backend message (e.g. a taken
    /// username), [`ApiError::Transient`] otherwise.
    pub async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpResponse, ApiError> {
        let request = ApiRequest::new(Method::Post, self.config.endpoint(SIGN_UP_PATH)).json(request)?;
        fetch_json(self.transport.as_ref(), request)
            .await
            .map_err(as_form_error)
    }

    /// List every account. Admin only on the backend.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] when the backend refuses the bearer, the
    /// usual [`ApiError`] classification otherwise.
    pub async fn users(&self, bearer: Credential) -> Result<Vec<Identity>, ApiError> {
        let request =
            ApiRequest::new(Method::Get, self.config.endpoint(USERS_PATH)).bearer(Some(bearer));
        fetch_json(self.transport.as_ref(), request).await
    }
}

fn as_form_error(err: ApiError) -> ApiError {
    match err {
        ApiError::Unauthorized { status, message, .. } => ApiError::Validation { status, message },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use marquee_api_models::Role;
    use serde_json::json;

    fn client(transport: &Rc<ScriptedTransport>) -> AuthClient {
        AuthClient::new(ApiConfig::default(), transport.clone())
    }

    fn credentials() -> SignInRequest {
        SignInRequest {
            username: "alex".into(),
            password: "pw".into(),
        }
    }

    #[tokio::test]
    async fn sign_in_posts_credentials() {
        let transport = Rc::new(ScriptedTransport::new());
        transport.reply(200, &json!({"token": "abc", "user": {"username": "alex", "role": "user"}}));
        let response = client(&transport).sign_in(&credentials()).await.expect("sign in");
        assert_eq!(response.token, "abc");
        let sent = transport.requests();
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].url, "http://127.0.0.1:5000/auth/signin");
        assert!(sent[0].bearer.is_none());
        let body: serde_json::Value =
            serde_json::from_str(sent[0].body.as_deref().expect("body")).expect("json body");
        assert_eq!(body, json!({"username": "alex", "password": "pw"}));
    }

    #[tokio::test]
    async fn refused_sign_in_is_a_form_error() {
        let transport = Rc::new(ScriptedTransport::new());
        transport.reply(401, &json!({"error": "Invalid credentials"}));
        let err = client(&transport).sign_in(&credentials()).await.expect_err("refused");
        assert_eq!(
            err,
            ApiError::Validation {
                status: 401,
                message: "Invalid credentials".into()
            }
        );
    }

    #[tokio::test]
    async fn empty_token_is_rejected() {
        let transport = Rc::new(ScriptedTransport::new());
        transport.reply(200, &json!({"token": " ", "user": {"username": "alex"}}));
        let err = client(&transport).sign_in(&credentials()).await.expect_err("empty");
        assert!(matches!(err, ApiError::Transient { .. }));
    }

    #[tokio::test]
    async fn sign_up_surfaces_backend_message() {
        let transport = Rc::new(ScriptedTransport::new());
        transport.reply(400, &json!({"error": "Username already taken"}));
        let request = SignUpRequest {
            username: "alex".into(),
            password: "pw".into(),
            role: Some(Role::Staff),
        };
        let err = client(&transport).sign_up(&request).await.expect_err("taken");
        assert_eq!(err.to_string(), "Username already taken");
    }

    #[tokio::test]
    async fn users_attach_bearer() {
        let transport = Rc::new(ScriptedTransport::new());
        transport.reply(
            200,
            &json!([{"id": 1, "username": "root", "role": "admin"}, {"id": 2, "username": "sam", "role": "staff"}]),
        );
        let bearer = Credential::new("tok").expect("credential");
        let users = client(&transport).users(bearer).await.expect("users");
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].role, Role::Staff);
        assert_eq!(
            transport.requests()[0].bearer.as_ref().map(Credential::bearer_header),
            Some("Bearer tok".into())
        );
    }
}
