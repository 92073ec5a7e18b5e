//! Account commands: login, logout, whoami, signup and the staff directory.

use anyhow::anyhow;
use marquee_api_models::SignUpRequest;
use marquee_session::CapabilitySet;

use super::{authorize, require_identity};
use crate::cli::{LoginArgs, SignupArgs};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{render_identity, render_list, render_message};

pub(crate) async fn handle_login(ctx: &AppContext, args: LoginArgs) -> CliResult<()> {
    let password = match args.password {
        Some(password) => password,
        None => read_password("Password: ")?,
    };
    let identity = ctx
        .session
        .login(&args.username, &password)
        .await
        .map_err(|err| ctx.fail(err))?;
    tracing::info!(user = %identity.username, role = %identity.role, "signed in");
    render_message(
        &format!("Signed in as {} ({})", identity.username, identity.role),
        ctx.output,
    )
}

pub(crate) fn handle_logout(ctx: &AppContext) -> CliResult<()> {
    ctx.session.logout();
    render_message("Signed out", ctx.output)
}

pub(crate) async fn handle_whoami(ctx: &AppContext) -> CliResult<()> {
    let identity = require_identity(ctx).await?;
    render_identity(&identity, ctx.session.capabilities(), ctx.output)
}

pub(crate) async fn handle_signup(ctx: &AppContext, args: SignupArgs) -> CliResult<()> {
    let password = match args.password {
        Some(password) => password,
        None => {
            let first = read_password("Password: ")?;
            let confirm = read_password("Confirm password: ")?;
            if first != confirm {
                return Err(CliError::validation("passwords do not match"));
            }
            first
        }
    };
    if args.username.trim().is_empty() || password.is_empty() {
        return Err(CliError::validation("username and password are required"));
    }
    let request = SignUpRequest {
        username: args.username.trim().to_string(),
        password,
        role: args.role,
    };
    let response = ctx.session.signup(&request).await.map_err(|err| ctx.fail(err))?;
    render_message(
        &format!("Account created for {}", response.user.username),
        ctx.output,
    )
}

pub(crate) async fn handle_users(ctx: &AppContext) -> CliResult<()> {
    authorize(ctx, CapabilitySet::MANAGE_STAFF).await?;
    let users = ctx
        .session
        .staff_directory()
        .await
        .map_err(|err| ctx.fail(err))?;
    render_list(&users, ctx.output)
}

fn read_password(prompt: &str) -> CliResult<String> {
    rpassword::prompt_password(prompt)
        .map_err(|err| CliError::failure(anyhow!("failed to read password: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::context_with;
    use httpmock::MockServer;
    use httpmock::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn login_args(password: &str) -> LoginArgs {
        LoginArgs {
            username: "alex".into(),
            password: Some(password.into()),
        }
    }

    #[tokio::test]
    async fn login_persists_token_and_resolves_identity() {
        let server = MockServer::start_async().await;
        let signin = server.mock(|when, then| {
            when.method(POST)
                .path("/auth/signin")
                .json_body(json!({"username": "alex", "password": "pw"}));
            then.status(200)
                .json_body(json!({"token": "tok-1", "user": {"id": 1, "username": "alex", "role": "admin"}}));
        });
        let me = server.mock(|when, then| {
            when.method(GET).path("/auth/me").header("authorization", "Bearer tok-1");
            then.status(200)
                .json_body(json!({"id": 1, "username": "alex", "role": "admin"}));
        });
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, &dir, None);

        handle_login(&ctx, login_args("pw")).await.expect("login");

        signin.assert();
        me.assert();
        let stored = std::fs::read_to_string(dir.path().join("token")).expect("token file");
        assert_eq!(stored.trim(), "tok-1");
        assert!(ctx.session.state().is_authenticated());
    }

    #[tokio::test]
    async fn wrong_password_is_a_validation_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/auth/signin");
            then.status(401).json_body(json!({"error": "Invalid credentials"}));
        });
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, &dir, None);

        let err = handle_login(&ctx, login_args("nope")).await.expect_err("refused");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.display_message(), "Invalid credentials");
        assert!(!dir.path().join("token").exists());
    }

    #[tokio::test]
    async fn logout_removes_the_token_file() {
        let server = MockServer::start_async().await;
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, &dir, Some("tok-1"));
        handle_logout(&ctx).expect("logout");
        assert!(!dir.path().join("token").exists());
    }

    #[tokio::test]
    async fn whoami_with_rejected_token_clears_it() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/auth/me");
            then.status(401).json_body(json!({"error": "Invalid token"}));
        });
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, &dir, Some("stale"));

        let err = handle_whoami(&ctx).await.expect_err("rejected");
        assert_eq!(err.exit_code(), 4);
        assert!(ctx.session.reader().read().is_none());
    }

    #[tokio::test]
    async fn whoami_without_token_sends_nothing() {
        let server = MockServer::start_async().await;
        let me = server.mock(|when, then| {
            when.method(GET).path("/auth/me");
            then.status(200);
        });
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, &dir, None);

        let err = handle_whoami(&ctx).await.expect_err("anonymous");
        assert_eq!(err.exit_code(), 2);
        me.assert_hits(0);
    }

    #[tokio::test]
    async fn users_requires_admin_before_any_request() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/auth/me");
            then.status(200)
                .json_body(json!({"id": 2, "username": "sam", "role": "staff"}));
        });
        let users = server.mock(|when, then| {
            when.method(GET).path("/auth/users");
            then.status(200).json_body(json!([]));
        });
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, &dir, Some("tok-2"));

        let err = handle_users(&ctx).await.expect_err("denied");
        assert_eq!(err.exit_code(), 5);
        users.assert_hits(0);
        assert!(ctx.session.reader().read().is_some());
    }

    #[tokio::test]
    async fn signup_reports_taken_usernames() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST)
                .path("/auth/signup")
                .json_body(json!({"username": "alex", "password": "pw", "role": "staff"}));
            then.status(400).json_body(json!({"error": "Username already taken"}));
        });
        let dir = TempDir::new().expect("tempdir");
        let ctx = context_with(&server, &dir, None);
        let args = SignupArgs {
            username: "alex".into(),
            password: Some("pw".into()),
            role: Some(marquee_api_models::Role::Staff),
        };

        let err = handle_signup(&ctx, args).await.expect_err("taken");
        assert_eq!(err.display_message(), "Username already taken");
        assert!(ctx.session.reader().read().is_none());
    }
}
