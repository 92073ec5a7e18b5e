//! Command handlers grouped by concern.

use anyhow::anyhow;
use marquee_api_models::Identity;
use marquee_session::{ApiError, CapabilitySet, FailureKind};

use crate::client::{AppContext, CliError, CliResult};

pub(crate) mod auth;
pub(crate) mod resources;

/// Resolve the stored token into an identity.
async fn require_identity(ctx: &AppContext) -> CliResult<Identity> {
    ctx.session.start().await;
    let state = ctx.session.state();
    if let Some(identity) = state.identity() {
        return Ok(identity.clone());
    }
    match state.last_error() {
        Some(failure) if failure.kind == FailureKind::Unauthorized => {
            Err(CliError::Unauthorized(failure.message.clone()))
        }
        Some(failure) => Err(CliError::failure(anyhow!(
            "could not verify session: {}",
            failure.message
        ))),
        None => Err(CliError::from(ApiError::NoCredential)),
    }
}

/// Refuse early unless the signed-in account holds `required`.
async fn authorize(ctx: &AppContext, required: CapabilitySet) -> CliResult<Identity> {
    let identity = require_identity(ctx).await?;
    ctx.session
        .capabilities()
        .ensure(required)
        .map_err(|denied| CliError::from(ApiError::Denied(denied)))?;
    Ok(identity)
}
