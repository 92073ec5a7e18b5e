#![forbid(unsafe_code)]
#![warn(
    unused,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the Marquee live-music API.
//!
//! These types are re-used by the browser console and the CLI so both encode
//! requests and decode responses against one contract. Field names follow the
//! backend's wire format (`showdate`, `bandname`, ...), which is why several
//! structs carry lowercase run-together identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod resources;
mod wire;

pub use resources::{
    Band, BandDraft, BandPatch, Bands, ResourceKind, Show, ShowDraft, ShowPatch, Shows, Venue,
    VenueDraft, VenuePatch, Venues,
};

/// Role attached to every account. `admin` is the single privileged value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Venue staff with a personal dashboard.
    Staff,
    /// Regular account holder.
    User,
}

impl Role {
    /// All roles in privilege order.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Admin, Self::Staff, Self::User]
    }

    /// Wire representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a role string is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}' (expected admin, staff or user)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "user" => Ok(Self::User),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

/// Verified account record returned by `GET /auth/me`.
///
/// Additional columns returned by the backend are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// Account identifier.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Canonical role.
    pub role: Role,
}

/// Body for `POST /auth/signin`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignInRequest {
    /// Login name.
    pub username: String,
    /// Plain-text password; hashing is owned by the backend.
    pub password: String,
}

/// Account summary echoed back by the sign-in and sign-up endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountSummary {
    /// Account identifier when the backend includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Login name.
    pub username: String,
    /// Role as reported by the backend, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Successful `POST /auth/signin` payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignInResponse {
    /// Opaque bearer token.
    pub token: String,
    /// The account that signed in.
    pub user: AccountSummary,
}

/// Body for `POST /auth/signup`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignUpRequest {
    /// Requested login name.
    pub username: String,
    /// Plain-text password.
    pub password: String,
    /// Requested role; the backend decides whether to honour it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Successful `POST /auth/signup` payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignUpResponse {
    /// Newly created account.
    pub user: AccountSummary,
    /// Some deployments issue a token immediately; it is not used to sign in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Failure document returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Human-readable message, surfaced verbatim.
    pub error: String,
}

/// Confirmation returned by delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageBody {
    /// Human-readable confirmation.
    pub message: String,
}
