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
#![allow(clippy::module_name_repetitions)]
//! Session and authorization core for the Marquee console.
//!
//! Layout:
//! - `credential.rs`: the single persisted bearer token and its stores
//! - `resolver.rs`: exchanges the stored token for a verified identity
//! - `gate.rs`: pure role → capability derivation
//! - `session.rs`: the shared session context (login, logout, refresh)
//! - `resources.rs`: Shows/Bands/Venues clients that attach the bearer
//! - `auth.rs`: sign-in, sign-up and staff directory calls
//! - `transport.rs`: the HTTP seam implemented by the browser and CLI hosts
//!
//! Everything here is single-threaded: shared state lives in `Rc<RefCell<_>>`
//! and transport futures are not required to be `Send`.

pub mod auth;
pub mod config;
pub mod credential;
pub mod error;
pub mod gate;
pub mod resolver;
pub mod resources;
pub mod session;
pub mod transport;

#[cfg(test)]
mod testing;

pub use auth::AuthClient;
pub use config::{ApiConfig, ConfigError, DEFAULT_API_URL, TOKEN_STORAGE_KEY};
pub use credential::{Credential, CredentialReader, CredentialStore, MemoryCredentialStore};
pub use error::{ApiError, FailureKind, SessionFailure};
pub use gate::{AccessDenied, Action, CapabilitySet, Resource, capabilities_for};
pub use resolver::{Resolution, SessionResolver};
pub use resources::{BandsClient, Catalog, GatedResource, ResourceClient, ShowsClient, VenuesClient};
pub use session::{
    Navigator, NoopNavigator, PublicRoute, SessionContext, SessionContextBuilder, SessionPhase,
    SessionState, Subscription,
};
pub use transport::{ApiRequest, ApiResponse, Method, Transport, TransportError};
