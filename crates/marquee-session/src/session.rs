//! The shared session context every screen subscribes to.
//!
//! # Design
//! - One context per application. It alone holds the writable credential
//!   store; resolvers and resource clients get a [`CredentialReader`].
//! - Resolutions are stamped with an epoch. Logout, stop, a newer refresh
//!   and a reported rejection all bump it, so a response that arrives late
//!   is dropped instead of resurrecting a session (cancel-and-replace).
//! - Subscribers are called after every transition, outside any borrow, so
//!   a callback may call back into the context.
//!
//! ```text
//! Unresolved ──start/refresh──▶ Resolving ──▶ Resolved(identity)
//!                                   │      ──▶ Anonymous        (no token, 401)
//!                                   │      ──▶ Failed(transient)
//! any ──logout──▶ Anonymous
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use marquee_api_models::{Identity, ResourceKind, SignInRequest, SignUpRequest, SignUpResponse};

use crate::auth::AuthClient;
use crate::config::ApiConfig;
use crate::credential::{Credential, CredentialReader, CredentialStore};
use crate::error::{ApiError, FailureKind, SessionFailure};
use crate::gate::{CapabilitySet, capabilities_for};
use crate::resolver::{Resolution, SessionResolver};
use crate::resources::{Catalog, ResourceClient};
use crate::transport::Transport;

/// Public routes the context may send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicRoute {
    /// Sign-in page.
    Login,
    /// Public landing page.
    Home,
}

/// Host hook for redirects triggered by the session.
pub trait Navigator {
    /// Move the user to `route`.
    fn navigate(&self, route: PublicRoute);
}

/// Navigator for hosts without routes (the CLI).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, _route: PublicRoute) {}
}

/// Lifecycle phase of the session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Nothing attempted yet.
    #[default]
    Unresolved,
    /// A resolution is in flight.
    Resolving,
    /// Credential verified.
    Resolved(Identity),
    /// No usable credential.
    Anonymous,
    /// Could not verify; the credential is kept.
    Failed(SessionFailure),
}

/// Snapshot published to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    phase: SessionPhase,
    last_error: Option<SessionFailure>,
}

impl SessionState {
    const fn with(phase: SessionPhase, last_error: Option<SessionFailure>) -> Self {
        Self { phase, last_error }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    /// Verified identity. Hidden while a resolution is in flight.
    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        match &self.phase {
            SessionPhase::Resolved(identity) => Some(identity),
            _ => None,
        }
    }

    /// True for the whole duration of a resolution.
    #[must_use]
    pub const fn loading(&self) -> bool {
        matches!(self.phase, SessionPhase::Resolving)
    }

    /// Failure recorded by the last transition, if any.
    #[must_use]
    pub const fn last_error(&self) -> Option<&SessionFailure> {
        self.last_error.as_ref()
    }

    /// Capabilities derived from the current identity.
    #[must_use]
    pub const fn capabilities(&self) -> CapabilitySet {
        capabilities_for(self.identity())
    }

    /// Whether an identity is resolved.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.identity().is_some()
    }
}

type Callback = Rc<dyn Fn(&SessionState)>;

struct Shared {
    state: SessionState,
    epoch: u64,
    logout_generation: u64,
    started: bool,
}

struct SessionInner {
    shared: RefCell<Shared>,
    subscribers: RefCell<Vec<(u64, Callback)>>,
    next_subscriber: Cell<u64>,
    config: ApiConfig,
    transport: Rc<dyn Transport>,
    store: Rc<dyn CredentialStore>,
    resolver: SessionResolver,
    auth: AuthClient,
    catalog: Catalog,
    reader: CredentialReader,
    navigator: Rc<dyn Navigator>,
}

/// Cheaply cloneable handle to the application session.
#[derive(Clone)]
pub struct SessionContext {
    inner: Rc<SessionInner>,
}

impl PartialEq for SessionContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("state", &self.inner.shared.borrow().state)
            .finish_non_exhaustive()
    }
}

/// Wires a [`SessionContext`] from its collaborators.
pub struct SessionContextBuilder {
    config: ApiConfig,
    transport: Rc<dyn Transport>,
    store: Rc<dyn CredentialStore>,
    navigator: Rc<dyn Navigator>,
}

impl SessionContextBuilder {
    /// Start from the API config, transport and the writable store.
    #[must_use]
    pub fn new(config: ApiConfig, transport: Rc<dyn Transport>, store: Rc<dyn CredentialStore>) -> Self {
        Self {
            config,
            transport,
            store,
            navigator: Rc::new(NoopNavigator),
        }
    }

    /// Redirect hook used on logout and on a reported rejection.
    #[must_use]
    pub fn navigator(mut self, navigator: Rc<dyn Navigator>) -> Self {
        self.navigator = navigator;
        self
    }

    /// Finish wiring.
    #[must_use]
    pub fn build(self) -> SessionContext {
        let reader = CredentialReader::new(Rc::clone(&self.store));
        let resolver = SessionResolver::new(self.config.clone(), Rc::clone(&self.transport), reader.clone());
        let auth = AuthClient::new(self.config.clone(), Rc::clone(&self.transport));
        let catalog = Catalog::new(&self.config, &self.transport, &reader);
        SessionContext {
            inner: Rc::new(SessionInner {
                shared: RefCell::new(Shared {
                    state: SessionState::default(),
                    epoch: 0,
                    logout_generation: 0,
                    started: false,
                }),
                subscribers: RefCell::new(Vec::new()),
                next_subscriber: Cell::new(0),
                config: self.config,
                transport: self.transport,
                store: self.store,
                resolver,
                auth,
                catalog,
                reader,
                navigator: self.navigator,
            }),
        }
    }
}

impl SessionContext {
    /// Shorthand for [`SessionContextBuilder::new`].
    #[must_use]
    pub fn builder(
        config: ApiConfig,
        transport: Rc<dyn Transport>,
        store: Rc<dyn CredentialStore>,
    ) -> SessionContextBuilder {
        SessionContextBuilder::new(config, transport, store)
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.shared.borrow().state.clone()
    }

    /// Capabilities of the current snapshot.
    #[must_use]
    pub fn capabilities(&self) -> CapabilitySet {
        self.inner.shared.borrow().state.capabilities()
    }

    /// Resource clients sharing this session's transport and credential.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Client for any collection, sharing this session's transport and
    /// credential view.
    #[must_use]
    pub fn resource<R: ResourceKind>(&self) -> ResourceClient<R> {
        ResourceClient::new(
            self.inner.config.clone(),
            Rc::clone(&self.inner.transport),
            self.inner.reader.clone(),
        )
    }

    /// Read-only credential view for other collaborators.
    #[must_use]
    pub fn reader(&self) -> CredentialReader {
        self.inner.reader.clone()
    }

    /// Register `callback` for every transition until the returned handle drops.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe(&self, callback: impl Fn(&SessionState) + 'static) -> Subscription {
        let id = self.inner.next_subscriber.get();
        self.inner.next_subscriber.set(id + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Rc::new(callback)));
        Subscription {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Resolve the stored credential once per mount. Later calls are no-ops
    /// until [`stop`](Self::stop).
    pub async fn start(&self) {
        let first = {
            let mut shared = self.inner.shared.borrow_mut();
            !std::mem::replace(&mut shared.started, true)
        };
        if first {
            self.refresh().await;
        }
    }

    /// Start a new resolution, superseding any in flight.
    pub async fn refresh(&self) -> SessionState {
        if self.inner.store.read().is_none() {
            tracing::debug!("no stored credential; session is anonymous");
            self.transition(|shared| {
                shared.epoch += 1;
                shared.state = SessionState::with(SessionPhase::Anonymous, None);
            });
            return self.state();
        }

        let mut epoch = 0;
        self.transition(|shared| {
            shared.epoch += 1;
            epoch = shared.epoch;
            shared.state = SessionState::with(SessionPhase::Resolving, None);
        });
        tracing::debug!(epoch, "resolving session");

        let outcome = self.inner.resolver.resolve().await;
        self.apply(epoch, outcome);
        self.state()
    }

    fn apply(&self, epoch: u64, outcome: Resolution) {
        if self.inner.shared.borrow().epoch != epoch {
            tracing::warn!(epoch, "discarding superseded session resolution");
            return;
        }
        let next = match outcome {
            Resolution::Anonymous => SessionState::with(SessionPhase::Anonymous, None),
            Resolution::Resolved(identity) => {
                tracing::debug!(user = %identity.username, role = %identity.role, "session resolved");
                SessionState::with(SessionPhase::Resolved(identity), None)
            }
            Resolution::Failed(failure) => match failure.kind {
                FailureKind::Unauthorized => {
                    tracing::debug!(reason = %failure, "credential rejected; clearing");
                    self.inner.store.clear();
                    SessionState::with(SessionPhase::Anonymous, Some(failure))
                }
                FailureKind::Transient => {
                    tracing::debug!(reason = %failure, "session could not be verified");
                    SessionState::with(SessionPhase::Failed(failure.clone()), Some(failure))
                }
            },
        };
        self.transition(|shared| shared.state = next);
    }

    /// Sign in, persist the token and resolve the resulting identity.
    ///
    /// A refused sign-in leaves the session exactly as it was.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Validation`] with the backend message for bad credentials.
    /// - [`ApiError::Superseded`] when a logout happened while signing in.
    /// - [`ApiError::Unauthorized`] / [`ApiError::Transient`] when the new
    ///   token could not be resolved.
    /// - [`ApiError::Transient`] when the credential store did not keep the
    ///   new token.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, ApiError> {
        let generation = self.inner.shared.borrow().logout_generation;
        let request = SignInRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self.inner.auth.sign_in(&request).await?;

        if self.inner.shared.borrow().logout_generation != generation {
            tracing::warn!("logout during sign-in; discarding token");
            return Err(ApiError::Superseded);
        }
        let credential = Credential::new(response.token).ok_or_else(|| ApiError::Transient {
            detail: "sign-in response carried an empty token".to_string(),
        })?;
        self.inner.store.save(&credential);
        if self.inner.store.read().as_ref() != Some(&credential) {
            tracing::warn!("credential store did not keep the new token");
            return Err(ApiError::Transient {
                detail: "could not persist credential".to_string(),
            });
        }

        let state = self.refresh().await;
        match (state.phase, state.last_error) {
            (SessionPhase::Resolved(identity), _) => Ok(identity),
            (SessionPhase::Failed(failure), _) => Err(ApiError::Transient {
                detail: failure.message,
            }),
            (SessionPhase::Anonymous, Some(failure)) if failure.kind == FailureKind::Unauthorized => {
                Err(ApiError::Unauthorized {
                    status: 401,
                    message: failure.message,
                    credential: Some(credential),
                })
            }
            _ => Err(ApiError::Superseded),
        }
    }

    /// Drop the credential and any pending resolution, then send the user to
    /// the login page. Safe to call without a session.
    pub fn logout(&self) {
        self.inner.store.clear();
        self.transition(|shared| {
            shared.epoch += 1;
            shared.logout_generation += 1;
            shared.state = SessionState::with(SessionPhase::Anonymous, None);
        });
        tracing::debug!("signed out");
        self.inner.navigator.navigate(PublicRoute::Login);
    }

    /// Unmount: cancel any pending resolution. A `Resolving` phase falls back
    /// to `Unresolved`.
    pub fn stop(&self) {
        let changed = {
            let mut shared = self.inner.shared.borrow_mut();
            shared.epoch += 1;
            shared.started = false;
            if shared.state.loading() {
                shared.state = SessionState::default();
                true
            } else {
                false
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Hand a resource-level failure to the session. Only a rejection of the
    /// credential currently stored ends the session; returns whether it did.
    pub fn report(&self, error: &ApiError) -> bool {
        let ApiError::Unauthorized {
            message, credential, ..
        } = error
        else {
            return false;
        };
        if self.inner.store.read() != *credential {
            tracing::debug!(reason = %message, "rejection was for a replaced credential; ignoring");
            return false;
        }
        tracing::debug!(reason = %message, "resource call rejected credential; signing out");
        self.inner.store.clear();
        let failure = SessionFailure::unauthorized(message.clone());
        self.transition(|shared| {
            shared.epoch += 1;
            shared.state = SessionState::with(SessionPhase::Anonymous, Some(failure));
        });
        self.inner.navigator.navigate(PublicRoute::Login);
        true
    }

    /// Create an account. The current session is not affected.
    ///
    /// # Errors
    ///
    /// [`ApiError::Validation`] with the backend message, or
    /// [`ApiError::Transient`].
    pub async fn signup(&self, request: &SignUpRequest) -> Result<SignUpResponse, ApiError> {
        self.inner.auth.sign_up(request).await
    }

    /// Every account, for admins.
    ///
    /// # Errors
    ///
    /// [`ApiError::Denied`] before any request without `MANAGE_STAFF`,
    /// [`ApiError::NoCredential`] when the token vanished, otherwise the
    /// classified response.
    pub async fn staff_directory(&self) -> Result<Vec<Identity>, ApiError> {
        self.capabilities().ensure(CapabilitySet::MANAGE_STAFF)?;
        let bearer = self.inner.store.read().ok_or(ApiError::NoCredential)?;
        self.inner.auth.users(bearer).await
    }

    fn transition(&self, update: impl FnOnce(&mut Shared)) {
        update(&mut self.inner.shared.borrow_mut());
        self.notify();
    }

    fn notify(&self) {
        let state = self.state();
        let callbacks: Vec<Callback> = self
            .inner
            .subscribers
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(&state);
        }
    }
}

/// Active subscription; unsubscribes on drop.
pub struct Subscription {
    inner: Weak<SessionInner>,
    id: u64,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner
                .subscribers
                .borrow_mut()
                .retain(|(id, _)| *id != self.id);
        }
    }
}
