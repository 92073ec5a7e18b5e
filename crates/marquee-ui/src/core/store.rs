//! App-wide yewdux store.
//!
//! # Design
//! - The session context owns the truth; this store mirrors its snapshots so
//!   components can select from them without holding the context.
//! - Redirects requested by the session wait here until the router consumes
//!   them.

use marquee_session::{CapabilitySet, FailureKind, PublicRoute, SessionState};
use yewdux::store::Store;

/// Global application store.
#[derive(Clone, Debug, PartialEq, Eq, Store, Default)]
pub struct AppStore {
    /// Session mirror.
    pub session: SessionSlice,
    /// Transient banner shown above the routed page.
    pub notice: Option<Notice>,
}

/// Mirror of the session context plus pending navigation.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SessionSlice {
    /// Latest published session snapshot.
    pub state: SessionState,
    /// Route the session asked for and the router has not applied yet.
    pub redirect: Option<PublicRoute>,
}

/// Banner message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Styling hint.
    pub tone: NoticeTone,
    /// Text shown to the user.
    pub message: String,
}

/// Banner styling hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeTone {
    /// Confirmation.
    Success,
    /// Something failed but nothing needs to be redone.
    Error,
}

/// Replace the mirrored snapshot. A session-level failure becomes a banner.
pub fn apply_session_state(store: &mut AppStore, state: SessionState) {
    if let Some(failure) = state.last_error() {
        let message = match failure.kind {
            FailureKind::Unauthorized => "Your session has ended. Please sign in again.".to_string(),
            FailureKind::Transient => failure.message.clone(),
        };
        store.notice = Some(Notice {
            tone: NoticeTone::Error,
            message,
        });
    }
    store.session.state = state;
}

/// Queue a navigation for the router.
pub fn request_redirect(store: &mut AppStore, route: PublicRoute) {
    store.session.redirect = Some(route);
}

/// Remove and return the queued navigation.
pub fn take_redirect(store: &mut AppStore) -> Option<PublicRoute> {
    store.session.redirect.take()
}

/// Show a banner.
pub fn set_notice(store: &mut AppStore, tone: NoticeTone, message: impl Into<String>) {
    store.notice = Some(Notice {
        tone,
        message: message.into(),
    });
}

/// Dismiss the banner.
pub fn clear_notice(store: &mut AppStore) {
    store.notice = None;
}

/// Capabilities of the mirrored session.
#[must_use]
pub const fn select_capabilities(store: &AppStore) -> CapabilitySet {
    store.session.state.capabilities()
}

/// Display name of the signed-in user.
#[must_use]
pub fn select_username(store: &AppStore) -> Option<String> {
    store
        .session
        .state
        .identity()
        .map(|identity| identity.username.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_store_is_unresolved_and_public() {
        let store = AppStore::default();
        assert!(!store.session.state.loading());
        assert_eq!(select_capabilities(&store), CapabilitySet::PUBLIC);
        assert_eq!(select_username(&store), None);
        assert!(store.notice.is_none());
    }

    #[test]
    fn redirects_are_consumed_once() {
        let mut store = AppStore::default();
        request_redirect(&mut store, PublicRoute::Login);
        assert_eq!(take_redirect(&mut store), Some(PublicRoute::Login));
        assert_eq!(take_redirect(&mut store), None);
    }

    #[test]
    fn clean_snapshots_leave_the_banner_alone() {
        let mut store = AppStore::default();
        set_notice(&mut store, NoticeTone::Success, "Show deleted");
        apply_session_state(&mut store, SessionState::default());
        assert_eq!(
            store.notice.as_ref().map(|n| n.message.as_str()),
            Some("Show deleted")
        );
        clear_notice(&mut store);
        assert!(store.notice.is_none());
    }
}
