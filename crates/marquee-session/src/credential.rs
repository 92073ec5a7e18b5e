//! The single persisted bearer credential.
//!
//! # Design
//! - Exactly one credential is active per profile; `save` overwrites.
//! - Storage failures degrade to "no credential" and are logged, never raised.
//! - Only the session context holds a writable store. Everything else gets a
//!   [`CredentialReader`], which cannot save or clear.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Opaque bearer token.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a token, rejecting blank values.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Raw token value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value.
    #[must_use]
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Durable slot for the active credential.
pub trait CredentialStore {
    /// Persist `credential`, replacing any previous value.
    fn save(&self, credential: &Credential);
    /// Current credential, if any. Unavailable storage reads as `None`.
    fn read(&self) -> Option<Credential>;
    /// Remove the credential. Idempotent.
    fn clear(&self);
}

/// Read-only view of a [`CredentialStore`] for resolvers and resource clients.
#[derive(Clone)]
pub struct CredentialReader {
    store: Rc<dyn CredentialStore>,
}

impl CredentialReader {
    /// Wrap a shared store.
    #[must_use]
    pub fn new(store: Rc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Current credential, read at call time.
    #[must_use]
    pub fn read(&self) -> Option<Credential> {
        self.store.read()
    }
}

impl fmt::Debug for CredentialReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialReader").finish_non_exhaustive()
    }
}

/// Process-local store. Also used to model disabled storage in tests.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: RefCell<Option<Credential>>,
    unavailable: Cell<bool>,
}

impl MemoryCredentialStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `token`.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self {
            slot: RefCell::new(Credential::new(token)),
            unavailable: Cell::new(false),
        }
    }

    /// Store that behaves like disabled browser storage.
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            slot: RefCell::new(None),
            unavailable: Cell::new(true),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn save(&self, credential: &Credential) {
        if self.unavailable.get() {
            tracing::warn!("credential storage unavailable; token not persisted");
            return;
        }
        *self.slot.borrow_mut() = Some(credential.clone());
    }

    fn read(&self) -> Option<Credential> {
        if self.unavailable.get() {
            return None;
        }
        self.slot.borrow().clone()
    }

    fn clear(&self) {
        self.slot.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_tokens_are_not_credentials() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   ").is_none());
        assert_eq!(
            Credential::new(" abc ").map(|c| c.expose().to_string()),
            Some("abc".to_string())
        );
    }

    #[test]
    fn debug_output_is_redacted() {
        let credential = Credential::new("secret-token").expect("credential");
        assert!(!format!("{credential:?}").contains("secret-token"));
        assert_eq!(credential.bearer_header(), "Bearer secret-token");
    }

    #[test]
    fn save_overwrites_and_clear_is_idempotent() {
        let store = MemoryCredentialStore::with_token("first");
        store.save(&Credential::new("second").expect("credential"));
        assert_eq!(store.read().map(|c| c.expose().to_string()), Some("second".into()));
        store.clear();
        store.clear();
        assert!(store.read().is_none());
    }

    #[test]
    fn unavailable_storage_reads_as_absent() {
        let store = MemoryCredentialStore::unavailable();
        store.save(&Credential::new("token").expect("credential"));
        assert!(store.read().is_none());
    }

    #[test]
    fn reader_sees_latest_value() {
        let store = Rc::new(MemoryCredentialStore::new());
        let reader = CredentialReader::new(store.clone());
        assert!(reader.read().is_none());
        store.save(&Credential::new("later").expect("credential"));
        assert_eq!(reader.read().map(|c| c.expose().to_string()), Some("later".into()));
    }
}
