//! `localStorage`-backed credential store.
//!
//! The token is kept as the raw string under [`TOKEN_STORAGE_KEY`] so other
//! pages on the same origin read the same value. Disabled or throwing
//! storage reads as "no credential" and is logged to the console.

use gloo::console;
use marquee_session::{Credential, CredentialStore, TOKEN_STORAGE_KEY};
use web_sys::Storage;

/// Credential store over `window.localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageCredentialStore;

fn local_storage() -> Option<Storage> {
    match web_sys::window().map(|window| window.local_storage()) {
        Some(Ok(storage)) => storage,
        Some(Err(err)) => {
            console::warn!("localStorage unavailable", err);
            None
        }
        None => None,
    }
}

impl CredentialStore for LocalStorageCredentialStore {
    fn save(&self, credential: &Credential) {
        let Some(storage) = local_storage() else {
            console::warn!("token not persisted: no localStorage");
            return;
        };
        if let Err(err) = storage.set_item(TOKEN_STORAGE_KEY, credential.expose()) {
            console::error!("failed to persist token", err);
        }
    }

    fn read(&self) -> Option<Credential> {
        let storage = local_storage()?;
        match storage.get_item(TOKEN_STORAGE_KEY) {
            Ok(value) => value.and_then(Credential::new),
            Err(err) => {
                console::warn!("failed to read token", err);
                None
            }
        }
    }

    fn clear(&self) {
        if let Some(storage) = local_storage() {
            if let Err(err) = storage.remove_item(TOKEN_STORAGE_KEY) {
                console::error!("failed to remove token", err);
            }
        }
    }
}
