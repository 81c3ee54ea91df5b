//! `localStorage` backing for the login session.

use campus_map_shared::models::AuthSession;
use campus_map_shared::session::{self, MemoryStore, SessionError, SessionStore};

/// Browser local storage, or an in-memory map when it is unavailable
/// (private mode, storage disabled).
pub struct BrowserStore {
    storage: Option<web_sys::Storage>,
    fallback: MemoryStore,
}

impl BrowserStore {
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            tracing::warn!("localStorage unavailable, session will not persist");
        }
        BrowserStore {
            storage,
            fallback: MemoryStore::default(),
        }
    }
}

impl SessionStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        match &self.storage {
            Some(s) => s.get_item(key).ok().flatten(),
            None => self.fallback.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        match &self.storage {
            Some(s) => s
                .set_item(key, value)
                .map_err(|e| SessionError::Storage(format!("{e:?}"))),
            None => self.fallback.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) {
        match &self.storage {
            Some(s) => {
                removed(key, s.remove_item(key));
            }
            None => self.fallback.remove(key),
        }
    }
}

/// Log a failed removal; the caller carries on either way.
fn removed<E: std::fmt::Debug>(key: &str, result: Result<(), E>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(key, error = ?e, "could not remove stored session key");
            false
        }
    }
}

pub fn restore() -> Option<AuthSession> {
    match session::load_session(&mut BrowserStore::open()) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "stored session discarded");
            None
        }
    }
}

pub fn persist(auth: &AuthSession) {
    if let Err(e) = session::save_session(&mut BrowserStore::open(), auth) {
        tracing::warn!(error = %e, "could not store session");
    }
}

pub fn forget() {
    session::clear_session(&mut BrowserStore::open());
}
