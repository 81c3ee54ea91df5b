//! Where the login session lives in browser storage.
//!
//! One scheme is canonical: `authToken` holds the bearer token and `authUser`
//! the JSON user. Older builds wrote the same data under `adminToken` /
//! `adminUser`; those keys are migrated on load and then removed.

use std::collections::HashMap;

use thiserror::Error;

use crate::models::{AuthSession, User};

pub const TOKEN_KEY: &str = "authToken";
pub const USER_KEY: &str = "authUser";
pub const LEGACY_TOKEN_KEY: &str = "adminToken";
pub const LEGACY_USER_KEY: &str = "adminUser";

/// Minimal key/value storage, e.g. `window.localStorage`.
pub trait SessionStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&mut self, key: &str);
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("stored user is malformed: {0}")]
    MalformedUser(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Storage(String),
}

fn read_pair(store: &dyn SessionStore, token_key: &str, user_key: &str) -> Option<(String, String)> {
    let token = store.get(token_key).filter(|t| !t.is_empty())?;
    let user = store.get(user_key)?;
    Some((token, user))
}

/// Load the stored session, migrating legacy keys when that is all there is.
///
/// A malformed user entry clears every session key and is reported as an error.
pub fn load_session(store: &mut dyn SessionStore) -> Result<Option<AuthSession>, SessionError> {
    let (pair, migrated) = match read_pair(store, TOKEN_KEY, USER_KEY) {
        Some(pair) => (Some(pair), false),
        None => (read_pair(store, LEGACY_TOKEN_KEY, LEGACY_USER_KEY), true),
    };
    let Some((token, user_json)) = pair else {
        return Ok(None);
    };

    let user: User = match serde_json::from_str(&user_json) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!(error = %e, "discarding malformed stored session");
            clear_session(store);
            return Err(e.into());
        }
    };
    let session = AuthSession { token, user };

    if migrated {
        tracing::info!("migrating legacy admin session keys");
        save_session(store, &session)?;
    }
    store.remove(LEGACY_TOKEN_KEY);
    store.remove(LEGACY_USER_KEY);
    Ok(Some(session))
}

pub fn save_session(store: &mut dyn SessionStore, session: &AuthSession) -> Result<(), SessionError> {
    let user_json = serde_json::to_string(&session.user)?;
    store.set(TOKEN_KEY, &session.token)?;
    store.set(USER_KEY, &user_json)?;
    Ok(())
}

/// Forget the session under both the canonical and the legacy keys.
pub fn clear_session(store: &mut dyn SessionStore) {
    for key in [TOKEN_KEY, USER_KEY, LEGACY_TOKEN_KEY, LEGACY_USER_KEY] {
        store.remove(key);
    }
}

/// In-memory store, used when browser storage is unavailable.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), SessionError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn admin() -> AuthSession {
        AuthSession {
            token: "tok-1".into(),
            user: User {
                id: "9".into(),
                name: "Ana".into(),
                email: "ana@campus.edu".into(),
                role: Role::Admin,
            },
        }
    }

    #[test]
    fn test_empty_store_has_no_session() {
        let mut store = MemoryStore::default();
        assert!(load_session(&mut store).unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::default();
        save_session(&mut store, &admin()).unwrap();
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("tok-1"));
        let loaded = load_session(&mut store).unwrap().unwrap();
        assert_eq!(loaded, admin());
        assert!(loaded.is_admin());
    }

    #[test]
    fn test_stored_user_uses_nome_key() {
        let mut store = MemoryStore::default();
        save_session(&mut store, &admin()).unwrap();
        let raw = store.get(USER_KEY).unwrap();
        assert!(raw.contains(r#""nome":"Ana""#));
    }

    #[test]
    fn test_legacy_keys_are_migrated() {
        let mut store = MemoryStore::default();
        store.set(LEGACY_TOKEN_KEY, "old-token").unwrap();
        store
            .set(
                LEGACY_USER_KEY,
                r#"{"id":1,"nome":"Root","email":"r@c.e","role":"admin"}"#,
            )
            .unwrap();

        let session = load_session(&mut store).unwrap().unwrap();
        assert_eq!(session.token, "old-token");
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("old-token"));
        assert!(store.get(USER_KEY).is_some());
        assert!(store.get(LEGACY_TOKEN_KEY).is_none());
        assert!(store.get(LEGACY_USER_KEY).is_none());
    }

    #[test]
    fn test_canonical_keys_win_over_legacy() {
        let mut store = MemoryStore::default();
        save_session(&mut store, &admin()).unwrap();
        store.set(LEGACY_TOKEN_KEY, "stale").unwrap();
        store
            .set(LEGACY_USER_KEY, r#"{"id":2,"nome":"X","email":"x@y.z"}"#)
            .unwrap();
        let session = load_session(&mut store).unwrap().unwrap();
        assert_eq!(session.token, "tok-1");
        assert!(store.get(LEGACY_TOKEN_KEY).is_none());
    }

    #[test]
    fn test_malformed_user_clears_everything() {
        let mut store = MemoryStore::default();
        store.set(TOKEN_KEY, "tok").unwrap();
        store.set(USER_KEY, "{not json").unwrap();
        assert!(matches!(
            load_session(&mut store),
            Err(SessionError::MalformedUser(_))
        ));
        assert!(store.get(TOKEN_KEY).is_none());
        assert!(store.get(USER_KEY).is_none());
    }

    #[test]
    fn test_token_without_user_is_no_session() {
        let mut store = MemoryStore::default();
        store.set(TOKEN_KEY, "tok").unwrap();
        assert!(load_session(&mut store).unwrap().is_none());
    }

    #[test]
    fn test_clear_session() {
        let mut store = MemoryStore::default();
        save_session(&mut store, &admin()).unwrap();
        clear_session(&mut store);
        assert!(load_session(&mut store).unwrap().is_none());
    }
}
