//! Session store: who is signed in, and the login/logout lifecycle.

use crate::domain::{LoginResponse, UserProfile};
use crate::infrastructure::{KeyValueStorage, StorageWriter};

/// Well-known durable-storage key for the bearer token.
pub const TOKEN_STORAGE_KEY: &str = "token";
/// Well-known durable-storage key for the signed-in user's profile.
pub const USER_STORAGE_KEY: &str = "user";

/// Owns the signed-in user, bearer token, and request progress flags.
///
/// A successful login persists the token and profile so the session
/// survives process restarts; logout erases both keys. Token refresh is a
/// host concern and not handled here.
pub struct SessionStore {
    user: Option<UserProfile>,
    token: Option<String>,
    is_loading: bool,
    error: Option<String>,
    is_authenticated: bool,
    writer: StorageWriter,
}

impl SessionStore {
    /// Creates a signed-out session store.
    pub fn new(writer: StorageWriter) -> Self {
        Self {
            user: None,
            token: None,
            is_loading: false,
            error: None,
            is_authenticated: false,
            writer,
        }
    }

    /// Rehydrates the session from storage at startup.
    ///
    /// The session is restored only when both the token and a parseable
    /// profile are present; anything else yields the signed-out state
    /// without error. Read path only, nothing is written back.
    pub fn restore_from(storage: &dyn KeyValueStorage, writer: StorageWriter) -> Self {
        let mut store = Self::new(writer);

        let token = storage.get(TOKEN_STORAGE_KEY).ok().flatten();
        let user_json = storage.get(USER_STORAGE_KEY).ok().flatten();

        if let (Some(token), Some(user_json)) = (token, user_json) {
            match serde_json::from_str::<UserProfile>(&user_json) {
                Ok(user) => {
                    store.user = Some(user);
                    store.token = Some(token);
                    store.is_authenticated = true;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "discarding malformed persisted profile");
                }
            }
        }

        store
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Marks a login request as in flight.
    pub fn begin_login(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Applies the outcome of a login request.
    ///
    /// Success authenticates the session and persists the token and
    /// profile; failure records the message and leaves storage untouched.
    pub fn set_login_result(&mut self, result: Result<LoginResponse, String>) {
        self.is_loading = false;
        match result {
            Ok(response) => {
                self.writer.set(TOKEN_STORAGE_KEY, response.token.clone());
                match serde_json::to_string(&response.user) {
                    Ok(json) => self.writer.set(USER_STORAGE_KEY, json),
                    Err(e) => tracing::error!(error = %e, "failed to serialize user profile"),
                }
                self.user = Some(response.user);
                self.token = Some(response.token);
                self.is_authenticated = true;
                self.error = None;
            }
            Err(message) => {
                self.error = Some(message);
                self.is_authenticated = false;
            }
        }
    }

    /// Applies the outcome of a profile refresh; the in-memory profile is
    /// replaced on success.
    pub fn set_profile_result(&mut self, result: Result<UserProfile, String>) {
        match result {
            Ok(profile) => self.user = Some(profile),
            Err(message) => self.error = Some(message),
        }
    }

    /// Signs out: clears the session and erases both persisted keys.
    pub fn logout(&mut self) {
        self.user = None;
        self.token = None;
        self.is_authenticated = false;
        self.error = None;
        self.writer.remove(TOKEN_STORAGE_KEY);
        self.writer.remove(USER_STORAGE_KEY);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryStorage;
    use std::sync::Arc;

    fn profile() -> UserProfile {
        UserProfile {
            id: 1,
            username: "emilys".to_string(),
            email: "emily.johnson@x.dummyjson.com".to_string(),
            first_name: "Emily".to_string(),
            last_name: "Johnson".to_string(),
            gender: "female".to_string(),
            image: String::new(),
        }
    }

    fn login_response() -> LoginResponse {
        LoginResponse {
            user: profile(),
            token: "header.payload.signature".to_string(),
        }
    }

    #[test]
    fn test_begin_login_sets_loading_and_clears_error() {
        let writer = StorageWriter::spawn(Arc::new(MemoryStorage::new()));
        let mut session = SessionStore::new(writer);
        session.set_login_result(Err("Login failed".to_string()));

        session.begin_login();
        assert!(session.is_loading());
        assert_eq!(session.error(), None);
    }

    #[test]
    fn test_login_success_authenticates_and_persists() {
        let storage = Arc::new(MemoryStorage::new());
        let writer = StorageWriter::spawn(storage.clone());
        let mut session = SessionStore::new(writer.clone());

        session.begin_login();
        session.set_login_result(Ok(login_response()));
        writer.flush();

        assert!(session.is_authenticated());
        assert!(!session.is_loading());
        assert_eq!(session.token(), Some("header.payload.signature"));
        assert_eq!(session.user().unwrap().username, "emilys");

        assert_eq!(
            storage.get(TOKEN_STORAGE_KEY).unwrap().as_deref(),
            Some("header.payload.signature")
        );
        let persisted: UserProfile =
            serde_json::from_str(&storage.get(USER_STORAGE_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted, profile());
    }

    #[test]
    fn test_login_failure_records_error_and_persists_nothing() {
        let storage = Arc::new(MemoryStorage::new());
        let writer = StorageWriter::spawn(storage.clone());
        let mut session = SessionStore::new(writer.clone());

        session.begin_login();
        session.set_login_result(Err("Invalid credentials".to_string()));
        writer.flush();

        assert!(!session.is_authenticated());
        assert_eq!(session.error(), Some("Invalid credentials"));
        assert_eq!(storage.get(TOKEN_STORAGE_KEY).unwrap(), None);
        assert_eq!(storage.get(USER_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_logout_clears_state_and_erases_keys() {
        let storage = Arc::new(MemoryStorage::new());
        let writer = StorageWriter::spawn(storage.clone());
        let mut session = SessionStore::new(writer.clone());

        session.set_login_result(Ok(login_response()));
        writer.flush();

        session.logout();
        writer.flush();

        assert!(!session.is_authenticated());
        assert_eq!(session.user(), None);
        assert_eq!(session.token(), None);
        assert_eq!(storage.get(TOKEN_STORAGE_KEY).unwrap(), None);
        assert_eq!(storage.get(USER_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_restore_round_trips_persisted_session() {
        let storage = Arc::new(MemoryStorage::new());
        let writer = StorageWriter::spawn(storage.clone());
        let mut session = SessionStore::new(writer.clone());
        session.set_login_result(Ok(login_response()));
        writer.flush();

        let restored =
            SessionStore::restore_from(storage.as_ref(), StorageWriter::spawn(storage.clone()));

        assert!(restored.is_authenticated());
        assert_eq!(restored.token(), Some("header.payload.signature"));
        assert_eq!(restored.user().unwrap().first_name, "Emily");
    }

    #[test]
    fn test_restore_with_token_but_no_user_stays_signed_out() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_STORAGE_KEY, "orphan-token").unwrap();

        let restored =
            SessionStore::restore_from(storage.as_ref(), StorageWriter::spawn(storage.clone()));

        assert!(!restored.is_authenticated());
        assert_eq!(restored.token(), None);
    }

    #[test]
    fn test_restore_with_malformed_profile_stays_signed_out() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(TOKEN_STORAGE_KEY, "token").unwrap();
        storage.set(USER_STORAGE_KEY, "not json").unwrap();

        let restored =
            SessionStore::restore_from(storage.as_ref(), StorageWriter::spawn(storage.clone()));

        assert!(!restored.is_authenticated());
        assert_eq!(restored.user(), None);
    }

    #[test]
    fn test_profile_refresh_replaces_user() {
        let writer = StorageWriter::spawn(Arc::new(MemoryStorage::new()));
        let mut session = SessionStore::new(writer);
        session.set_login_result(Ok(login_response()));

        let mut refreshed = profile();
        refreshed.image = "https://dummyjson.com/icon/emilys/128".to_string();
        session.set_profile_result(Ok(refreshed.clone()));

        assert_eq!(session.user(), Some(&refreshed));
    }
}
