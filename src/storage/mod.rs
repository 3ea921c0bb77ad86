use crate::models::AdminUser;

pub(crate) const TOKEN_KEY: &str = "token";
pub(crate) const USER_KEY: &str = "user";

/// Durable key/value storage backing the session.
pub(crate) trait SessionStorage {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `window.localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserStorage;

impl BrowserStorage {
    fn local_storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

impl SessionStorage for BrowserStorage {
    fn read(&self, key: &str) -> Option<String> {
        Self::local_storage()?.get_item(key).ok().flatten()
    }

    fn write(&self, key: &str, value: &str) {
        if let Some(storage) = Self::local_storage() {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// Proof of authentication: bearer token plus the signed-in admin.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Session {
    pub token: String,
    pub user: Option<AdminUser>,
}

/// Reads and writes the persisted [`Session`]. Never expires it on its own.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct SessionStore<S> {
    storage: S,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn load(&self) -> Option<Session> {
        let token = self
            .storage
            .read(TOKEN_KEY)
            .filter(|t| !t.trim().is_empty())?;
        let user = self
            .storage
            .read(USER_KEY)
            .and_then(|json| serde_json::from_str::<AdminUser>(&json).ok());

        Some(Session { token, user })
    }

    pub fn save(&self, session: &Session) {
        self.storage.write(TOKEN_KEY, &session.token);
        match session.user.as_ref().and_then(|u| serde_json::to_string(u).ok()) {
            Some(json) => self.storage.write(USER_KEY, &json),
            None => self.storage.remove(USER_KEY),
        }
    }

    pub fn clear(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
    }
}
