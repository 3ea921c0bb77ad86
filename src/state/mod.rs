pub(crate) mod location_form;
pub(crate) mod location_list;
pub(crate) mod login;

use crate::api::ApiClient;
use crate::storage::{BrowserStorage, Session, SessionStore};
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,

    /// Present while signed in. Written only through `sign_in` and `sign_out`.
    pub session: RwSignal<Option<Session>>,

    pub session_store: SessionStore<BrowserStorage>,
}

impl AppState {
    pub fn new() -> Self {
        let session_store = SessionStore::new(BrowserStorage);
        let session = session_store.load();
        let api_client = ApiClient::from_env(session.as_ref().map(|s| s.token.clone()));

        Self {
            api_client: RwSignal::new(api_client),
            session: RwSignal::new(session),
            session_store,
        }
    }

    /// Tracked read, for route guards. The stored session and the client's
    /// bearer token must agree.
    pub fn is_authenticated(&self) -> bool {
        self.session.with(|s| s.is_some()) && self.api_client.with(|c| c.is_authenticated())
    }

    /// Adopt a session that has already been persisted.
    pub fn sign_in(&self, session: Session) {
        let token = session.token.clone();
        self.api_client.update(|c| c.set_token(Some(token)));
        self.session.set(Some(session));
    }

    pub fn sign_out(&self) {
        self.session_store.clear();
        self.api_client.update(|c| c.set_token(None));
        self.session.set(None);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
