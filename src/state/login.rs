use crate::api::{ApiResult, LoginRequest, LoginResponse};
use crate::storage::{Session, SessionStorage, SessionStore};

const LOGIN_FAILED: &str = "Login failed";

#[derive(Clone, Debug, Default)]
pub(crate) struct LoginForm {
    pub email: String,
    pub password: String,
    pub show_password: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn toggle_password(&mut self) {
        self.show_password = !self.show_password;
    }

    pub fn password_input_type(&self) -> &'static str {
        if self.show_password {
            "text"
        } else {
            "password"
        }
    }

    /// `None` while a request is already in flight.
    pub fn begin_submit(&mut self) -> Option<LoginRequest> {
        if self.loading {
            return None;
        }
        self.loading = true;
        self.error = None;
        Some(LoginRequest {
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }

    /// Persists the session on success. On failure nothing is written and the
    /// server's message (or a generic one) is shown.
    pub fn finish_submit<S: SessionStorage>(
        &mut self,
        result: ApiResult<LoginResponse>,
        store: &SessionStore<S>,
    ) -> Option<Session> {
        self.loading = false;
        match result {
            Ok(res) if !res.token.trim().is_empty() => {
                let session = Session {
                    token: res.token,
                    user: res.data,
                };
                store.save(&session);
                Some(session)
            }
            Ok(_) => {
                self.error = Some(LOGIN_FAILED.to_string());
                None
            }
            Err(e) => {
                self.error = Some(e.describe(LOGIN_FAILED, LOGIN_FAILED));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::models::AdminUser;
    use crate::storage::memory::MemoryStorage;
    use pretty_assertions::assert_eq;

    fn form() -> LoginForm {
        LoginForm {
            email: " admin@ktp.test ".to_string(),
            password: "secret".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn password_toggle_switches_input_type() {
        let mut f = LoginForm::default();
        assert_eq!(f.password_input_type(), "password");
        f.toggle_password();
        assert_eq!(f.password_input_type(), "text");
        f.toggle_password();
        assert_eq!(f.password_input_type(), "password");
    }

    #[test]
    fn begin_submit_trims_email_and_blocks_reentry() {
        let mut f = form();
        let req = f.begin_submit().expect("first submit");
        assert_eq!(req.email, "admin@ktp.test");
        assert_eq!(req.password, "secret");
        assert!(f.loading);
        assert!(f.begin_submit().is_none());
    }

    #[test]
    fn success_persists_session() {
        let storage = MemoryStorage::default();
        let store = SessionStore::new(storage.clone());
        let mut f = form();
        f.begin_submit();

        let session = f
            .finish_submit(
                Ok(LoginResponse {
                    token: "jwt".to_string(),
                    data: Some(AdminUser {
                        extra: serde_json::json!({"email": "admin@ktp.test"}),
                    }),
                }),
                &store,
            )
            .expect("session");

        assert_eq!(session.token, "jwt");
        assert!(!f.loading);
        assert!(f.error.is_none());
        assert_eq!(store.load(), Some(session));
    }

    #[test]
    fn rejected_credentials_show_server_message_and_persist_nothing() {
        let storage = MemoryStorage::default();
        let store = SessionStore::new(storage.clone());
        let mut f = form();
        f.begin_submit();

        let err = ApiError::from_failure(401, r#"{"message":"Invalid credentials"}"#);
        assert!(f.finish_submit(Err(err), &store).is_none());

        assert_eq!(f.error.as_deref(), Some("Invalid credentials"));
        assert!(!f.loading);
        assert_eq!(storage.len(), 0);
    }

    #[test]
    fn unreachable_server_uses_generic_message() {
        let store = SessionStore::new(MemoryStorage::default());
        let mut f = form();
        f.begin_submit();

        f.finish_submit(Err(ApiError::Network("refused".to_string())), &store);
        assert_eq!(f.error.as_deref(), Some("Login failed"));
    }

    #[test]
    fn empty_token_is_a_failure() {
        let storage = MemoryStorage::default();
        let store = SessionStore::new(storage.clone());
        let mut f = form();
        f.begin_submit();

        let out = f.finish_submit(
            Ok(LoginResponse {
                token: String::new(),
                data: None,
            }),
            &store,
        );
        assert!(out.is_none());
        assert_eq!(f.error.as_deref(), Some("Login failed"));
        assert_eq!(storage.len(), 0);
    }
}
