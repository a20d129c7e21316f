use thiserror::Error;

use crate::api::{ApiClient, ApiError};
use crate::session::SessionStore;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("failed to store session: {0}")]
    Storage(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

/// Login/registration form state. Two modes, toggled freely, starting in
/// Login; the server is the validation authority, the client only checks
/// that required fields are present before spending a request.
#[derive(Debug, Clone)]
pub struct AuthFlow {
    mode: AuthMode,
    pub name: String,
    pub email: String,
    pub password: String,
}

impl Default for AuthFlow {
    fn default() -> Self {
        Self {
            mode: AuthMode::Login,
            name: String::new(),
            email: String::new(),
            password: String::new(),
        }
    }
}

impl AuthFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
    }

    /// Submit the form. On success the returned token is written through the
    /// session store; on failure session state is left untouched.
    pub async fn submit(
        &self,
        api: &ApiClient,
        session: &mut SessionStore,
    ) -> Result<(), AuthError> {
        if self.email.trim().is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if self.password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        let token = match self.mode {
            AuthMode::Login => api.login(&self.email, &self.password).await?,
            AuthMode::Register => {
                if self.name.trim().is_empty() {
                    return Err(AuthError::MissingField("name"));
                }
                api.register(&self.name, &self.email, &self.password).await?
            }
        };

        session.set_token(token)?;
        log::info!("authenticated as {}", self.email);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_in(dir: &tempfile::TempDir) -> SessionStore {
        SessionStore::load(dir.path().join("token"))
    }

    #[test]
    fn starts_in_login_mode_and_toggles() {
        let mut flow = AuthFlow::new();
        assert_eq!(flow.mode(), AuthMode::Login);
        flow.toggle_mode();
        assert_eq!(flow.mode(), AuthMode::Register);
        flow.toggle_mode();
        assert_eq!(flow.mode(), AuthMode::Login);
    }

    #[tokio::test]
    async fn login_stores_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(serde_json::json!({
                "email": "a@b.c",
                "password": "hunter2",
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "tok-1"})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(&dir);
        let api = ApiClient::new(&server.uri()).unwrap();

        let mut flow = AuthFlow::new();
        flow.email = "a@b.c".into();
        flow.password = "hunter2".into();
        flow.submit(&api, &mut session).await.unwrap();

        assert_eq!(session.token(), Some("tok-1"));
    }

    #[tokio::test]
    async fn register_sends_name_and_stores_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/register"))
            .and(body_json(serde_json::json!({
                "name": "Ada",
                "email": "ada@b.c",
                "password": "hunter2",
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(serde_json::json!({"token": "tok-2"})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(&dir);
        let api = ApiClient::new(&server.uri()).unwrap();

        let mut flow = AuthFlow::new();
        flow.toggle_mode();
        flow.name = "Ada".into();
        flow.email = "ada@b.c".into();
        flow.password = "hunter2".into();
        flow.submit(&api, &mut session).await.unwrap();

        assert_eq!(session.token(), Some("tok-2"));
    }

    #[tokio::test]
    async fn missing_fields_never_hit_the_network() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(&dir);
        let api = ApiClient::new(&server.uri()).unwrap();

        let flow = AuthFlow::new();
        let err = flow.submit(&api, &mut session).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingField("email")));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_login_leaves_session_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"message": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(&dir);
        let api = ApiClient::new(&server.uri()).unwrap();

        let mut flow = AuthFlow::new();
        flow.email = "a@b.c".into();
        flow.password = "wrong".into();
        let err = flow.submit(&api, &mut session).await.unwrap_err();

        assert!(matches!(err, AuthError::Api(ApiError::Auth { .. })));
        assert!(session.token().is_none());
    }
}
