//! Auth service - login, registration and token lifecycle

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::adapters::http::{ApiClient, NO_BODY};
use crate::domain::requests::{ChangePasswordRequest, LoginRequest, RegisterRequest};
use crate::domain::responses::{AuthResponse, RegisterResponse, TokenResponse};
use crate::domain::result::{Error, Result, SESSION_EXPIRED_MESSAGE};
use crate::domain::User;
use crate::ports::{Session, SessionReader};

use super::SessionStore;

#[derive(Clone)]
pub struct AuthService {
    api: Arc<ApiClient>,
    session: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(api: Arc<ApiClient>, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    /// Authenticate and open a session
    pub async fn login(&self, request: LoginRequest) -> Result<User> {
        debug!(username = request.username(), "logging in");
        let auth: AuthResponse = self.api.post("/auth/login", Some(&request)).await?;
        let session = self.session.login(auth)?;
        Ok(session.user)
    }

    /// Create a client portal account; does not log in
    pub async fn register(&self, request: RegisterRequest) -> Result<RegisterResponse> {
        let response: RegisterResponse = self.api.post("/auth/register", Some(&request)).await?;
        info!(user_id = response.user_id, "user registered");
        Ok(response)
    }

    /// Exchange the current token for a fresh one, keeping the same user
    pub async fn refresh(&self) -> Result<Session> {
        let user = self
            .session
            .user()
            .ok_or_else(|| Error::Auth(SESSION_EXPIRED_MESSAGE.to_string()))?;

        let response: TokenResponse = self.api.post("/auth/refresh", NO_BODY).await?;
        self.session.login(AuthResponse {
            token: response.token,
            user,
        })
    }

    /// Ask the backend whether the current token is still accepted
    ///
    /// Any failure, including having no token at all, reads as `false`.
    pub async fn validate_token(&self) -> bool {
        if !self.session.is_authenticated() {
            return false;
        }
        match self.api.get::<JsonValue>("/auth/validate").await {
            Ok(JsonValue::Bool(valid)) => valid,
            Ok(JsonValue::Object(map)) => map
                .get("valid")
                .and_then(JsonValue::as_bool)
                .unwrap_or(false),
            Ok(_) => false,
            Err(e) => {
                debug!(error = %e, "token validation failed");
                false
            }
        }
    }

    pub async fn change_password(&self, request: ChangePasswordRequest) -> Result<()> {
        let _: JsonValue = self
            .api
            .post("/auth/change-password", Some(&request))
            .await?;
        info!("password changed");
        Ok(())
    }

    /// Local only: forget the token and user
    pub fn logout(&self) -> Result<()> {
        self.session.logout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock_backend::{MockBackend, MockRoute};
    use crate::domain::requests::Registration;
    use crate::domain::UserRole;
    use crate::services::test_support::{anonymous_api, logged_in_api};
    use serde_json::json;

    fn service(api: Arc<ApiClient>, session: Arc<SessionStore>) -> AuthService {
        AuthService::new(api, session)
    }

    #[tokio::test]
    async fn test_login_opens_session() {
        let server = MockBackend::start(vec![MockRoute::json(
            "POST",
            "/auth/login",
            200,
            json!({
                "token": "jwt-abc",
                "user": {"id": 4, "username": "nadia", "role": "AGENT", "nom": "Tazi", "prenom": "Nadia"}
            }),
        )])
        .unwrap();
        let (api, session) = anonymous_api(&server);
        let auth = service(api, session.clone());

        let user = auth
            .login(LoginRequest::new("nadia", "secret").unwrap())
            .await
            .unwrap();

        assert_eq!(user.role, UserRole::Agent);
        assert_eq!(user.display_name(), "Nadia Tazi");
        assert_eq!(session.token().as_deref(), Some("jwt-abc"));

        let sent = &server.requests()[0];
        assert_eq!(sent.json(), json!({"username": "nadia", "password": "secret"}));
        assert_eq!(sent.header("authorization"), None);
    }

    #[tokio::test]
    async fn test_login_rejected_keeps_anonymous() {
        let server = MockBackend::start(vec![MockRoute::json(
            "POST",
            "/auth/login",
            401,
            json!({"message": "Nom d'utilisateur ou mot de passe incorrect"}),
        )])
        .unwrap();
        let (api, session) = anonymous_api(&server);

        let err = service(api, session.clone())
            .login(LoginRequest::new("nadia", "wrong").unwrap())
            .await
            .unwrap_err();

        assert!(err.is_auth());
        assert_eq!(err.to_string(), "Nom d'utilisateur ou mot de passe incorrect");
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_register() {
        let server = MockBackend::start(vec![MockRoute::json(
            "POST",
            "/auth/register",
            201,
            json!({"message": "Inscription réussie", "userId": 12}),
        )])
        .unwrap();
        let (api, session) = anonymous_api(&server);

        let request = RegisterRequest::new(Registration {
            username: "omar".into(),
            password: "pw".into(),
            email: "omar@ebank.ma".into(),
            last_name: "Fassi".into(),
            first_name: "Omar".into(),
            phone: "0711223344".into(),
        })
        .unwrap();
        let response = service(api, session.clone()).register(request).await.unwrap();

        assert_eq!(response.user_id, 12);
        assert!(!session.is_authenticated());
        assert_eq!(server.requests()[0].json()["telephone"], "0711223344");
    }

    #[tokio::test]
    async fn test_refresh_replaces_token_and_keeps_user() {
        let server = MockBackend::start(vec![MockRoute::json(
            "POST",
            "/auth/refresh",
            200,
            json!({"token": "fresh"}),
        )])
        .unwrap();
        let (api, session) = logged_in_api(&server, UserRole::Client);
        let before = session.user();

        let refreshed = service(api, session.clone()).refresh().await.unwrap();

        assert_eq!(refreshed.token, "fresh");
        assert_eq!(session.user(), before);
        assert_eq!(
            server.requests()[0].header("authorization"),
            Some("Bearer test-token")
        );
    }

    #[tokio::test]
    async fn test_refresh_requires_session() {
        let server = MockBackend::start(vec![]).unwrap();
        let (api, session) = anonymous_api(&server);

        let err = service(api, session).refresh().await.unwrap_err();
        assert!(err.is_auth());
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_validate_token() {
        let server = MockBackend::start(vec![MockRoute::json("GET", "/auth/validate", 200, json!(true))])
            .unwrap();
        let (api, session) = logged_in_api(&server, UserRole::Client);
        assert!(service(api, session).validate_token().await);

        let server = MockBackend::start(vec![MockRoute::json(
            "GET",
            "/auth/validate",
            401,
            json!({"message": "Token expiré"}),
        )])
        .unwrap();
        let (api, session) = logged_in_api(&server, UserRole::Client);
        assert!(!service(api, session).validate_token().await);
    }

    #[tokio::test]
    async fn test_validate_without_session_skips_backend() {
        let server = MockBackend::start(vec![MockRoute::json("GET", "/auth/validate", 200, json!(true))])
            .unwrap();
        let (api, session) = anonymous_api(&server);

        assert!(!service(api, session).validate_token().await);
        assert!(server.requests().is_empty());
    }

    #[tokio::test]
    async fn test_change_password() {
        let server = MockBackend::start(vec![MockRoute::json(
            "POST",
            "/auth/change-password",
            200,
            json!({"message": "Mot de passe modifié"}),
        )])
        .unwrap();
        let (api, session) = logged_in_api(&server, UserRole::Client);

        service(api, session)
            .change_password(ChangePasswordRequest::new("old", "new").unwrap())
            .await
            .unwrap();

        assert_eq!(
            server.requests()[0].json(),
            json!({"oldPassword": "old", "newPassword": "new"})
        );
    }

    #[tokio::test]
    async fn test_logout_is_local() {
        let server = MockBackend::start(vec![]).unwrap();
        let (api, session) = logged_in_api(&server, UserRole::Admin);

        service(api, session.clone()).logout().unwrap();
        assert!(!session.is_authenticated());
        assert!(server.requests().is_empty());
    }
}
