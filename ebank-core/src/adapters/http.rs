//! eBank backend HTTP client
//!
//! Thin facade over the backend's REST API: joins paths onto the base URL,
//! attaches the bearer token of the current session, and turns non-2xx
//! responses into typed errors. No retries and no timeout beyond the HTTP
//! stack's default; failures go straight back to the caller.

use std::sync::Arc;

use reqwest::header::ACCEPT;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::domain::result::{
    ApiError, ApiErrorBody, Error, Result, GENERIC_ERROR_MESSAGE, SESSION_EXPIRED_MESSAGE,
};
use crate::ports::SessionReader;

/// Pass as `body` for requests without a payload
pub const NO_BODY: Option<&()> = None;

/// Append `pairs` to `path` as an url-encoded query string
pub fn path_with_query(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        query.append_pair(key, value);
    }
    format!("{}?{}", path, query.finish())
}

/// Map a non-2xx response body to the error taxonomy
///
/// 401/403 mean the session is missing or expired. Any other status with a
/// readable `{message}` payload is a business failure, reported verbatim.
/// Anything unreadable becomes a generic transport failure.
pub(crate) fn error_from_response(status: u16, body: &str) -> Error {
    let parsed = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .filter(|b| !b.message.trim().is_empty());

    match (status, parsed) {
        (401 | 403, Some(body)) => Error::Auth(body.message),
        (401 | 403, None) => Error::Auth(SESSION_EXPIRED_MESSAGE.to_string()),
        (_, Some(body)) => Error::Domain(ApiError::from_body(status, body)),
        (_, None) => Error::Transport {
            message: GENERIC_ERROR_MESSAGE.to_string(),
            status: Some(status),
        },
    }
}

/// Authenticated client for the eBank REST API
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<dyn SessionReader>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.session.is_authenticated())
            .finish()
    }
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `http://localhost:8080/api`)
    /// that reads its bearer token from `session` on every request.
    pub fn new(base_url: &str, session: Arc<dyn SessionReader>) -> Result<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() {
            return Err(Error::Config("API base URL cannot be empty".to_string()));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::GET, path, NO_BODY).await
    }

    pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, body).await
    }

    pub async fn put<T, B>(&self, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, body).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PATCH, path, body).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request(Method::DELETE, path, NO_BODY).await
    }

    /// GET a binary document (PDF statement, spreadsheet export)
    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>> {
        let response = self.send(Method::GET, path, NO_BODY).await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(error_from_response(status.as_u16(), &text));
        }

        let bytes = response.bytes().await.map_err(map_request_error)?;
        Ok(bytes.to_vec())
    }

    /// Send a request and decode the JSON response
    pub async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(method, path, body).await?;
        let status = response.status();
        let text = response.text().await.map_err(map_request_error)?;

        if !status.is_success() {
            return Err(error_from_response(status.as_u16(), &text));
        }

        decode_body(status, &text)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Response>
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self
            .client
            .request(method.clone(), self.url(path))
            .header(ACCEPT, "application/json");

        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        debug!(%method, path, "sending request");
        let response = builder.send().await.map_err(map_request_error)?;
        debug!(%method, path, status = response.status().as_u16(), "response received");

        Ok(response)
    }
}

/// Decode a 2xx body; an empty body reads as JSON `null`
fn decode_body<T: DeserializeOwned>(status: StatusCode, text: &str) -> Result<T> {
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|e| {
        debug!(status = status.as_u16(), error = %e, "unreadable response body");
        Error::Transport {
            message: GENERIC_ERROR_MESSAGE.to_string(),
            status: Some(status.as_u16()),
        }
    })
}

/// Map request errors to user-friendly messages
fn map_request_error(error: reqwest::Error) -> Error {
    let message = if error.is_timeout() {
        "Le serveur n'a pas répondu à temps".to_string()
    } else if error.is_connect() {
        "Impossible de joindre le serveur eBank".to_string()
    } else {
        format!("Échec de la requête: {}", error)
    };
    Error::Transport {
        message,
        status: error.status().map(|s| s.as_u16()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock_backend::{MockBackend, MockRoute};
    use crate::domain::{User, UserRole};
    use crate::ports::Session;
    use serde::Deserialize;
    use serde_json::json;

    struct FixedSession(Option<Session>);

    impl SessionReader for FixedSession {
        fn current(&self) -> Option<Session> {
            self.0.clone()
        }
    }

    fn anonymous() -> Arc<dyn SessionReader> {
        Arc::new(FixedSession(None))
    }

    fn logged_in(token: &str) -> Arc<dyn SessionReader> {
        Arc::new(FixedSession(Some(Session {
            token: token.to_string(),
            user: User::new(1, "salma", UserRole::Client),
        })))
    }

    #[derive(Debug, Deserialize)]
    struct Echo {
        ok: bool,
    }

    #[test]
    fn test_reject_empty_base_url() {
        let err = ApiClient::new("  ", anonymous()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:8080/api/", anonymous()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(client.url("/comptes"), "http://localhost:8080/api/comptes");
        assert_eq!(client.url("comptes/1"), "http://localhost:8080/api/comptes/1");
    }

    #[test]
    fn test_path_with_query_encodes_values() {
        assert_eq!(path_with_query("/clients", &[]), "/clients");
        assert_eq!(
            path_with_query("/clients/search", &[("q", "Benali & fils".to_string())]),
            "/clients/search?q=Benali+%26+fils"
        );
    }

    #[test]
    fn test_error_mapping() {
        let err = error_from_response(400, r#"{"message": "Solde insuffisant"}"#);
        match err {
            Error::Domain(api) => {
                assert_eq!(api.message, "Solde insuffisant");
                assert_eq!(api.status, 400);
            }
            other => panic!("expected domain error, got {:?}", other),
        }

        assert!(matches!(
            error_from_response(401, r#"{"message": "Token expiré"}"#),
            Error::Auth(ref m) if m == "Token expiré"
        ));
        assert!(error_from_response(403, "").is_auth());
        assert!(matches!(
            error_from_response(500, "<html>oops</html>"),
            Error::Transport { status: Some(500), ref message } if message == GENERIC_ERROR_MESSAGE
        ));
        assert!(matches!(
            error_from_response(400, r#"{"message": ""}"#),
            Error::Transport { .. }
        ));
    }

    #[tokio::test]
    async fn test_bearer_token_attached() {
        let server = MockBackend::start(vec![MockRoute::json("GET", "/ping", 200, json!({"ok": true}))])
            .unwrap();

        let client = ApiClient::new(&server.base_url(), logged_in("jwt-123")).unwrap();
        let echo: Echo = client.get("/ping").await.unwrap();
        assert!(echo.ok);

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].header("authorization"), Some("Bearer jwt-123"));
    }

    #[tokio::test]
    async fn test_no_bearer_token_when_anonymous() {
        let server = MockBackend::start(vec![MockRoute::json("GET", "/ping", 200, json!({"ok": true}))])
            .unwrap();

        let client = ApiClient::new(&server.base_url(), anonymous()).unwrap();
        let _: Echo = client.get("/ping").await.unwrap();

        assert_eq!(server.requests()[0].header("authorization"), None);
    }

    #[tokio::test]
    async fn test_json_body_sent() {
        let server = MockBackend::start(vec![MockRoute::json("PUT", "/items/3", 200, json!({"ok": true}))])
            .unwrap();

        let client = ApiClient::new(&server.base_url(), anonymous()).unwrap();
        let _: Echo = client
            .put("/items/3", Some(&json!({"nom": "Alami"})))
            .await
            .unwrap();

        let request = &server.requests()[0];
        assert_eq!(request.method, "PUT");
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.json(), json!({"nom": "Alami"}));
    }

    #[tokio::test]
    async fn test_backend_message_surfaces_as_domain_error() {
        let server = MockBackend::start(vec![MockRoute::json(
            "POST",
            "/operations/retrait",
            400,
            json!({"message": "Solde insuffisant"}),
        )])
        .unwrap();

        let client = ApiClient::new(&server.base_url(), logged_in("t")).unwrap();
        let err = client
            .post::<serde_json::Value, _>("/operations/retrait", Some(&json!({"compteId": 1})))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Solde insuffisant");
        assert_eq!(err.api_error().map(|e| e.status), Some(400));
    }

    #[tokio::test]
    async fn test_unauthorized_is_auth_error() {
        let server = MockBackend::start(vec![MockRoute::json(
            "GET",
            "/comptes",
            401,
            json!({"message": "Token invalide"}),
        )])
        .unwrap();

        let client = ApiClient::new(&server.base_url(), logged_in("stale")).unwrap();
        let err = client.get::<serde_json::Value>("/comptes").await.unwrap_err();
        assert!(err.is_auth());
        assert_eq!(err.to_string(), "Token invalide");
    }

    #[tokio::test]
    async fn test_unparseable_success_body_is_transport_error() {
        let server = MockBackend::start(vec![MockRoute::raw(
            "GET",
            "/comptes",
            200,
            "text/html",
            "<html></html>",
        )])
        .unwrap();

        let client = ApiClient::new(&server.base_url(), anonymous()).unwrap();
        let err = client.get::<Vec<serde_json::Value>>("/comptes").await.unwrap_err();
        assert!(matches!(err, Error::Transport { status: Some(200), .. }));
    }

    #[tokio::test]
    async fn test_empty_body_reads_as_unit() {
        let server = MockBackend::start(vec![MockRoute::raw("POST", "/auth/change-password", 200, "application/json", "")])
            .unwrap();

        let client = ApiClient::new(&server.base_url(), logged_in("t")).unwrap();
        let result: Result<()> = client.post("/auth/change-password", NO_BODY).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let server = MockBackend::start(vec![]).unwrap();

        let client = ApiClient::new(&server.base_url(), anonymous()).unwrap();
        let err = client.get::<serde_json::Value>("/nowhere").await.unwrap_err();
        assert_eq!(
            err.api_error().map(|e| e.kind()),
            Some(crate::domain::result::DomainErrorKind::NotFound)
        );
    }

    #[tokio::test]
    async fn test_get_bytes() {
        let server = MockBackend::start(vec![MockRoute::raw(
            "GET",
            "/operations/releve/1",
            200,
            "application/pdf",
            b"%PDF-1.4 fake".to_vec(),
        )])
        .unwrap();

        let client = ApiClient::new(&server.base_url(), logged_in("t")).unwrap();
        let bytes = client
            .get_bytes("/operations/releve/1?dateDebut=2024-01-01")
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(server.requests()[0].query.as_deref(), Some("dateDebut=2024-01-01"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Grab a free port, then close it so nothing is listening
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let client = ApiClient::new(&format!("http://127.0.0.1:{}", port), anonymous()).unwrap();
        let err = client.get::<serde_json::Value>("/comptes").await.unwrap_err();
        assert!(matches!(err, Error::Transport { status: None, .. }));
    }
}
