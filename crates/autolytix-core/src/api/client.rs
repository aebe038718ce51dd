//! API client for the Autolytix REST backend.
//!
//! Every request goes through the `RequestAuthorizer`: public endpoints are
//! sent as-is, protected ones carry the stored bearer token, an expired token
//! fails the call before anything is sent, and a 401 on a protected call
//! ends the session.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::authorizer::RequestAuthorizer;
use super::ApiError;
use crate::auth::SessionManager;
use crate::models::LoginResponse;

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the Autolytix backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Arc<str>,
    session: Arc<SessionManager>,
    authorizer: RequestAuthorizer,
}

impl ApiClient {
    /// Create a client for the backend at `base_url` bound to `session`.
    pub fn new(base_url: &str, session: Arc<SessionManager>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            authorizer: RequestAuthorizer::new(session.clone()),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one request through the authorizer.
    ///
    /// `configure` adds the query and body. The response is returned only if
    /// its status is a success.
    async fn send<F>(&self, method: Method, path: &str, configure: F) -> Result<Response>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = self.url(path);
        let authorization = self.authorizer.authorize(&url)?;

        let mut request = configure(self.client.request(method.clone(), &url));
        if let Some(token) = authorization.token() {
            request = request.bearer_auth(token);
        }

        debug!(method = %method, url = %url, protected = authorization.is_protected(), "API request");
        let response = request
            .send()
            .await
            .map_err(ApiError::from_transport)
            .with_context(|| format!("Failed to send {} request to {}", method, url))?;

        debug!(status = response.status().as_u16(), url = %url, "API response");
        self.authorizer.observe(&authorization, response.status());
        Self::check_response(response).await
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(ApiError::from_transport)
            .with_context(|| format!("Failed to read response body from {}", url))?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))
            .with_context(|| format!("Failed to parse JSON response from {}", url))
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.send(Method::GET, path, |r| r).await?;
        Self::read_json(response).await
    }

    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let response = self.send(Method::GET, path, |r| r.query(query)).await?;
        Self::read_json(response).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let response = self.send(Method::POST, path, |r| r.json(body)).await?;
        Self::read_json(response).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let response = self.send(Method::PUT, path, |r| r.json(body)).await?;
        Self::read_json(response).await
    }

    /// DELETE with no meaningful response body.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, path, |r| r).await?;
        Ok(())
    }

    /// POST to a login-style endpoint and store the token it hands out,
    /// taken from the body or else from the `Authorization` header.
    pub(crate) async fn post_for_session<B: Serialize>(&self, path: &str, body: &B) -> Result<LoginResponse> {
        let response = self.send(Method::POST, path, |r| r.json(body)).await?;
        let header_token = response
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let login: LoginResponse = Self::read_json(response).await?;
        self.session
            .store_login_token(login.token.as_deref(), header_token.as_deref())?;
        Ok(login)
    }

    /// Public health check.
    pub async fn health(&self) -> Result<serde_json::Value> {
        self.get("/api/health").await.context("Health check failed")
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use axum::extract::State;
    use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
    use axum::response::IntoResponse;
    use axum::Router;
    use tokio::net::TcpListener;

    use crate::auth::token::tests::token_expiring_in;
    use crate::auth::{TOKEN_KEY, USER_KEY};
    use crate::models::UserProfile;
    use crate::navigation::tests::RecordingNavigator;
    use crate::navigation::Route;
    use crate::storage::{KeyValueStore, MemoryStore};

    /// A request as seen by the stub server.
    #[derive(Debug, Clone)]
    pub(crate) struct RecordedRequest {
        pub method: String,
        pub target: String,
        pub headers: HeaderMap,
        pub body: String,
    }

    impl RecordedRequest {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers.get(name).and_then(|v| v.to_str().ok())
        }

        pub fn json(&self) -> serde_json::Value {
            serde_json::from_str(&self.body).unwrap()
        }
    }

    #[derive(Debug, Clone)]
    pub(crate) struct StubResponse {
        status: StatusCode,
        headers: HeaderMap,
        body: String,
    }

    impl StubResponse {
        pub fn json(status: u16, body: serde_json::Value) -> Self {
            Self::text(status, &body.to_string())
        }

        pub fn text(status: u16, body: &str) -> Self {
            let mut headers = HeaderMap::new();
            headers.insert(
                axum::http::header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            Self {
                status: StatusCode::from_u16(status).unwrap(),
                headers,
                body: body.to_string(),
            }
        }

        pub fn with_header(mut self, name: &str, value: &str) -> Self {
            self.headers.insert(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
            self
        }
    }

    struct StubState {
        responses: Vec<StubResponse>,
        requests: Mutex<Vec<RecordedRequest>>,
        hits: AtomicUsize,
    }

    /// Records every request and answers with the next canned response,
    /// repeating the last one once the list runs out.
    async fn record(
        State(state): State<Arc<StubState>>,
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: String,
    ) -> impl IntoResponse {
        let index = state.hits.fetch_add(1, Ordering::SeqCst);
        state.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            target: uri.path_and_query().map(|p| p.to_string()).unwrap_or_default(),
            headers,
            body,
        });
        let response = state.responses[index.min(state.responses.len() - 1)].clone();
        (response.status, response.headers, response.body)
    }

    /// Local backend stand-in served by axum on an ephemeral port.
    pub(crate) struct StubServer {
        pub base_url: String,
        state: Arc<StubState>,
    }

    impl StubServer {
        pub async fn start(responses: Vec<StubResponse>) -> Self {
            let state = Arc::new(StubState {
                responses,
                requests: Mutex::new(Vec::new()),
                hits: AtomicUsize::new(0),
            });
            let app = Router::new().fallback(record).with_state(state.clone());

            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let base_url = format!("http://{}", listener.local_addr().unwrap());
            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            Self { base_url, state }
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.state.requests.lock().unwrap().clone()
        }

        /// Requests that reached the server.
        pub fn hits(&self) -> usize {
            self.state.hits.load(Ordering::SeqCst)
        }
    }

    pub(crate) struct Harness {
        pub client: ApiClient,
        pub storage: Arc<MemoryStore>,
        pub navigator: Arc<RecordingNavigator>,
    }

    /// Client against `base_url` with a signed-in user if `token` is given.
    pub(crate) fn harness(base_url: &str, token: Option<String>) -> Harness {
        let storage = Arc::new(MemoryStore::new());
        if let Some(token) = token {
            storage.set(TOKEN_KEY, &token).unwrap();
            let user = UserProfile {
                id: 1,
                first_name: "Ana".to_string(),
                last_name: "García".to_string(),
                email: "ana@example.com".to_string(),
                phone: None,
                created_at: None,
            };
            storage
                .set(USER_KEY, &serde_json::to_string(&user).unwrap())
                .unwrap();
        }
        let navigator = Arc::new(RecordingNavigator::default());
        let session = Arc::new(SessionManager::new(storage.clone(), navigator.clone()));
        Harness {
            client: ApiClient::new(base_url, session).unwrap(),
            storage,
            navigator,
        }
    }

    fn api_error(err: &anyhow::Error) -> &ApiError {
        err.downcast_ref::<ApiError>().unwrap()
    }

    #[tokio::test]
    async fn test_protected_request_carries_bearer_token() {
        let server = StubServer::start(vec![StubResponse::json(200, serde_json::json!({"ok": true}))]).await;
        let token = token_expiring_in(3600);
        let h = harness(&server.base_url, Some(token.clone()));

        let _: serde_json::Value = h.client.get("/api/vehiculos/1").await.unwrap();

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        let expected = format!("Bearer {}", token);
        assert_eq!(requests[0].header("authorization"), Some(expected.as_str()));
    }

    #[tokio::test]
    async fn test_public_request_has_no_authorization_header() {
        let server = StubServer::start(vec![StubResponse::json(200, serde_json::json!({"status": "UP"}))]).await;
        let h = harness(&server.base_url, Some(token_expiring_in(3600)));

        let health = h.client.health().await.unwrap();
        assert_eq!(health["status"], "UP");
        assert_eq!(server.requests()[0].header("authorization"), None);
    }

    #[tokio::test]
    async fn test_expired_token_fails_fast_without_network() {
        let server = StubServer::start(vec![StubResponse::json(200, serde_json::json!([]))]).await;
        let h = harness(&server.base_url, None);
        h.storage.set(TOKEN_KEY, &token_expiring_in(-60)).unwrap();

        let err = h
            .client
            .get::<serde_json::Value>("/api/usuarios/me/vehiculos")
            .await
            .unwrap_err();

        assert!(matches!(api_error(&err), ApiError::TokenExpired));
        assert_eq!(server.hits(), 0);
        assert_eq!(h.storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(h.navigator.visits(), vec![(Route::Login, true)]);
    }

    #[tokio::test]
    async fn test_protected_401_logs_out() {
        let server = StubServer::start(vec![StubResponse::json(
            401,
            serde_json::json!({"mensaje": "Token inválido"}),
        )])
        .await;
        let h = harness(&server.base_url, Some(token_expiring_in(3600)));

        let err = h
            .client
            .get::<serde_json::Value>("/api/usuarios/me/dashboard")
            .await
            .unwrap_err();

        assert!(matches!(api_error(&err), ApiError::Unauthorized(_)));
        assert_eq!(h.storage.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(h.storage.get(USER_KEY).unwrap(), None);
        assert_eq!(h.navigator.visits(), vec![(Route::Login, true)]);
    }

    #[tokio::test]
    async fn test_public_401_keeps_session() {
        let server = StubServer::start(vec![StubResponse::json(
            401,
            serde_json::json!({"mensaje": "Credenciales incorrectas"}),
        )])
        .await;
        let h = harness(&server.base_url, Some(token_expiring_in(3600)));

        let err = h
            .client
            .post_for_session("/api/usuarios/login", &serde_json::json!({"email": "a@b.c"}))
            .await
            .unwrap_err();

        assert_eq!(api_error(&err).server_message().as_deref(), Some("Credenciales incorrectas"));
        assert!(h.storage.get(TOKEN_KEY).unwrap().is_some());
        assert!(h.navigator.visits().is_empty());
    }

    #[tokio::test]
    async fn test_non_401_errors_keep_session() {
        let server = StubServer::start(vec![
            StubResponse::text(403, "forbidden"),
            StubResponse::text(500, "boom"),
        ])
        .await;
        let h = harness(&server.base_url, Some(token_expiring_in(3600)));

        let err = h.client.get::<serde_json::Value>("/api/vehiculos/2").await.unwrap_err();
        assert!(matches!(api_error(&err), ApiError::AccessDenied(_)));
        let err = h.client.get::<serde_json::Value>("/api/vehiculos/2").await.unwrap_err();
        assert!(matches!(api_error(&err), ApiError::ServerError(_)));

        assert!(h.storage.get(TOKEN_KEY).unwrap().is_some());
        assert!(h.navigator.visits().is_empty());
    }

    #[tokio::test]
    async fn test_login_stores_header_token_when_body_token_is_empty() {
        let server = StubServer::start(vec![StubResponse::json(
            200,
            serde_json::json!({
                "id": 3, "nombre": "Luis", "apellido": null, "email": "luis@example.com",
                "mensaje": "Login correcto", "token": ""
            }),
        )
        .with_header("Authorization", "Bearer abc123")])
        .await;
        let h = harness(&server.base_url, None);

        let login = h
            .client
            .post_for_session("/api/usuarios/login", &serde_json::json!({"email": "luis@example.com"}))
            .await
            .unwrap();

        assert_eq!(login.id, 3);
        assert_eq!(login.last_name, "");
        assert_eq!(h.storage.get(TOKEN_KEY).unwrap().as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_undecodable_success_body_is_invalid_response() {
        let server = StubServer::start(vec![StubResponse::text(200, "<html>")]).await;
        let h = harness(&server.base_url, Some(token_expiring_in(3600)));

        let err = h.client.get::<serde_json::Value>("/api/vehiculos/1").await.unwrap_err();
        assert!(matches!(api_error(&err), ApiError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_offline() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let h = harness(&base_url, None);
        let err = h.client.health().await.unwrap_err();
        let api = err.chain().find_map(|e| e.downcast_ref::<ApiError>()).unwrap();
        assert!(matches!(api, ApiError::Offline(_)));
        assert_eq!(api.status(), Some(0));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let h = harness("http://localhost:8080/", None);
        assert_eq!(h.client.base_url(), "http://localhost:8080");
        assert_eq!(h.client.url("/api/health"), "http://localhost:8080/api/health");
    }
}
