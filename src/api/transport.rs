//! HTTP transport for the Planty API.
//!
//! Authentication is cookie based: the backend answers a successful login
//! with a `fastapiusersauth` cookie. [`HttpTransport`] stores that cookie in
//! the data directory and sends it back as a `Cookie` header on every
//! request, so a session survives between CLI invocations.

use super::error::ApiError;
use crate::libs::data_storage::DataStorage;
use reqwest::header::{HeaderValue, COOKIE, SET_COOKIE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

pub const SESSION_COOKIE: &str = "fastapiusersauth";
pub const SESSION_FILE: &str = ".planty_session";
pub const API_PREFIX: &str = "/api";

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Body,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: Body::Empty,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = Body::Json(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn form(mut self, fields: &[(&str, &str)]) -> Self {
        self.body = Body::Form(fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect());
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.status.is_success() {
            Ok(self)
        } else {
            Err(ApiError::from_response(self.status, &self.body))
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let body = if self.body.trim().is_empty() { "null" } else { &self.body };
        Ok(serde_json::from_str(body)?)
    }
}

#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;

    /// Forgets the stored session, if any.
    fn clear_session(&self) {}
}

/// Session cookie persisted as a plain file in the data directory.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(storage: &DataStorage) -> Self {
        let path = storage.get_path(SESSION_FILE).unwrap_or_else(|_| PathBuf::from(SESSION_FILE));
        Self { path }
    }

    pub fn read(&self) -> Option<String> {
        let session = fs::read_to_string(&self.path).ok()?;
        let session = session.trim();
        (!session.is_empty()).then(|| session.to_string())
    }

    pub fn write(&self, session: &str) {
        if let Err(e) = fs::write(&self.path, session) {
            tracing::warn!(error = %e, path = %self.path.display(), "failed to store session");
        }
    }

    pub fn clear(&self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                tracing::warn!(error = %e, path = %self.path.display(), "failed to remove session");
            }
        }
    }
}

/// Extracts the session cookie value from a `Set-Cookie` header.
///
/// Returns `Some("")` when the server expires the cookie (logout).
pub fn session_from_set_cookie(header: &str) -> Option<String> {
    let prefix = format!("{}=", SESSION_COOKIE);
    let mut parts = header.split(';').map(str::trim);
    let value = parts.next()?.strip_prefix(&prefix)?;
    let expired = parts.any(|attr| attr.eq_ignore_ascii_case("max-age=0"));
    let value = value.trim_matches('"');
    Some(if expired { String::new() } else { value.to_string() })
}

pub struct HttpTransport {
    client: Client,
    base_url: String,
    session: SessionStore,
}

impl HttpTransport {
    pub fn new(base_url: &str, storage: &DataStorage) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session: SessionStore::new(storage),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}{}", self.base_url, API_PREFIX, request.path);
        let started = Instant::now();

        let mut builder = self.client.request(request.method.clone(), &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(session) = self.session.read() {
            if let Ok(cookie) = HeaderValue::from_str(&format!("{}={}", SESSION_COOKIE, session)) {
                builder = builder.header(COOKIE, cookie);
            }
        }
        builder = match &request.body {
            Body::Empty => builder,
            Body::Json(value) => builder.json(value),
            Body::Form(fields) => builder.form(fields),
        };

        let res = builder.send().await?;
        let status = res.status();

        for header in res.headers().get_all(SET_COOKIE) {
            match header.to_str().ok().and_then(session_from_set_cookie) {
                Some(session) if session.is_empty() => self.session.clear(),
                Some(session) => self.session.write(&session),
                None => {}
            }
        }

        let body = res.text().await?;
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "api request"
        );

        Ok(ApiResponse { status, body })
    }

    fn clear_session(&self) {
        self.session.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_is_parsed_from_set_cookie() {
        assert_eq!(
            session_from_set_cookie("fastapiusersauth=abc.def; HttpOnly; Max-Age=3600; Path=/; SameSite=lax"),
            Some("abc.def".to_string())
        );
        assert_eq!(
            session_from_set_cookie("fastapiusersauth=\"\"; HttpOnly; Max-Age=0; Path=/"),
            Some(String::new())
        );
        assert_eq!(session_from_set_cookie("other=1; Path=/"), None);
    }

    #[test]
    fn empty_body_decodes_as_unit() {
        let response = ApiResponse {
            status: StatusCode::OK,
            body: String::new(),
        };
        let unit: () = response.json().unwrap();
        assert_eq!(unit, ());
    }
}
