//! Shared HTTP helpers for the end-to-end API suites.

use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{Method, StatusCode, header};
use actix_web::test::{self, TestRequest};
use serde_json::Value;

use accounts::domain::TRACE_ID_HEADER;

pub(crate) const ADMIN_EMAIL: &str = "admin@example.com";
pub(crate) const ADMIN_PASSWORD: &str = "AdminPass123!@#";
pub(crate) const MEMBER_EMAIL: &str = "member@example.com";
pub(crate) const MEMBER_PASSWORD: &str = "MemberPass123!@#";

/// Status, headers, session cookie and JSON body of a response.
pub(crate) struct CapturedResponse {
    pub(crate) status: StatusCode,
    pub(crate) trace_id: Option<String>,
    pub(crate) headers: header::HeaderMap,
    pub(crate) cookie: Option<Cookie<'static>>,
    pub(crate) body: Value,
}

impl CapturedResponse {
    /// Field names listed in a validation error body, sorted.
    pub(crate) fn invalid_fields(&self) -> Vec<String> {
        let mut names: Vec<String> = self.body["details"]["fields"]
            .as_object()
            .map(|fields| fields.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    pub(crate) fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

pub(crate) async fn send<S>(
    app: &S,
    method: Method,
    path: &str,
    cookie: Option<&Cookie<'static>>,
    payload: Option<Value>,
) -> CapturedResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut request = TestRequest::default().method(method).uri(path);
    if let Some(cookie) = cookie {
        request = request.cookie(cookie.clone());
    }
    if let Some(payload) = payload {
        request = request.set_json(payload);
    }
    let response = test::call_service(app, request.to_request()).await;

    let status = response.status();
    let headers = response.headers().clone();
    let trace_id = headers
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let cookie = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned);
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    CapturedResponse {
        status,
        trace_id,
        headers,
        cookie,
        body,
    }
}

/// Log in and return the session cookie.
pub(crate) async fn login<S>(app: &S, email: &str, password: &str) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = send(
        app,
        Method::POST,
        "/api/v1/login",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(
        response.status,
        StatusCode::OK,
        "login failed: {}",
        response.body
    );
    response.cookie.expect("session cookie")
}
