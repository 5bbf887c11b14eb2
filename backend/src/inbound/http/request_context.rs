//! Extraction of the client details recorded in audit entries.

use actix_web::dev::Payload;
use actix_web::http::header::USER_AGENT;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::domain::RequestContext;

/// Build the audit context from the socket peer and `User-Agent` header.
///
/// Forwarding headers are ignored; deployments behind a proxy see the
/// proxy's address.
pub fn request_context(req: &HttpRequest) -> RequestContext {
    RequestContext {
        ip_address: req.peer_addr().map(|addr| addr.ip().to_string()),
        user_agent: req
            .headers()
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned),
    }
}

impl FromRequest for RequestContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(request_context(req)))
    }
}
