//! Deferred decoding of request bodies and query strings.
//!
//! Session-gated handlers take the raw body as `web::Bytes` (or read the
//! query string from the request) and decode it here once the caller has
//! been resolved and authorised. Unauthorised callers therefore get `401` or
//! `403` whatever they sent.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::Error;

/// Message for bodies that do not decode into the endpoint's request type.
pub const INVALID_BODY: &str = "The request body is not valid JSON for this endpoint.";
/// Message for query strings that do not decode into the endpoint's params.
pub const INVALID_QUERY: &str = "The query string is not valid for this endpoint.";

/// Decode a JSON body into `T`.
///
/// # Errors
/// Returns `invalid_request` when the body is not JSON or has the wrong
/// shape for `T`.
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|error| {
        debug!(%error, "rejected request body");
        Error::invalid_request(INVALID_BODY)
    })
}

/// Decode a URL query string into `T`.
///
/// # Errors
/// Returns `invalid_request` when a parameter is repeated or malformed.
pub fn decode_query<T: DeserializeOwned>(query: &str) -> Result<T, Error> {
    actix_web::web::Query::<T>::from_query(query)
        .map(actix_web::web::Query::into_inner)
        .map_err(|error| {
            debug!(%error, "rejected query string");
            Error::invalid_request(INVALID_QUERY)
        })
}
