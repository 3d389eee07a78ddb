/// HTTP middleware utilities for content-service
///
/// Authentication happens at the gateway, which forwards the verified user
/// id in the `X-User-Id` header. This service trusts that header and does not
/// re-verify it.
use actix_web::{error::ErrorUnauthorized, Error, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

pub const USER_ID_HEADER: &str = "X-User-Id";

/// Authenticated caller, extracted from the gateway header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Uuid);

impl AuthenticatedUser {
    pub fn from_request_headers(req: &HttpRequest) -> Result<Self, Error> {
        let raw = req
            .headers()
            .get(USER_ID_HEADER)
            .ok_or_else(|| ErrorUnauthorized("User ID missing"))?;

        raw.to_str()
            .ok()
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .map(AuthenticatedUser)
            .ok_or_else(|| ErrorUnauthorized("User ID invalid"))
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Self::from_request_headers(req))
    }
}
