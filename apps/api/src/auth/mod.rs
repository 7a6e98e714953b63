//! Session context. The identity provider is external; its bearer tokens are
//! turned into an explicit `Identity` that handlers pass down to services.

pub mod jwt;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use std::convert::Infallible;
use tracing::warn;

use crate::auth::jwt::SessionClaims;
use crate::state::AppState;

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// External user id issued by the identity provider.
    pub subject: String,
}

/// Optional session of the caller.
///
/// Never rejects: a missing or unusable token yields `Session(None)` and the
/// service decides whether that is an error.
#[derive(Debug, Clone)]
pub struct Session(pub Option<Identity>);

impl Session {
    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    #[tracing::instrument(skip_all, name = "extractors.session")]
    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get(AUTHORIZATION) else {
            return Ok(Session(None));
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix("Bearer "));
        let Some(token) = token else {
            warn!("Ignoring malformed Authorization header");
            return Ok(Session(None));
        };

        match SessionClaims::decode(&state.session_keys, token) {
            Ok(claims) => Ok(Session(Some(Identity {
                subject: claims.sub,
            }))),
            Err(e) => {
                warn!("Rejected session token: {e}");
                Ok(Session(None))
            }
        }
    }
}
