use axum::{
    extract::{FromRequestParts, FromRef},
    http::request::Parts,
};
use crate::api::extractors::auth::{decode_principal, AuthRejection, ACCESS_COOKIE};
use crate::state::AppState;
use crate::domain::models::auth::Principal;
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::debug;

pub struct MaybeAuthUser(pub Option<Principal>);

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let Some(cookies) = parts.extensions.get::<Cookies>() else {
            return Ok(MaybeAuthUser(None));
        };

        let access_token = match cookies.get(ACCESS_COOKIE) {
            Some(cookie) => cookie.value().to_string(),
            None => return Ok(MaybeAuthUser(None)),
        };

        match decode_principal(&app_state, &access_token) {
            Ok(principal) => Ok(MaybeAuthUser(principal)),
            Err(_) => {
                // Invalid key config is reported by the guarded routes; treat as guest here.
                debug!("MaybeAuth: Invalid Public Key config");
                Ok(MaybeAuthUser(None))
            }
        }
    }
}
