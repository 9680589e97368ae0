use axum::{
    extract::{FromRequestParts, FromRef},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use crate::config::Config;
use crate::state::AppState;
use crate::domain::models::{auth::{Claims, Principal}, user::User};
use crate::domain::services::auth_service::{TokenTriple, ACCESS_TOKEN_AUDIENCE};
use crate::error::AppError;
use std::sync::Arc;
use time::Duration;
use tower_cookies::{cookie::SameSite, Cookie, Cookies};
use jsonwebtoken::{decode, DecodingKey, Validation, Algorithm};
use tracing::{debug, info, Span};

pub const ACCESS_COOKIE: &str = "access_token";
pub const REFRESH_COOKIE: &str = "refresh_token";
pub const CSRF_HEADER: &str = "X-CSRF-Token";

pub struct AuthUser(pub Principal);

pub enum AuthRejection {
    /// No valid session; send the browser to the login page.
    Unauthenticated,
    CsrfMismatch,
    Misconfigured,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated => Redirect::to("/login").into_response(),
            AuthRejection::CsrfMismatch => StatusCode::FORBIDDEN.into_response(),
            AuthRejection::Misconfigured => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

/// Validates an access token and turns its claims into a [`Principal`].
pub fn decode_principal(state: &AppState, access_token: &str) -> Result<Option<Principal>, AuthRejection> {
    let decoding_key = DecodingKey::from_ed_pem(state.config.jwt_public_key.as_bytes())
        .map_err(|_| AuthRejection::Misconfigured)?;

    let mut validation = Validation::new(Algorithm::EdDSA);
    validation.set_audience(&[ACCESS_TOKEN_AUDIENCE]);
    validation.set_issuer(&[state.config.auth_issuer.as_str()]);

    match decode::<Claims>(access_token, &decoding_key, &validation) {
        Ok(data) => Ok(Some(Principal::from(data.claims))),
        Err(e) => {
            debug!("Rejected access token: {}", e);
            Ok(None)
        }
    }
}

pub fn set_session_cookies(cookies: &Cookies, config: &Config, access: &str, refresh: &str) {
    let mut access_c = Cookie::new(ACCESS_COOKIE, access.to_string());
    access_c.set_http_only(true);
    access_c.set_secure(config.secure_cookies);
    access_c.set_same_site(SameSite::Lax);
    access_c.set_path("/");
    access_c.set_max_age(Duration::minutes(15));
    cookies.add(access_c);

    let mut refresh_c = Cookie::new(REFRESH_COOKIE, refresh.to_string());
    refresh_c.set_http_only(true);
    refresh_c.set_secure(config.secure_cookies);
    refresh_c.set_same_site(SameSite::Strict);
    refresh_c.set_path("/");
    refresh_c.set_max_age(Duration::days(7));
    cookies.add(refresh_c);
}

/// Trades the refresh cookie for a new token pair and writes both cookies.
pub async fn rotate_session(state: &AppState, cookies: &Cookies) -> Result<(User, TokenTriple), AppError> {
    let raw_token = cookies.get(REFRESH_COOKIE)
        .ok_or(AppError::Unauthorized)?
        .value()
        .to_string();

    let token_hash = state.auth_service.hash_token(&raw_token);
    let record = state.auth_repo.find_refresh_token(&token_hash).await?
        .ok_or(AppError::Unauthorized)?;

    let user = state.user_directory.find_by_id(&record.user_id).await?
        .ok_or(AppError::Unauthorized)?;

    let tokens = state.auth_service.refresh(&raw_token, &user).await?;
    set_session_cookies(cookies, &state.config, &tokens.0, &tokens.1);

    Ok((user, tokens))
}

async fn resume_session(state: &AppState, cookies: &Cookies) -> Result<Principal, AuthRejection> {
    if cookies.get(REFRESH_COOKIE).is_none() {
        return Err(AuthRejection::Unauthenticated);
    }

    let (user, (access_token, _, _)) = rotate_session(state, cookies).await.map_err(|e| {
        debug!("Session not resumed: {}", e);
        AuthRejection::Unauthenticated
    })?;

    info!("Session resumed for user: {}", user.id);

    decode_principal(state, &access_token)?.ok_or(AuthRejection::Misconfigured)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = parts.extensions.get::<Cookies>()
            .cloned()
            .ok_or(AuthRejection::Misconfigured)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let principal = match cookies.get(ACCESS_COOKIE) {
            Some(cookie) => decode_principal(&app_state, cookie.value())?,
            None => None,
        };

        // An expired access cookie is replaced from the refresh cookie, so a
        // submitted form survives the rotation.
        let principal = match principal {
            Some(principal) => principal,
            None => resume_session(&app_state, &cookies).await?,
        };

        // Script clients send the token as a header; HTML forms carry it in
        // the body and are checked by the handler.
        if let Some(header) = parts.headers.get(CSRF_HEADER) {
            let value = header.to_str().map_err(|_| AuthRejection::CsrfMismatch)?;
            if value != principal.csrf_token {
                return Err(AuthRejection::CsrfMismatch);
            }
        }

        Span::current().record("user_id", principal.user_id.as_str());

        Ok(AuthUser(principal))
    }
}
