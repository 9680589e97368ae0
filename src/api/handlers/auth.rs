use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use crate::api::dtos::requests::{CsrfForm, LoginForm};
use crate::api::extractors::auth::{
    rotate_session, set_session_cookies, AuthUser, ACCESS_COOKIE, REFRESH_COOKIE,
};
use crate::api::extractors::maybe_auth::MaybeAuthUser;
use crate::api::views::render;
use crate::domain::models::auth::{AuthResponse, UserProfile};
use crate::domain::services::user_service::verify_password;
use crate::error::AppError;
use crate::state::AppState;
use std::sync::Arc;
use tera::Context;
use tower_cookies::{Cookies, Cookie};
use tracing::{info, warn};

const BAD_CREDENTIALS: &str = "Invalid username or password";

pub async fn login_page(
    State(state): State<Arc<AppState>>,
    MaybeAuthUser(principal): MaybeAuthUser,
) -> Result<Response, AppError> {
    if principal.is_some() {
        return Ok(Redirect::to("/dashboard").into_response());
    }
    let mut ctx = Context::new();
    ctx.insert("username", "");
    Ok(render(&state.templates, "login.html", &ctx)?.into_response())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let user = state.user_directory.find_by_username(&form.username).await?;

    let user = match user {
        Some(user) if verify_password(&form.password, &user.password_hash)? => user,
        _ => {
            warn!("Failed login for username '{}'", form.username);
            let mut ctx = Context::new();
            ctx.insert("username", &form.username);
            ctx.insert("error", BAD_CREDENTIALS);
            let page = render(&state.templates, "login.html", &ctx)?;
            return Ok((StatusCode::UNAUTHORIZED, page).into_response());
        }
    };

    let (access_jwt, refresh_token, _csrf_token) = state.auth_service.login(&user).await?;

    set_session_cookies(&cookies, &state.config, &access_jwt, &refresh_token);

    info!("User logged in: {}", user.id);

    Ok(Redirect::to("/dashboard").into_response())
}

pub async fn refresh(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    let (user, (_, _, new_csrf)) = rotate_session(&state, &cookies).await?;

    info!("Token refreshed for user: {}", user.id);

    Ok(Json(AuthResponse {
        csrf_token: new_csrf,
        user: UserProfile {
            id: user.id,
            username: user.username,
            authorities: user.roles.authorities().into_iter().collect(),
        }
    }))
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
    Form(form): Form<CsrfForm>,
) -> Result<impl IntoResponse, AppError> {
    principal.verify_csrf(&form.csrf_token)?;

    if let Some(cookie) = cookies.get(REFRESH_COOKIE) {
        if let Err(e) = state.auth_service.logout(cookie.value()).await {
            warn!("Failed to revoke refresh token for {}: {}", principal.user_id, e);
        }
    }

    cookies.remove(Cookie::build((ACCESS_COOKIE, "")).path("/").into());
    cookies.remove(Cookie::build((REFRESH_COOKIE, "")).path("/").into());

    info!("User logged out: {}", principal.user_id);

    Ok(Redirect::to("/login"))
}
