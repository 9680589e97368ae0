use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect},
};
use std::sync::Arc;
use tera::Context;
use tower_cookies::Cookies;

use crate::api::dtos::responses::PropertyStats;
use crate::api::extractors::{auth::AuthUser, maybe_auth::MaybeAuthUser};
use crate::api::views::{ensure_permitted, Page};
use crate::domain::models::auth::Principal;
use crate::error::AppError;
use crate::state::AppState;

pub async fn root(MaybeAuthUser(principal): MaybeAuthUser) -> impl IntoResponse {
    match principal {
        Some(_) => Redirect::to("/dashboard"),
        None => Redirect::to("/login"),
    }
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    ensure_permitted(&state, &principal, "/dashboard")?;

    let mut ctx = Context::new();
    ctx.insert("title", "Dashboard");
    if state.navigation.permits("/properties", &principal.authorities) {
        let properties = state.property_repo.list().await?;
        ctx.insert("stats", &PropertyStats::tally(&properties));
    }

    Page::new(&state, &principal, "/dashboard", &cookies).render("dashboard.html", ctx)
}

pub async fn finances(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    placeholder(&state, &principal, &cookies, "/finances", "Finances")
}

pub async fn support(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    placeholder(&state, &principal, &cookies, "/support", "Support")
}

pub async fn logs(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
) -> Result<Html<String>, AppError> {
    placeholder(&state, &principal, &cookies, "/logs", "Logs")
}

fn placeholder(
    state: &Arc<AppState>,
    principal: &Principal,
    cookies: &Cookies,
    route: &str,
    title: &str,
) -> Result<Html<String>, AppError> {
    ensure_permitted(state, principal, route)?;

    let mut ctx = Context::new();
    ctx.insert("title", title);
    ctx.insert("message", &format!("{} is not available yet.", title));
    Page::new(state, principal, route, cookies).render("placeholder.html", ctx)
}
