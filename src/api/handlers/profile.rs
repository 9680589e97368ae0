use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use std::sync::Arc;
use tera::Context;
use tower_cookies::Cookies;

use crate::api::dtos::requests::ProfileForm;
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::dialog::{close, press};
use crate::api::views::Page;
use crate::domain::dialogs::{
    profile_editor::{ProfileDraft, ProfileEditor},
    EditDialog,
};
use crate::domain::models::auth::Principal;
use crate::error::AppError;
use crate::state::AppState;

const PROFILE_ROUTE: &str = "/profile";

async fn open_own_profile(state: &AppState, principal: &Principal) -> Result<EditDialog<ProfileDraft>, AppError> {
    let user = state.user_directory.find_by_id(&principal.user_id).await?
        .ok_or(AppError::NotFound("User not found".into()))?;
    let editor = ProfileEditor::new(state.user_directory.clone());
    Ok(EditDialog::open(Arc::new(editor), &user, || {}))
}

fn render_profile(
    state: &Arc<AppState>,
    principal: &Principal,
    cookies: &Cookies,
    dialog: &mut EditDialog<ProfileDraft>,
    status: StatusCode,
) -> Result<Response, AppError> {
    let mut page = Page::new(state, principal, PROFILE_ROUTE, cookies);
    page.notify_all(dialog.take_notifications());

    let mut ctx = Context::new();
    ctx.insert("title", "Profile");
    ctx.insert("draft", dialog.draft());
    Ok((status, page.render("profile_edit.html", ctx)?).into_response())
}

pub async fn profile_page(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
) -> Result<Response, AppError> {
    let mut dialog = open_own_profile(&state, &principal).await?;
    render_profile(&state, &principal, &cookies, &mut dialog, StatusCode::OK)
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
    Form(form): Form<ProfileForm>,
) -> Result<Response, AppError> {
    principal.verify_csrf(&form.csrf_token)?;

    let action = form.action;
    let mut dialog = open_own_profile(&state, &principal).await?.with_draft(form.into_draft());

    match press(&mut dialog, action).await {
        None => Ok(close(&cookies, &mut dialog, "/dashboard")),
        Some(status) => render_profile(&state, &principal, &cookies, &mut dialog, status),
    }
}
