use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use std::sync::Arc;
use tera::Context;
use tower_cookies::Cookies;
use tracing::{debug, info};

use crate::api::dtos::requests::{CreateUserForm, UserEditForm};
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::dialog::{close, press};
use crate::api::views::{ensure_permitted, push_flash, Page};
use crate::domain::dialogs::{
    user_editor::{UserDraft, UserEditor},
    EditDialog, REQUIRED_FIELDS_MESSAGE,
};
use crate::domain::models::{auth::Principal, notification::Notification, role::Role, user::User};
use crate::error::AppError;
use crate::state::AppState;

const USERS_ROUTE: &str = "/users";

fn role_names() -> Vec<&'static str> {
    Role::ALL.iter().map(Role::as_str).collect()
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    ensure_permitted(&state, &principal, USERS_ROUTE)?;

    let users = state.user_directory.list_users().await?;

    let mut ctx = Context::new();
    ctx.insert("title", "Users");
    ctx.insert("users", &users);
    ctx.insert("roles", &role_names());
    Page::new(&state, &principal, USERS_ROUTE, &cookies).render("users.html", ctx)
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
    Form(form): Form<CreateUserForm>,
) -> Result<Response, AppError> {
    ensure_permitted(&state, &principal, USERS_ROUTE)?;
    principal.verify_csrf(&form.csrf_token)?;

    let required = [
        &form.first_name,
        &form.last_name,
        &form.email,
        &form.username,
        &form.phone_number,
        &form.password,
    ];
    let role: Option<Role> = form.role.parse().ok();
    let notification = match role {
        Some(role) if required.iter().all(|v| !v.trim().is_empty()) => {
            let mut user = User::new(
                form.first_name.trim().to_string(),
                form.last_name.trim().to_string(),
                form.email.trim().to_string(),
                form.username.trim().to_string(),
                role,
                String::new(),
            );
            user.phone_number = Some(form.phone_number.trim().to_string());

            match state.user_directory.create_user(user, &form.password).await {
                Ok(created) => {
                    info!("User {} created by {}", created.id, principal.user_id);
                    Notification::success("User created successfully")
                }
                Err(e) => Notification::error(format!("Unable to create user: {}", e)),
            }
        }
        _ => Notification::error(REQUIRED_FIELDS_MESSAGE),
    };

    push_flash(&cookies, &[notification]);
    Ok(Redirect::to(USERS_ROUTE).into_response())
}

async fn load_user(state: &AppState, id: &str) -> Result<User, AppError> {
    state.user_directory.find_by_id(id).await?
        .ok_or(AppError::NotFound("User not found".into()))
}

fn open_editor(state: &AppState, principal: &Principal, user: &User) -> EditDialog<UserDraft> {
    let editor = UserEditor::new(state.user_directory.clone()).acting_as(principal.user_id.clone());
    let user_id = user.id.clone();
    EditDialog::open(Arc::new(editor), user, move || {
        debug!("User list invalidated by edit of {}", user_id);
    })
}

fn render_editor(
    state: &Arc<AppState>,
    principal: &Principal,
    cookies: &Cookies,
    uri: &Uri,
    dialog: &mut EditDialog<UserDraft>,
    status: StatusCode,
) -> Result<Response, AppError> {
    let mut page = Page::new(state, principal, uri.path(), cookies);
    page.notify_all(dialog.take_notifications());

    let mut ctx = Context::new();
    ctx.insert("title", "Edit User");
    ctx.insert("user_id", &dialog.entity().id);
    ctx.insert("draft", dialog.draft());
    ctx.insert("roles", &role_names());
    Ok((status, page.render("user_edit.html", ctx)?).into_response())
}

pub async fn edit_user_page(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
    uri: Uri,
    Path(user_id): Path<String>,
) -> Result<Response, AppError> {
    ensure_permitted(&state, &principal, USERS_ROUTE)?;

    let user = load_user(&state, &user_id).await?;
    let mut dialog = open_editor(&state, &principal, &user);
    render_editor(&state, &principal, &cookies, &uri, &mut dialog, StatusCode::OK)
}

pub async fn edit_user(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
    uri: Uri,
    Path(user_id): Path<String>,
    Form(form): Form<UserEditForm>,
) -> Result<Response, AppError> {
    ensure_permitted(&state, &principal, USERS_ROUTE)?;
    principal.verify_csrf(&form.csrf_token)?;

    let user = load_user(&state, &user_id).await?;
    let action = form.action;
    let mut dialog = open_editor(&state, &principal, &user).with_draft(form.into_draft());

    match press(&mut dialog, action).await {
        None => Ok(close(&cookies, &mut dialog, USERS_ROUTE)),
        Some(status) => render_editor(&state, &principal, &cookies, &uri, &mut dialog, status),
    }
}

