use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use std::sync::Arc;
use tera::Context;
use tower_cookies::Cookies;
use tracing::{info, warn};

use crate::api::dtos::requests::{CreatePropertyForm, PropertyForm};
use crate::api::dtos::responses::AgentOption;
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::dialog::{close, press};
use crate::api::views::{ensure_permitted, push_flash, Page};
use crate::domain::dialogs::{
    property_editor::{PropertyDraft, PropertyEditor},
    EditDialog, REQUIRED_FIELDS_MESSAGE,
};
use crate::domain::models::{
    auth::Principal,
    notification::Notification,
    property::{Property, PropertyStatus, PropertyType},
    role::Role,
};
use crate::error::AppError;
use crate::state::AppState;

const PROPERTIES_ROUTE: &str = "/properties";

/// Roles allowed to create and edit listings; clients only browse.
const EDITOR_ROLES: [Role; 3] = [Role::Admin, Role::Manager, Role::Agent];

fn can_edit(principal: &Principal) -> bool {
    EDITOR_ROLES.iter().any(|r| principal.has_authority(r.authority()))
}

fn ensure_editor(state: &AppState, principal: &Principal) -> Result<(), AppError> {
    ensure_permitted(state, principal, PROPERTIES_ROUTE)?;
    if !can_edit(principal) {
        warn!("User {} may not edit properties", principal.user_id);
        return Err(AppError::Forbidden("Property editing denied".into()));
    }
    Ok(())
}

fn type_names() -> Vec<&'static str> {
    PropertyType::ALL.iter().map(PropertyType::as_str).collect()
}

fn status_names() -> Vec<&'static str> {
    PropertyStatus::ALL.iter().map(PropertyStatus::as_str).collect()
}

pub async fn list_properties(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    ensure_permitted(&state, &principal, PROPERTIES_ROUTE)?;

    let properties = state.property_repo.list().await?;
    let phases = state.location_repo.list_phases().await?;

    let mut ctx = Context::new();
    ctx.insert("title", "Properties");
    ctx.insert("properties", &properties);
    ctx.insert("phases", &phases);
    ctx.insert("property_types", &type_names());
    ctx.insert("can_edit", &can_edit(&principal));
    Page::new(&state, &principal, PROPERTIES_ROUTE, &cookies).render("properties.html", ctx)
}

pub async fn create_property(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
    Form(form): Form<CreatePropertyForm>,
) -> Result<Response, AppError> {
    ensure_editor(&state, &principal)?;
    principal.verify_csrf(&form.csrf_token)?;

    let title = form.title.trim();
    let property_type: Option<PropertyType> = form.property_type.parse().ok();
    let price: Option<i64> = form.price.trim().parse().ok().filter(|p| *p >= 0);

    let notification = match (property_type, price) {
        (Some(property_type), Some(price)) if !title.is_empty() && !form.phase_id.is_empty() => {
            let mut property = Property::new(title.to_string(), form.phase_id.clone(), property_type, price);
            if principal.has_authority(Role::Agent.authority()) {
                property.agent_id = Some(principal.user_id.clone());
            }
            match state.property_repo.create(&property).await {
                Ok(created) => {
                    info!("Property {} created by {}", created.id, principal.user_id);
                    Notification::success("Property created successfully")
                }
                Err(e) => Notification::error(format!("Unable to create property: {}", e)),
            }
        }
        (_, None) if !form.price.trim().is_empty() => Notification::error("price: must be a whole number"),
        _ => Notification::error(REQUIRED_FIELDS_MESSAGE),
    };

    push_flash(&cookies, &[notification]);
    Ok(Redirect::to(PROPERTIES_ROUTE).into_response())
}

async fn open_property_editor(state: &AppState, id: &str) -> Result<EditDialog<PropertyDraft>, AppError> {
    let property = state.property_repo.find_by_id(id).await?
        .ok_or(AppError::NotFound("Property not found".into()))?;
    Ok(EditDialog::open(Arc::new(PropertyEditor::new(state.property_repo.clone())), &property, || {}))
}

async fn render_property_editor(
    state: &Arc<AppState>,
    principal: &Principal,
    cookies: &Cookies,
    uri: &Uri,
    dialog: &mut EditDialog<PropertyDraft>,
    status: StatusCode,
) -> Result<Response, AppError> {
    let phases = state.location_repo.list_phases().await?;
    let agents: Vec<AgentOption> = state
        .user_directory
        .list_users()
        .await?
        .into_iter()
        .filter(|u| u.roles.contains(Role::Agent))
        .map(|u| AgentOption { id: u.id, username: u.username })
        .collect();

    let mut page = Page::new(state, principal, uri.path(), cookies);
    page.notify_all(dialog.take_notifications());

    let mut ctx = Context::new();
    ctx.insert("title", "Edit Property");
    ctx.insert("property_id", &dialog.entity().id);
    ctx.insert("draft", dialog.draft());
    ctx.insert("phases", &phases);
    ctx.insert("agents", &agents);
    ctx.insert("property_types", &type_names());
    ctx.insert("statuses", &status_names());
    Ok((status, page.render("property_edit.html", ctx)?).into_response())
}

pub async fn edit_property_page(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
    uri: Uri,
    Path(property_id): Path<String>,
) -> Result<Response, AppError> {
    ensure_editor(&state, &principal)?;

    let mut dialog = open_property_editor(&state, &property_id).await?;
    render_property_editor(&state, &principal, &cookies, &uri, &mut dialog, StatusCode::OK).await
}

pub async fn edit_property(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
    uri: Uri,
    Path(property_id): Path<String>,
    Form(form): Form<PropertyForm>,
) -> Result<Response, AppError> {
    ensure_editor(&state, &principal)?;
    principal.verify_csrf(&form.csrf_token)?;

    let action = form.action;
    let mut dialog = open_property_editor(&state, &property_id).await?.with_draft(form.into_draft());

    match press(&mut dialog, action).await {
        None => Ok(close(&cookies, &mut dialog, PROPERTIES_ROUTE)),
        Some(status) => render_property_editor(&state, &principal, &cookies, &uri, &mut dialog, status).await,
    }
}
