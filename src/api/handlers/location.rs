use axum::{
    extract::{Path, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use std::collections::HashMap;
use std::sync::Arc;
use tera::Context;
use tower_cookies::Cookies;
use tracing::info;

use crate::api::dtos::requests::{CityForm, CreatePhaseForm, CreateStateForm};
use crate::api::dtos::responses::{CityRow, PhaseRow};
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::dialog::{close, press};
use crate::api::views::{ensure_permitted, push_flash, Page};
use crate::domain::dialogs::{
    city_editor::{CityDraft, CityEditor},
    ensure_max_chars, EditDialog, FormDraft, LOCATION_FIELD_MAX_CHARS,
    REQUIRED_FIELDS_MESSAGE,
};
use crate::domain::models::{
    auth::Principal,
    location::{City, Phase, State as Region},
    notification::Notification,
};
use crate::error::AppError;
use crate::state::AppState;

const LOCATION_ROUTE: &str = "/location";

pub async fn location_page(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
) -> Result<impl IntoResponse, AppError> {
    ensure_permitted(&state, &principal, LOCATION_ROUTE)?;

    let states = state.location_repo.list_states().await?;
    let cities = state.location_repo.list_cities().await?;
    let phases = state.location_repo.list_phases().await?;

    let state_names: HashMap<&str, &str> = states.iter().map(|s| (s.id.as_str(), s.name.as_str())).collect();
    let city_names: HashMap<String, String> = cities.iter().map(|c| (c.id.clone(), c.name.clone())).collect();

    let city_rows: Vec<CityRow> = cities
        .iter()
        .map(|c| CityRow {
            state_name: state_names.get(c.state_id.as_str()).unwrap_or(&"").to_string(),
            city: c.clone(),
        })
        .collect();
    let phase_rows: Vec<PhaseRow> = phases
        .into_iter()
        .map(|p| PhaseRow {
            city_name: city_names.get(&p.city_id).cloned().unwrap_or_default(),
            phase: p,
        })
        .collect();

    let mut ctx = Context::new();
    ctx.insert("title", "Location");
    ctx.insert("states", &states);
    ctx.insert("cities", &city_rows);
    ctx.insert("phases", &phase_rows);
    Page::new(&state, &principal, LOCATION_ROUTE, &cookies).render("location.html", ctx)
}

fn created(label: &str, result: Result<String, AppError>) -> Notification {
    match result {
        Ok(id) => {
            info!("{} created: {}", label, id);
            Notification::success(format!("{} created successfully", label))
        }
        Err(e) => Notification::error(format!("Unable to create {}: {}", label.to_lowercase(), e)),
    }
}

pub async fn create_state(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
    Form(form): Form<CreateStateForm>,
) -> Result<Response, AppError> {
    ensure_permitted(&state, &principal, LOCATION_ROUTE)?;
    principal.verify_csrf(&form.csrf_token)?;

    let (name, code) = (form.name.trim(), form.state_code.trim());
    let too_long = ensure_max_chars("name", name, LOCATION_FIELD_MAX_CHARS)
        .and_then(|_| ensure_max_chars("state_code", code, LOCATION_FIELD_MAX_CHARS));
    let notification = if name.is_empty() || code.is_empty() {
        Notification::error(REQUIRED_FIELDS_MESSAGE)
    } else if let Err(invalid) = too_long {
        Notification::error(invalid.to_string())
    } else {
        let region = Region::new(name.to_string(), code.to_string());
        created("State", state.location_repo.create_state(&region).await.map(|s| s.id))
    };

    push_flash(&cookies, &[notification]);
    Ok(Redirect::to(LOCATION_ROUTE).into_response())
}

pub async fn create_city(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
    Form(form): Form<CityForm>,
) -> Result<Response, AppError> {
    ensure_permitted(&state, &principal, LOCATION_ROUTE)?;
    principal.verify_csrf(&form.csrf_token)?;

    let draft = form.into_draft();
    let mut city = City::new(String::new(), String::new(), String::new());
    let notification = if !draft.missing_required().is_empty() {
        Notification::error(REQUIRED_FIELDS_MESSAGE)
    } else if let Err(invalid) = draft.apply_to(&mut city) {
        Notification::error(invalid.to_string())
    } else {
        created("City", state.location_repo.create_city(&city).await.map(|c| c.id))
    };

    push_flash(&cookies, &[notification]);
    Ok(Redirect::to(LOCATION_ROUTE).into_response())
}

pub async fn create_phase(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
    Form(form): Form<CreatePhaseForm>,
) -> Result<Response, AppError> {
    ensure_permitted(&state, &principal, LOCATION_ROUTE)?;
    principal.verify_csrf(&form.csrf_token)?;

    let name = form.name.trim();
    let notification = if name.is_empty() || form.city_id.is_empty() {
        Notification::error(REQUIRED_FIELDS_MESSAGE)
    } else if let Err(invalid) = ensure_max_chars("name", name, LOCATION_FIELD_MAX_CHARS) {
        Notification::error(invalid.to_string())
    } else {
        let phase = Phase::new(name.to_string(), form.city_id.clone());
        created("Phase", state.location_repo.create_phase(&phase).await.map(|p| p.id))
    };

    push_flash(&cookies, &[notification]);
    Ok(Redirect::to(LOCATION_ROUTE).into_response())
}

async fn open_city_editor(state: &AppState, id: &str) -> Result<EditDialog<CityDraft>, AppError> {
    let city = state.location_repo.find_city(id).await?
        .ok_or(AppError::NotFound("City not found".into()))?;
    Ok(EditDialog::open(Arc::new(CityEditor::new(state.location_repo.clone())), &city, || {}))
}

async fn render_city_editor(
    state: &Arc<AppState>,
    principal: &Principal,
    cookies: &Cookies,
    uri: &Uri,
    dialog: &mut EditDialog<CityDraft>,
    status: StatusCode,
) -> Result<Response, AppError> {
    let states = state.location_repo.list_states().await?;

    let mut page = Page::new(state, principal, uri.path(), cookies);
    page.notify_all(dialog.take_notifications());

    let mut ctx = Context::new();
    ctx.insert("title", "Edit City");
    ctx.insert("city_id", &dialog.entity().id);
    ctx.insert("draft", dialog.draft());
    ctx.insert("states", &states);
    Ok((status, page.render("city_edit.html", ctx)?).into_response())
}

pub async fn edit_city_page(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
    uri: Uri,
    Path(city_id): Path<String>,
) -> Result<Response, AppError> {
    ensure_permitted(&state, &principal, LOCATION_ROUTE)?;

    let mut dialog = open_city_editor(&state, &city_id).await?;
    render_city_editor(&state, &principal, &cookies, &uri, &mut dialog, StatusCode::OK).await
}

pub async fn edit_city(
    State(state): State<Arc<AppState>>,
    AuthUser(principal): AuthUser,
    cookies: Cookies,
    uri: Uri,
    Path(city_id): Path<String>,
    Form(form): Form<CityForm>,
) -> Result<Response, AppError> {
    ensure_permitted(&state, &principal, LOCATION_ROUTE)?;
    principal.verify_csrf(&form.csrf_token)?;

    let action = form.action;
    let mut dialog = open_city_editor(&state, &city_id).await?.with_draft(form.into_draft());

    match press(&mut dialog, action).await {
        None => Ok(close(&cookies, &mut dialog, LOCATION_ROUTE)),
        Some(status) => render_city_editor(&state, &principal, &cookies, &uri, &mut dialog, status).await,
    }
}
