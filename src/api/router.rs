use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{auth, health, location, pages, profile, properties, users};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Session
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/auth/refresh", post(auth::refresh))

        // Shell destinations
        .route("/", get(pages::root))
        .route("/dashboard", get(pages::dashboard))
        .route("/finances", get(pages::finances))
        .route("/support", get(pages::support))
        .route("/logs", get(pages::logs))

        // Location
        .route("/location", get(location::location_page))
        .route("/location/states", post(location::create_state))
        .route("/location/cities", post(location::create_city))
        .route("/location/cities/{id}/edit", get(location::edit_city_page).post(location::edit_city))
        .route("/location/phases", post(location::create_phase))

        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/{id}/edit", get(users::edit_user_page).post(users::edit_user))

        // Properties
        .route("/properties", get(properties::list_properties).post(properties::create_property))
        .route("/properties/{id}/edit", get(properties::edit_property_page).post(properties::edit_property))

        // Own account
        .route("/profile", get(profile::profile_page).post(profile::update_profile))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
