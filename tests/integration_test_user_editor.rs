mod common;

use axum::http::StatusCode;
use common::{body_text, location, set_cookie, Session, TestApp, PASSWORD};
use pms_backoffice::domain::models::{
    location::{City, Phase, State},
    property::{Property, PropertyType},
    role::{Role, RoleSet},
    user::User,
};

fn edit_fields(user: &User, action: &str) -> Vec<(&'static str, String)> {
    vec![
        ("action", action.to_string()),
        ("first_name", user.first_name.clone()),
        ("middle_name", String::new()),
        ("last_name", user.last_name.clone()),
        ("email", user.email.clone()),
        ("username", user.username.clone()),
        ("phone_number", "08030000000".to_string()),
        ("house_number", String::new()),
        ("street", String::new()),
        ("city", String::new()),
        ("state", String::new()),
        ("postal_code", String::new()),
        ("role", user.roles.first().as_str().to_string()),
        ("password", String::new()),
    ]
}

fn with(mut fields: Vec<(&'static str, String)>, key: &str, value: &str) -> Vec<(&'static str, String)> {
    for field in fields.iter_mut() {
        if field.0 == key {
            field.1 = value.to_string();
        }
    }
    fields
}

async fn submit(app: &TestApp, session: &Session, user: &User, fields: &[(&'static str, String)]) -> axum::response::Response {
    let borrowed: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
    app.post_form(session, &format!("/users/{}/edit", user.id), &borrowed).await
}

async fn admin_session(app: &TestApp) -> (User, Session) {
    let admin = app.seed_user("boss", Role::Admin).await;
    let session = app.login("boss", PASSWORD).await;
    (admin, session)
}

#[tokio::test]
async fn test_edit_page_populates_draft() {
    let app = TestApp::new().await;
    let (_, session) = admin_session(&app).await;
    let agent = app.seed_user("agent1", Role::Agent).await;

    let res = app.get(&session, &format!("/users/{}/edit", agent.id)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_text(res).await;

    assert!(html.contains(r#"name="username" value="agent1""#));
    assert!(html.contains(r#"name="middle_name" value="""#));
    assert!(html.contains(r#"<option value="AGENT" selected>"#));
    assert!(html.contains(r#"name="password" type="password" value="""#));
    assert!(!html.contains("active-link"));
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let app = TestApp::new().await;
    let (_, session) = admin_session(&app).await;

    let res = app.get(&session, "/users/does-not-exist/edit").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_save_merges_fields_and_keeps_password() {
    let app = TestApp::new().await;
    let (_, session) = admin_session(&app).await;
    let agent = app.seed_user("agent1", Role::Agent).await;

    let fields = edit_fields(&agent, "save");
    let fields = with(fields, "first_name", "Chidi");
    let fields = with(fields, "street", "Allen Avenue");
    let fields = with(fields, "role", "MANAGER");
    let res = submit(&app, &session, &agent, &fields).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/users");
    let flash = set_cookie(&res, "flash").expect("no flash cookie");

    let saved = app.user(&agent.id).await.unwrap();
    assert_eq!(saved.first_name, "Chidi");
    assert_eq!(saved.street.as_deref(), Some("Allen Avenue"));
    assert_eq!(saved.middle_name, None);
    assert_eq!(saved.roles, RoleSet::single(Role::Manager));
    assert_eq!(saved.password_hash, agent.password_hash);

    // The notification shows on the list page the redirect lands on.
    let res = app.get_with_cookies(&format!("{}; flash={}", session.cookie(), flash), "/users").await;
    let html = body_text(res).await;
    assert!(html.contains("User updated successfully"));
    assert!(html.contains("Chidi"));
}

#[tokio::test]
async fn test_new_password_replaces_old_one() {
    let app = TestApp::new().await;
    let (_, session) = admin_session(&app).await;
    let agent = app.seed_user("agent1", Role::Agent).await;

    let fields = with(edit_fields(&agent, "save"), "password", "brand-new-pass");
    let res = submit(&app, &session, &agent, &fields).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    assert_eq!(app.try_login("agent1", PASSWORD).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.try_login("agent1", "brand-new-pass").await.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_missing_required_field_keeps_dialog_open() {
    let app = TestApp::new().await;
    let (_, session) = admin_session(&app).await;
    let agent = app.seed_user("agent1", Role::Agent).await;

    let fields = edit_fields(&agent, "save");
    let fields = with(fields, "first_name", "");
    let fields = with(fields, "street", "Kept Street");
    let res = submit(&app, &session, &agent, &fields).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(set_cookie(&res, "flash").is_none());
    let html = body_text(res).await;
    assert!(html.contains("Please fill out all required fields"));
    assert!(html.contains(r#"name="street" value="Kept Street""#));

    assert_eq!(app.user(&agent.id).await.unwrap(), agent);
}

#[tokio::test]
async fn test_missing_role_is_rejected() {
    let app = TestApp::new().await;
    let (_, session) = admin_session(&app).await;
    let agent = app.seed_user("agent1", Role::Agent).await;

    let fields = with(edit_fields(&agent, "save"), "role", "");
    let res = submit(&app, &session, &agent, &fields).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(app.user(&agent.id).await.unwrap().roles, RoleSet::single(Role::Agent));
}

#[tokio::test]
async fn test_duplicate_username_surfaces_error() {
    let app = TestApp::new().await;
    let (_, session) = admin_session(&app).await;
    let agent = app.seed_user("agent1", Role::Agent).await;

    let fields = with(edit_fields(&agent, "save"), "username", "boss");
    let res = submit(&app, &session, &agent, &fields).await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    let html = body_text(res).await;
    assert!(html.contains("Unable to update user: Username already exists"));
    assert_eq!(app.user(&agent.id).await.unwrap().username, "agent1");
}

#[tokio::test]
async fn test_delete_removes_user() {
    let app = TestApp::new().await;
    let (_, session) = admin_session(&app).await;
    let agent = app.seed_user("agent1", Role::Agent).await;

    let res = submit(&app, &session, &agent, &edit_fields(&agent, "delete")).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/users");
    assert!(app.user(&agent.id).await.is_none());
}

#[tokio::test]
async fn test_delete_of_referenced_user_is_refused() {
    let app = TestApp::new().await;
    let (_, session) = admin_session(&app).await;
    let agent = app.seed_user("agent1", Role::Agent).await;

    let repo = &app.state.location_repo;
    let state = repo.create_state(&State::new("Lagos".into(), "LA".into())).await.unwrap();
    let city = repo.create_city(&City::new("Ikeja".into(), "IKJ".into(), state.id)).await.unwrap();
    let phase = repo.create_phase(&Phase::new("Phase 1".into(), city.id)).await.unwrap();
    let mut property = Property::new("Plot 7".into(), phase.id, PropertyType::Land, 5_000_000);
    property.agent_id = Some(agent.id.clone());
    app.state.property_repo.create(&property).await.unwrap();

    let res = submit(&app, &session, &agent, &edit_fields(&agent, "delete")).await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    let html = body_text(res).await;
    assert!(html.contains("Unable to delete user: Record is still referenced by other records"));
    assert!(app.user(&agent.id).await.is_some());
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let app = TestApp::new().await;
    let (admin, session) = admin_session(&app).await;

    let res = submit(&app, &session, &admin, &edit_fields(&admin, "delete")).await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert!(body_text(res).await.contains("Cannot delete yourself"));
    assert!(app.user(&admin.id).await.is_some());
}

#[tokio::test]
async fn test_discard_leaves_user_untouched() {
    let app = TestApp::new().await;
    let (_, session) = admin_session(&app).await;
    let agent = app.seed_user("agent1", Role::Agent).await;

    let fields = with(edit_fields(&agent, "discard"), "first_name", "");
    let res = submit(&app, &session, &agent, &fields).await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(set_cookie(&res, "flash").is_none());
    assert_eq!(app.user(&agent.id).await.unwrap(), agent);
}

#[tokio::test]
async fn test_form_without_csrf_token_is_forbidden() {
    let app = TestApp::new().await;
    let (_, session) = admin_session(&app).await;
    let agent = app.seed_user("agent1", Role::Agent).await;

    let fields = edit_fields(&agent, "delete");
    let borrowed: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
    let res = app.post_raw(&session, &format!("/users/{}/edit", agent.id), &borrowed).await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert!(app.user(&agent.id).await.is_some());
}

#[tokio::test]
async fn test_agent_cannot_reach_user_editor() {
    let app = TestApp::new().await;
    let agent = app.seed_user("agent1", Role::Agent).await;
    let session = app.login("agent1", PASSWORD).await;

    let res = app.get(&session, &format!("/users/{}/edit", agent.id)).await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_user_from_list_page() {
    let app = TestApp::new().await;
    let (_, session) = admin_session(&app).await;

    let res = app.post_form(&session, "/users", &[
        ("first_name", "Ngozi"),
        ("last_name", "Eze"),
        ("email", "ngozi@example.com"),
        ("username", "ngozi"),
        ("phone_number", "08031111111"),
        ("role", "ACCOUNTANT"),
        ("password", "first-pass"),
    ]).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let created = app.state.user_directory.find_by_username("ngozi").await.unwrap().unwrap();
    assert_eq!(created.roles, RoleSet::single(Role::Accountant));
    assert_eq!(app.try_login("ngozi", "first-pass").await.status(), StatusCode::SEE_OTHER);

    // Same username again is refused.
    let res = app.post_form(&session, "/users", &[
        ("first_name", "N"),
        ("last_name", "E"),
        ("email", "n@example.com"),
        ("username", "ngozi"),
        ("phone_number", "0803"),
        ("role", "CLIENT"),
        ("password", "x"),
    ]).await;
    let flash = set_cookie(&res, "flash").unwrap();
    let html = body_text(app.get_with_cookies(&format!("{}; flash={}", session.cookie(), flash), "/users").await).await;
    assert!(html.contains("Unable to create user: Username already exists"));
}
