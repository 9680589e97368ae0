//! Server-side rendering: template registry, page chrome and flash
//! notifications carried across redirects.

use std::sync::Arc;
use axum::response::Html;
use tera::{Context, Tera};
use tower_cookies::{Cookie, Cookies};
use tracing::{error, warn};

use crate::domain::models::{auth::Principal, notification::Notification};
use crate::domain::services::shell::Shell;
use crate::error::AppError;
use crate::state::AppState;

pub const FLASH_COOKIE: &str = "flash";

pub fn load_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", include_str!("../../templates/base.html")),
        ("layout.html", include_str!("../../templates/layout.html")),
        ("login.html", include_str!("../../templates/login.html")),
        ("dashboard.html", include_str!("../../templates/dashboard.html")),
        ("placeholder.html", include_str!("../../templates/placeholder.html")),
        ("users.html", include_str!("../../templates/users.html")),
        ("user_edit.html", include_str!("../../templates/user_edit.html")),
        ("profile_edit.html", include_str!("../../templates/profile_edit.html")),
        ("location.html", include_str!("../../templates/location.html")),
        ("city_edit.html", include_str!("../../templates/city_edit.html")),
        ("properties.html", include_str!("../../templates/properties.html")),
        ("property_edit.html", include_str!("../../templates/property_edit.html")),
    ])?;
    Ok(tera)
}

/// Rejects principals who may not open `route`.
pub fn ensure_permitted(state: &AppState, principal: &Principal, route: &str) -> Result<(), AppError> {
    if state.navigation.permits(route, &principal.authorities) {
        Ok(())
    } else {
        warn!("User {} denied access to {}", principal.user_id, route);
        Err(AppError::Forbidden(format!("Access to {} denied", route)))
    }
}

/// A page being rendered inside the shell.
pub struct Page {
    state: Arc<AppState>,
    pub shell: Shell,
}

impl Page {
    /// Composes the shell for `principal`, then marks the active link for
    /// the path the request resolved to.
    pub fn new(state: &Arc<AppState>, principal: &Principal, path: &str, cookies: &Cookies) -> Self {
        let mut shell = Shell::compose(&state.navigation, principal);
        shell.after_navigation(path);
        for notification in take_flash(cookies) {
            shell.notify(notification);
        }
        Self { state: state.clone(), shell }
    }

    pub fn notify_all(&mut self, notifications: Vec<Notification>) {
        for notification in notifications {
            self.shell.notify(notification);
        }
    }

    pub fn render(self, template: &str, mut ctx: Context) -> Result<Html<String>, AppError> {
        ctx.insert("shell", &self.shell);
        render(&self.state.templates, template, &ctx)
    }
}

pub fn render(templates: &Tera, template: &str, ctx: &Context) -> Result<Html<String>, AppError> {
    templates.render(template, ctx).map(Html).map_err(|e| {
        error!("Template {} failed to render: {:?}", template, e);
        AppError::InternalWithMsg(format!("Template error in {}", template))
    })
}

/// Stores notifications for the next rendered page.
pub fn push_flash(cookies: &Cookies, notifications: &[Notification]) {
    if notifications.is_empty() {
        return;
    }
    match serde_json::to_vec(notifications) {
        Ok(bytes) => {
            let mut cookie = Cookie::new(FLASH_COOKIE, hex::encode(bytes));
            cookie.set_path("/");
            cookie.set_http_only(true);
            cookies.add(cookie);
        }
        Err(e) => error!("Failed to encode flash notifications: {}", e),
    }
}

pub fn take_flash(cookies: &Cookies) -> Vec<Notification> {
    let Some(cookie) = cookies.get(FLASH_COOKIE) else {
        return Vec::new();
    };
    let value = cookie.value().to_string();
    cookies.remove(Cookie::build((FLASH_COOKIE, "")).path("/").into());

    hex::decode(value)
        .ok()
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::role::Role;
    use crate::domain::services::navigation::NavigationPolicy;

    #[test]
    fn test_templates_compile() {
        let tera = load_templates().unwrap();
        for name in ["layout.html", "users.html", "user_edit.html", "property_edit.html"] {
            assert!(tera.get_template_names().any(|n| n == name), "missing {}", name);
        }
    }

    #[test]
    fn test_layout_marks_active_link() {
        let tera = load_templates().unwrap();
        let principal = Principal {
            user_id: "u".into(),
            username: "manager1".into(),
            authorities: [Role::Manager.authority().to_string()].into(),
            csrf_token: "tok".into(),
        };
        let mut shell = Shell::compose(&NavigationPolicy::default(), &principal);
        shell.after_navigation("/location");
        shell.notify(Notification::success("Saved <b>"));

        let mut ctx = Context::new();
        ctx.insert("shell", &shell);
        ctx.insert("title", "Finances");
        ctx.insert("message", "Coming soon");
        let html = render(&tera, "placeholder.html", &ctx).unwrap().0;

        assert!(html.contains(r#"<a class="drawer-link active-link" href="/location" aria-current="page">"#));
        assert!(html.contains(r#"<a class="drawer-link" href="/users">"#));
        assert!(!html.contains(r#"href="/location/"#));
        assert_eq!(html.matches("active-link").count(), 1);
        assert!(html.contains("Saved &lt;b&gt;"));
    }
}
