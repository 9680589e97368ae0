use serde::Serialize;
use crate::domain::models::{auth::Principal, notification::Notification};
use crate::domain::services::navigation::NavigationPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: String,
    pub icon: String,
    pub href: String,
    pub active: bool,
}

/// Page chrome around every back-office view: header with drawer toggle and
/// profile button, the role-filtered drawer, the logout button and any
/// pending notifications.
#[derive(Debug, Clone, Serialize)]
pub struct Shell {
    pub username: String,
    pub csrf_token: String,
    pub links: Vec<NavLink>,
    pub notifications: Vec<Notification>,
}

impl Shell {
    pub fn compose(policy: &NavigationPolicy, principal: &Principal) -> Self {
        let links = policy
            .visible(&principal.authorities)
            .into_iter()
            .map(|d| NavLink {
                label: d.label.to_string(),
                icon: d.icon.to_string(),
                href: d.route.to_string(),
                active: false,
            })
            .collect();

        Self {
            username: principal.username.clone(),
            csrf_token: principal.csrf_token.clone(),
            links,
            notifications: Vec::new(),
        }
    }

    /// Marks the link whose href equals `path` as active and clears every
    /// other link. Call once the route has resolved.
    pub fn after_navigation(&mut self, path: &str) {
        for link in &mut self.links {
            link.active = link.href == path;
        }
    }

    pub fn active_link(&self) -> Option<&NavLink> {
        self.links.iter().find(|l| l.active)
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }
}
