//! Role-gated navigation.
//!
//! The drawer is driven by a declarative table: each [`Destination`] names
//! the roles allowed to see it, and a principal sees a destination when it
//! holds at least one of them. Declaration order is display order.

use std::collections::BTreeSet;
use serde::Serialize;
use crate::domain::models::role::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Destination {
    pub label: &'static str,
    pub icon: &'static str,
    pub route: &'static str,
    #[serde(skip)]
    pub allowed: &'static [Role],
}

impl Destination {
    pub fn permits(&self, authorities: &BTreeSet<String>) -> bool {
        self.allowed.iter().any(|r| authorities.contains(r.authority()))
    }
}

const EVERYONE: &[Role] = &Role::ALL;

pub const DEFAULT_DESTINATIONS: &[Destination] = &[
    Destination {
        label: "Dashboard",
        icon: "dashboard",
        route: "/dashboard",
        allowed: EVERYONE,
    },
    Destination {
        label: "Location",
        icon: "location-arrow",
        route: "/location",
        allowed: &[Role::Admin, Role::Manager],
    },
    Destination {
        label: "Users",
        icon: "users",
        route: "/users",
        allowed: &[Role::Admin, Role::Manager, Role::ItSupport],
    },
    Destination {
        label: "Properties",
        icon: "workplace",
        route: "/properties",
        allowed: &[Role::Admin, Role::Manager, Role::Agent, Role::Client],
    },
    Destination {
        label: "Finances",
        icon: "bar-chart",
        route: "/finances",
        allowed: &[Role::Admin, Role::Manager, Role::Accountant, Role::Client],
    },
    Destination {
        label: "Support",
        icon: "headset",
        route: "/support",
        allowed: EVERYONE,
    },
    Destination {
        label: "Logs",
        icon: "clipboard-text",
        route: "/logs",
        allowed: &[Role::Admin, Role::Manager, Role::ItSupport],
    },
];

#[derive(Debug, Clone)]
pub struct NavigationPolicy {
    destinations: Vec<Destination>,
}

impl Default for NavigationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_DESTINATIONS.to_vec())
    }
}

impl NavigationPolicy {
    pub fn new(destinations: Vec<Destination>) -> Self {
        Self { destinations }
    }

    /// Destinations visible to a principal holding `authorities`, in
    /// declaration order.
    pub fn visible(&self, authorities: &BTreeSet<String>) -> Vec<&Destination> {
        self.destinations
            .iter()
            .filter(|d| d.permits(authorities))
            .collect()
    }

    /// Whether `route` may be opened. Routes outside the table are not
    /// gated here.
    pub fn permits(&self, route: &str, authorities: &BTreeSet<String>) -> bool {
        self.destinations
            .iter()
            .find(|d| d.route == route)
            .map(|d| d.permits(authorities))
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authorities(roles: &[Role]) -> BTreeSet<String> {
        roles.iter().map(|r| r.authority().to_string()).collect()
    }

    fn labels(policy: &NavigationPolicy, roles: &[Role]) -> Vec<&'static str> {
        policy.visible(&authorities(roles)).iter().map(|d| d.label).collect()
    }

    #[test]
    fn test_empty_role_set_sees_nothing() {
        let policy = NavigationPolicy::default();
        assert!(policy.visible(&BTreeSet::new()).is_empty());

        let unknown: BTreeSet<String> = ["ROLE_JANITOR".to_string()].into();
        assert!(policy.visible(&unknown).is_empty());
    }

    #[test]
    fn test_admin_sees_everything_in_declared_order() {
        let policy = NavigationPolicy::default();
        assert_eq!(
            labels(&policy, &[Role::Admin]),
            vec!["Dashboard", "Location", "Users", "Properties", "Finances", "Support", "Logs"]
        );
    }

    #[test]
    fn test_single_role_tables() {
        let policy = NavigationPolicy::default();
        assert_eq!(labels(&policy, &[Role::Agent]), vec!["Dashboard", "Properties", "Support"]);
        assert_eq!(labels(&policy, &[Role::Accountant]), vec!["Dashboard", "Finances", "Support"]);
        assert_eq!(labels(&policy, &[Role::Cro]), vec!["Dashboard", "Support"]);
        assert_eq!(labels(&policy, &[Role::Client]), vec!["Dashboard", "Properties", "Finances", "Support"]);
        assert_eq!(labels(&policy, &[Role::ItSupport]), vec!["Dashboard", "Users", "Support", "Logs"]);
    }

    #[test]
    fn test_union_of_roles_matches_set_definition() {
        let policy = NavigationPolicy::default();
        let mut roles: Vec<Role> = Vec::new();
        // Every subset of the seven roles.
        for mask in 0u32..(1 << Role::ALL.len()) {
            roles.clear();
            for (i, role) in Role::ALL.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    roles.push(*role);
                }
            }
            let held = authorities(&roles);
            let expected: Vec<&str> = DEFAULT_DESTINATIONS
                .iter()
                .filter(|d| d.allowed.iter().any(|r| roles.contains(r)))
                .map(|d| d.route)
                .collect();
            let actual: Vec<&str> = policy.visible(&held).iter().map(|d| d.route).collect();
            assert_eq!(actual, expected, "mask {:#b}", mask);
        }
    }

    #[test]
    fn test_route_gating() {
        let policy = NavigationPolicy::default();
        let agent = authorities(&[Role::Agent]);
        assert!(policy.permits("/properties", &agent));
        assert!(!policy.permits("/users", &agent));
        assert!(policy.permits("/profile", &agent));
    }

    #[test]
    fn test_custom_table_is_declarative() {
        let policy = NavigationPolicy::new(vec![
            Destination { label: "Reports", icon: "chart", route: "/reports", allowed: &[Role::Cro] },
        ]);
        assert_eq!(labels(&policy, &[Role::Cro]), vec!["Reports"]);
        assert!(labels(&policy, &[Role::Admin]).is_empty());
    }
}
