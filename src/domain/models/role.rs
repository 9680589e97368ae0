use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Fixed set of roles a user can hold. Stored as the bare name
/// (`ADMIN`), presented to the authorization layer as `ROLE_ADMIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    Agent,
    Accountant,
    Cro,
    Client,
    ItSupport,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Admin,
        Role::Manager,
        Role::Agent,
        Role::Accountant,
        Role::Cro,
        Role::Client,
        Role::ItSupport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Agent => "AGENT",
            Role::Accountant => "ACCOUNTANT",
            Role::Cro => "CRO",
            Role::Client => "CLIENT",
            Role::ItSupport => "IT_SUPPORT",
        }
    }

    pub fn authority(&self) -> &'static str {
        match self {
            Role::Admin => "ROLE_ADMIN",
            Role::Manager => "ROLE_MANAGER",
            Role::Agent => "ROLE_AGENT",
            Role::Accountant => "ROLE_ACCOUNTANT",
            Role::Cro => "ROLE_CRO",
            Role::Client => "ROLE_CLIENT",
            Role::ItSupport => "ROLE_IT_SUPPORT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let name = name.strip_prefix("ROLE_").unwrap_or(name);
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == name)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Non-empty set of roles held by a user.
///
/// Persisted as a comma separated column (`ADMIN,MANAGER`) so the users
/// table stays a single row per user on both database backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Role>", into = "Vec<Role>")]
pub struct RoleSet(BTreeSet<Role>);

impl RoleSet {
    pub fn single(role: Role) -> Self {
        Self(BTreeSet::from([role]))
    }

    pub fn new<I: IntoIterator<Item = Role>>(roles: I) -> Result<Self, EmptyRoleSet> {
        let set: BTreeSet<Role> = roles.into_iter().collect();
        if set.is_empty() {
            return Err(EmptyRoleSet);
        }
        Ok(Self(set))
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0.contains(&role)
    }

    /// The role a single-selection control shows for this set.
    pub fn first(&self) -> Role {
        // Non-empty by construction.
        *self.0.iter().next().unwrap_or(&Role::Client)
    }

    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.0.iter().copied()
    }

    pub fn authorities(&self) -> BTreeSet<String> {
        self.0.iter().map(|r| r.authority().to_string()).collect()
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Role::as_str).collect();
        f.write_str(&names.join(","))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleSetError {
    #[error("A user must hold at least one role")]
    Empty,
    #[error(transparent)]
    Unknown(#[from] UnknownRole),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("A user must hold at least one role")]
pub struct EmptyRoleSet;

impl From<EmptyRoleSet> for RoleSetError {
    fn from(_: EmptyRoleSet) -> Self {
        RoleSetError::Empty
    }
}

impl TryFrom<String> for RoleSet {
    type Error = RoleSetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let roles = value
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(Role::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RoleSet::new(roles)?)
    }
}

impl TryFrom<Vec<Role>> for RoleSet {
    type Error = EmptyRoleSet;

    fn try_from(value: Vec<Role>) -> Result<Self, Self::Error> {
        RoleSet::new(value)
    }
}

impl From<RoleSet> for Vec<Role> {
    fn from(value: RoleSet) -> Self {
        value.0.into_iter().collect()
    }
}
