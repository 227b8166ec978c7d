//! Privilege levels.
//!
//! Roles form a total order (`User < Editor < Admin < SuperAdmin`) so every
//! permission check is a single comparison against a per-operation minimum.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_USER: &str = "user";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_SUPER_ADMIN: &str = "super_admin";

/// All valid role names, lowest privilege first.
pub const VALID_ROLES: &[&str] = &[ROLE_USER, ROLE_EDITOR, ROLE_ADMIN, ROLE_SUPER_ADMIN];

/// A user's privilege level. Variant order is the privilege order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    User,
    Editor,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => ROLE_USER,
            Role::Editor => ROLE_EDITOR,
            Role::Admin => ROLE_ADMIN,
            Role::SuperAdmin => ROLE_SUPER_ADMIN,
        }
    }

    /// Whether this role meets or exceeds `required`.
    pub fn at_least(self, required: Role) -> bool {
        self >= required
    }

    /// Editor, admin and super-admin may author articles.
    pub fn is_privileged(self) -> bool {
        self.at_least(Role::Editor)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_USER => Ok(Role::User),
            ROLE_EDITOR => Ok(Role::Editor),
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_SUPER_ADMIN => Ok(Role::SuperAdmin),
            other => Err(CoreError::Validation(format!(
                "دور غير صالح '{other}'. الأدوار المتاحة: {}",
                VALID_ROLES.join(", ")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn privilege_order_is_total() {
        assert!(Role::User < Role::Editor);
        assert!(Role::Editor < Role::Admin);
        assert!(Role::Admin < Role::SuperAdmin);
    }

    #[test]
    fn at_least_compares_against_minimum() {
        assert!(Role::SuperAdmin.at_least(Role::Admin));
        assert!(Role::Admin.at_least(Role::Admin));
        assert!(!Role::Editor.at_least(Role::Admin));
        assert!(!Role::User.is_privileged());
        assert!(Role::Editor.is_privileged());
    }

    #[test]
    fn parse_round_trips_every_name() {
        for name in VALID_ROLES {
            let role: Role = name.parse().unwrap();
            assert_eq!(role.as_str(), *name);
        }
    }

    #[test]
    fn parse_rejects_unknown_role() {
        assert!("moderator".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
    }
}
