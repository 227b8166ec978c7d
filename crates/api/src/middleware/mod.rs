//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller, resolved from a Bearer token and
//!   reloaded from the database.
//! - [`auth::MaybeUser`] -- optional variant; bad or missing tokens mean anonymous.
//! - [`rbac::RequireEditor`], [`rbac::RequireAdmin`], [`rbac::RequireSuperAdmin`]
//!   -- minimum-role gates over [`auth::AuthUser`].

pub mod auth;
pub mod rbac;
