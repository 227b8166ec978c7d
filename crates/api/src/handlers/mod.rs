//! Request handlers, one submodule per resource.
//!
//! Handlers validate input, delegate persistence to the repositories in
//! `yemenpedia_db`, apply domain rules from `yemenpedia_core` and map
//! failures via [`crate::error::AppError`].

pub mod ai;
pub mod articles;
pub mod auth;
pub mod categories;
pub mod search;
pub mod sources;
pub mod users;
