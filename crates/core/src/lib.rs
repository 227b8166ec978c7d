//! Domain rules for the Yemenpedia encyclopedia.
//!
//! Zero internal dependencies: everything here is pure logic shared by the
//! repository layer, the HTTP API and the seed tooling.

pub mod article;
pub mod assistant;
pub mod category;
pub mod error;
pub mod moderation;
pub mod pagination;
pub mod roles;
pub mod search;
pub mod source;
pub mod types;
