//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! Everything serialized to clients uses camelCase keys.

pub mod article;
pub mod category;
pub mod revision;
pub mod source;
pub mod user;
