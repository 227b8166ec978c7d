//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod article_repo;
pub mod category_repo;
pub mod revision_repo;
pub mod search_repo;
pub mod source_repo;
pub mod user_repo;

pub use article_repo::ArticleRepo;
pub use category_repo::CategoryRepo;
pub use revision_repo::ArticleRevisionRepo;
pub use search_repo::SearchRepo;
pub use source_repo::SourceRepo;
pub use user_repo::UserRepo;
