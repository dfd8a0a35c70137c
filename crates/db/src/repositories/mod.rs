//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! an executor (`&PgPool`, `&mut PgConnection` or a transaction) first.

pub mod category_repo;
pub mod document_category_repo;

pub use category_repo::CategoryRepo;
pub use document_category_repo::DocumentCategoryRepo;
