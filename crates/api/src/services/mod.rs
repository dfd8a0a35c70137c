//! Transactional services composing the core rules with the repositories.

pub mod category_service;

pub use category_service::CategoryService;
