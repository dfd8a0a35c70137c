pub mod categories;
pub mod documents;
