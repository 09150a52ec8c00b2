pub mod catalog;
pub mod db;
pub mod error;
pub mod fs;
pub(crate) mod schema;
