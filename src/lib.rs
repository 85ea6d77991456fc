//! Bookshelf: an authors and books catalog served over HTTP.
//!
//! The catalog logic lives in the `authors` and `books` modules, which talk
//! to storage only through [`store::CatalogStore`].

pub mod app;
pub mod error;
pub mod modules;
pub mod response;
pub mod store;
pub mod utils;
pub mod validation;

pub use app::Application;
pub use error::{CatalogError, ValidationError};
