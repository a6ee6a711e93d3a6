//! Routing module
//!
//! Turns request paths into route kinds and page titles:
//! - Route prefix matching (`view`, `edit`, `save`, `static`)
//! - Path traversal guard
//! - Post-save redirect targets

mod title;

pub use title::{extract, view_location, Route, RouteError, RouteKind, ROOT_TITLE};
