//! pagewiki: a minimal page-editing web service.
//!
//! Pages are flat files under a pages directory. Each request maps its path
//! to a page title and runs one of three handlers: view, edit or save.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod render;
pub mod routing;
pub mod server;
pub mod store;
