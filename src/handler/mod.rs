//! Request handler module
//!
//! Responsible for request routing dispatch and the page handlers
//! (view, edit, save), plus static asset passthrough.

pub mod pages;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
