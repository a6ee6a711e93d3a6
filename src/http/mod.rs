//! HTTP protocol layer module
//!
//! Response builders, MIME detection and `ETag` handling shared by the page
//! handlers and the static asset passthrough.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_304_response, build_400_response, build_404_response, build_405_response,
    build_413_response, build_500_response, build_html_response, build_options_response,
    build_redirect_response,
};
