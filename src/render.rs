//! Template rendering module
//!
//! Page templates are parsed once at startup and shared read-only by every
//! request. A template that fails to parse aborts startup.

use crate::store::Page;
use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

/// Template used to display a page
pub const VIEW: &str = "view";
/// Template holding the edit form
pub const EDIT: &str = "edit";
/// Template for the not-found route
pub const NOT_FOUND: &str = "notfound";

const TEMPLATE_NAMES: [&str; 3] = [VIEW, EDIT, NOT_FOUND];

/// Data handed to page templates
#[derive(Debug, Serialize)]
struct PageContext<'a> {
    title: &'a str,
    body: &'a str,
}

/// The parsed template set
pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    /// Parse `<dir>/view.html`, `<dir>/edit.html` and `<dir>/notfound.html`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, handlebars::TemplateError> {
        let dir = dir.as_ref();
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);

        for name in TEMPLATE_NAMES {
            registry.register_template_file(name, dir.join(format!("{name}.html")))?;
        }

        Ok(Self { registry })
    }

    /// Fill the named template with a page's title and body
    pub fn render_page(&self, name: &str, page: &Page) -> Result<String, handlebars::RenderError> {
        let body = page.body_text();
        let ctx = PageContext {
            title: &page.title,
            body: &body,
        };
        self.registry.render(name, &ctx)
    }

    /// Render the not-found page
    pub fn render_not_found(&self) -> Result<String, handlebars::RenderError> {
        self.registry.render(NOT_FOUND, &serde_json::json!({}))
    }
}
