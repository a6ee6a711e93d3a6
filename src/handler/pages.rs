//! Page handlers
//!
//! View, edit and save: each one loads or writes a single page file and
//! answers with a rendered template or a redirect.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;
use crate::render;
use crate::routing::view_location;
use crate::store::Page;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use percent_encoding::percent_decode;

/// Form field holding the page content
const BODY_FIELD: &[u8] = b"body";

/// Show a page, or send the client to the not-found route
pub async fn view(ctx: &RequestContext, state: &AppState, title: &str) -> Response<Full<Bytes>> {
    match state.store.load(title).await {
        Ok(page) => render_page(ctx, state, render::VIEW, &page),
        Err(e) => {
            log::debug!("[View] {e}");
            http::build_redirect_response(&state.config.routes.not_found_path)
        }
    }
}

/// Show the edit form; a page that does not exist yet opens blank
pub async fn edit(ctx: &RequestContext, state: &AppState, title: &str) -> Response<Full<Bytes>> {
    let page = state
        .store
        .load(title)
        .await
        .unwrap_or_else(|_| Page::empty(title));
    render_page(ctx, state, render::EDIT, &page)
}

/// Persist the submitted `body` field and redirect to the page
pub async fn save(state: &AppState, title: &str, form: &[u8]) -> Response<Full<Bytes>> {
    let page = Page::new(title, form_body(form));
    match state.store.save(&page).await {
        Ok(path) => {
            logger::log_page_saved(title, &path, page.body.len());
            http::build_redirect_response(&view_location(title))
        }
        Err(e) => {
            logger::log_error(&format!("[Save] Failed to write '{title}': {e}"));
            http::build_500_response(&e.to_string())
        }
    }
}

/// Render the not-found page with a 404 status
pub fn not_found(ctx: &RequestContext, state: &AppState) -> Response<Full<Bytes>> {
    match state.templates.render_not_found() {
        Ok(html) => http::build_html_response(StatusCode::NOT_FOUND, html, ctx.is_head),
        Err(e) => render_failed(render::NOT_FOUND, &e),
    }
}

fn render_page(
    ctx: &RequestContext,
    state: &AppState,
    template: &str,
    page: &Page,
) -> Response<Full<Bytes>> {
    match state.templates.render_page(template, page) {
        Ok(html) => http::build_html_response(StatusCode::OK, html, ctx.is_head),
        Err(e) => render_failed(template, &e),
    }
}

/// First `body` value of an urlencoded form, decoded to raw bytes
///
/// A missing field yields an empty body. Decoded bytes are kept as-is, so
/// content that is not UTF-8 survives the trip to disk.
fn form_body(form: &[u8]) -> Vec<u8> {
    form.split(|&b| b == b'&')
        .find_map(|pair| {
            let mut parts = pair.splitn(2, |&b| b == b'=');
            let name = parts.next()?;
            (decode_component(name) == BODY_FIELD)
                .then(|| decode_component(parts.next().unwrap_or_default()))
        })
        .unwrap_or_default()
}

/// `+` is a space, then `%XX` escapes; malformed escapes pass through
fn decode_component(raw: &[u8]) -> Vec<u8> {
    let spaced: Vec<u8> = raw
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect();
    percent_decode(&spaced).collect()
}

fn render_failed(template: &str, err: &handlebars::RenderError) -> Response<Full<Bytes>> {
    logger::log_error(&format!("Template render error ({template}): {err}"));
    http::build_500_response(&err.to_string())
}
