//! Static file serving module
//!
//! Serves assets under `/static/` from the configured directory.

use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::Path;
use tokio::fs;

/// Serve `relative_path` from `static_dir`
pub async fn serve(
    ctx: &RequestContext,
    static_dir: &str,
    relative_path: &str,
) -> Response<Full<Bytes>> {
    match load_from_directory(static_dir, relative_path).await {
        Some((content, content_type)) => build_static_file_response(
            content,
            content_type,
            ctx.if_none_match.as_deref(),
            ctx.is_head,
        ),
        None => http::build_404_response(),
    }
}

/// Load a file from `static_dir`, refusing anything that resolves outside it
pub async fn load_from_directory(
    static_dir: &str,
    relative_path: &str,
) -> Option<(Vec<u8>, &'static str)> {
    let file_path = Path::new(static_dir).join(relative_path);

    let static_dir_canonical = match fs::canonicalize(static_dir).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    // Missing files are common (404), no need to log
    let file_path_canonical = fs::canonicalize(&file_path).await.ok()?;
    if !file_path_canonical.starts_with(&static_dir_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {relative_path} -> {}",
            file_path_canonical.display()
        ));
        return None;
    }
    if !fs::metadata(&file_path_canonical).await.ok()?.is_file() {
        return None;
    }

    let content = match fs::read(&file_path_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

/// Build static file response with `ETag` support
fn build_static_file_response(
    data: Vec<u8>,
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);

    // Check if client has cached version
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::response::build_cached_response(Bytes::from(data), content_type, &etag, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn static_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("css")).unwrap();
        std::fs::write(dir.path().join("css/site.css"), b"body {}").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_load_existing_file() {
        let dir = static_dir();
        let (content, content_type) =
            load_from_directory(dir.path().to_str().unwrap(), "css/site.css")
                .await
                .unwrap();
        assert_eq!(content, b"body {}");
        assert_eq!(content_type, "text/css; charset=utf-8");
    }

    #[tokio::test]
    async fn test_missing_file_and_directory() {
        let dir = static_dir();
        let root = dir.path().to_str().unwrap();
        assert!(load_from_directory(root, "css/missing.css").await.is_none());
        assert!(load_from_directory(root, "css").await.is_none());
        assert!(load_from_directory("/nonexistent/static", "a.css").await.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_blocked() {
        let outside = TempDir::new().unwrap();
        std::fs::write(outside.path().join("secret.txt"), b"secret").unwrap();

        let dir = static_dir();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("escape")).unwrap();

        let root = dir.path().to_str().unwrap();
        assert!(load_from_directory(root, "escape/secret.txt").await.is_none());
    }

    #[test]
    fn test_etag_hit_is_304() {
        let etag = cache::generate_etag(b"body {}");
        let resp =
            build_static_file_response(b"body {}".to_vec(), "text/css", Some(&etag), false);
        assert_eq!(resp.status(), 304);

        let resp = build_static_file_response(b"body {}".to_vec(), "text/css", None, false);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["ETag"], etag.as_str());
    }
}
