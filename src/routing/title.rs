//! Title extraction module
//!
//! Maps a request path onto a route kind and a validated page title.

use thiserror::Error;

/// Title served for the bare `/` path
pub const ROOT_TITLE: &str = "index";

/// Handler selected by the first path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    View,
    Edit,
    Save,
    Static,
}

impl RouteKind {
    /// Match a route prefix segment (`view`, `edit`, `save`, `static`)
    fn from_prefix(segment: &str) -> Option<Self> {
        match segment {
            "view" => Some(Self::View),
            "edit" => Some(Self::Edit),
            "save" => Some(Self::Save),
            "static" => Some(Self::Static),
            _ => None,
        }
    }
}

/// A dispatched route: which handler to run, and for which title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub kind: RouteKind,
    pub title: String,
}

/// Reasons a path cannot be turned into a title
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("path traversal segment in '{0}'")]
    Traversal(String),
    #[error("empty title in '{0}'")]
    EmptyTitle(String),
    #[error("empty or '.' segment in '{0}'")]
    BadSegment(String),
    #[error("forbidden character in '{0}'")]
    ForbiddenChar(String),
}

/// Extract the route and page title from a raw URI path.
///
/// `/` is the root page. A leading `view`, `edit`, `save` or `static`
/// segment selects the handler and is stripped; any other path is a view
/// of the whole path, so `/hello` and `/docs/intro` are pages too.
///
/// The path is used as-is: percent-encoded bytes are not decoded, so
/// `%2e%2e` never turns into a parent directory reference.
///
/// # Examples
/// ```
/// use pagewiki::routing::{extract, RouteKind};
/// let route = extract("/edit/foo").unwrap();
/// assert_eq!(route.kind, RouteKind::Edit);
/// assert_eq!(route.title, "foo");
/// assert!(extract("/view/../secret").is_err());
/// ```
pub fn extract(path: &str) -> Result<Route, RouteError> {
    if path == "/" {
        return Ok(Route {
            kind: RouteKind::View,
            title: ROOT_TITLE.to_string(),
        });
    }

    let segments: Vec<&str> = path.strip_prefix('/').unwrap_or(path).split('/').collect();

    // `..` anywhere rejects the request, regardless of prefix
    if segments.iter().any(|s| *s == "..") {
        return Err(RouteError::Traversal(path.to_string()));
    }

    let (kind, rest) = match segments.split_first() {
        Some((first, rest)) => match RouteKind::from_prefix(first) {
            Some(kind) => (kind, rest),
            None => (RouteKind::View, segments.as_slice()),
        },
        None => (RouteKind::View, segments.as_slice()),
    };

    let title = rest.join("/");
    validate_title(&title, rest, path)?;

    Ok(Route { kind, title })
}

fn validate_title(title: &str, segments: &[&str], path: &str) -> Result<(), RouteError> {
    if title.is_empty() {
        return Err(RouteError::EmptyTitle(path.to_string()));
    }
    if segments.iter().any(|s| s.is_empty() || *s == ".") {
        return Err(RouteError::BadSegment(path.to_string()));
    }
    if title.contains(['\0', '\\']) {
        return Err(RouteError::ForbiddenChar(path.to_string()));
    }
    Ok(())
}

/// Where to send the client after saving `title`
pub fn view_location(title: &str) -> String {
    if title == ROOT_TITLE {
        "/".to_string()
    } else {
        format!("/{title}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route(kind: RouteKind, title: &str) -> Route {
        Route {
            kind,
            title: title.to_string(),
        }
    }

    #[test]
    fn test_root_is_index() {
        assert_eq!(extract("/"), Ok(route(RouteKind::View, "index")));
    }

    #[test]
    fn test_prefixed_routes() {
        assert_eq!(extract("/view/foo"), Ok(route(RouteKind::View, "foo")));
        assert_eq!(extract("/edit/foo"), Ok(route(RouteKind::Edit, "foo")));
        assert_eq!(extract("/save/foo"), Ok(route(RouteKind::Save, "foo")));
        assert_eq!(
            extract("/static/css/site.css"),
            Ok(route(RouteKind::Static, "css/site.css"))
        );
    }

    #[test]
    fn test_shorthand_and_nested_titles() {
        assert_eq!(extract("/hello"), Ok(route(RouteKind::View, "hello")));
        assert_eq!(
            extract("/docs/intro"),
            Ok(route(RouteKind::View, "docs/intro"))
        );
        assert_eq!(
            extract("/edit/docs/intro"),
            Ok(route(RouteKind::Edit, "docs/intro"))
        );
    }

    #[test]
    fn test_only_first_segment_is_a_prefix() {
        assert_eq!(
            extract("/view/edit/x"),
            Ok(route(RouteKind::View, "edit/x"))
        );
    }

    #[test]
    fn test_traversal_rejected() {
        for path in [
            "/..",
            "/view/..",
            "/edit/../etc/passwd",
            "/save/a/../../b",
            "/static/../pages/index.htm",
            "/a/b/..",
        ] {
            assert!(
                matches!(extract(path), Err(RouteError::Traversal(_))),
                "{path} should be rejected"
            );
        }
    }

    #[test]
    fn test_dots_inside_a_segment_are_allowed() {
        assert_eq!(
            extract("/view/v1..2"),
            Ok(route(RouteKind::View, "v1..2"))
        );
        assert_eq!(
            extract("/view/%2e%2e"),
            Ok(route(RouteKind::View, "%2e%2e"))
        );
    }

    #[test]
    fn test_empty_title_rejected() {
        assert!(matches!(extract("/edit/"), Err(RouteError::EmptyTitle(_))));
        assert!(matches!(extract("/view"), Err(RouteError::EmptyTitle(_))));
        assert!(matches!(extract(""), Err(RouteError::EmptyTitle(_))));
    }

    #[test]
    fn test_bad_segments_rejected() {
        assert!(matches!(extract("/view/a//b"), Err(RouteError::BadSegment(_))));
        assert!(matches!(extract("/view/a/"), Err(RouteError::BadSegment(_))));
        assert!(matches!(extract("/view/./a"), Err(RouteError::BadSegment(_))));
    }

    #[test]
    fn test_forbidden_chars_rejected() {
        assert!(matches!(
            extract("/view/a\\b"),
            Err(RouteError::ForbiddenChar(_))
        ));
        assert!(matches!(
            extract("/view/a\0b"),
            Err(RouteError::ForbiddenChar(_))
        ));
    }

    #[test]
    fn test_view_location() {
        assert_eq!(view_location("index"), "/");
        assert_eq!(view_location("hello"), "/hello");
        assert_eq!(view_location("docs/intro"), "/docs/intro");
    }
}
