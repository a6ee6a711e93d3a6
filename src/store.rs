//! Page persistence module
//!
//! One flat file per page under the pages directory. A page's file path is
//! derived from its title alone, so `load` always finds what `save` wrote.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;

/// A titled unit of content backed by exactly one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub body: Vec<u8>,
}

impl Page {
    pub fn new(title: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// A page with no content, used when editing a page that does not exist yet
    pub fn empty(title: impl Into<String>) -> Self {
        Self::new(title, Vec::new())
    }

    /// Body as text for template rendering
    pub fn body_text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Page store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The page file could not be read; the page does not exist yet
    #[error("page '{title}' not found")]
    NotFound {
        title: String,
        #[source]
        source: io::Error,
    },
    /// The page file could not be written
    #[error("{source}")]
    Io {
        title: String,
        #[source]
        source: io::Error,
    },
}

/// Filesystem-backed page store
#[derive(Debug, Clone)]
pub struct PageStore {
    root: PathBuf,
    extension: String,
}

impl PageStore {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    /// File backing `title`: `<root>/<title>.<extension>`
    ///
    /// Titles must already be validated by the router; nested titles map to
    /// subdirectories.
    pub fn path_for(&self, title: &str) -> PathBuf {
        self.root.join(format!("{title}.{}", self.extension))
    }

    /// Load a page by title
    pub async fn load(&self, title: &str) -> Result<Page, StoreError> {
        let path = self.path_for(title);
        match fs::read(&path).await {
            Ok(body) => Ok(Page::new(title, body)),
            Err(source) => Err(StoreError::NotFound {
                title: title.to_string(),
                source,
            }),
        }
    }

    /// Write a page, replacing any previous content
    pub async fn save(&self, page: &Page) -> Result<PathBuf, StoreError> {
        let path = self.path_for(&page.title);
        let io_err = |source| StoreError::Io {
            title: page.title.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(io_err)?;
            }
        }
        fs::write(&path, &page.body).await.map_err(io_err)?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (TempDir, PageStore) {
        let dir = TempDir::new().unwrap();
        let store = PageStore::new(dir.path().join("pages"), "htm");
        (dir, store)
    }

    #[test]
    fn test_path_for() {
        let store = PageStore::new("pages", "htm");
        assert_eq!(store.path_for("hello"), PathBuf::from("pages/hello.htm"));
        assert_eq!(
            store.path_for("docs/intro"),
            PathBuf::from("pages/docs/intro.htm")
        );
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let (_dir, store) = test_store();
        let page = Page::new("hello", "Hi");
        store.save(&page).await.unwrap();

        let loaded = store.load("hello").await.unwrap();
        assert_eq!(loaded, page);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_bytes() {
        let (_dir, store) = test_store();
        let bodies: [&[u8]; 4] = [
            b"",
            b"<b>bold</b>\n",
            b"line1\r\nline2",
            &[0xff, 0x00, 0x7f],
        ];
        for (i, body) in bodies.iter().enumerate() {
            let title = format!("page{i}");
            store.save(&Page::new(title.clone(), *body)).await.unwrap();
            assert_eq!(store.load(&title).await.unwrap().body, *body);
        }
    }

    #[tokio::test]
    async fn test_save_creates_nested_directories() {
        let (dir, store) = test_store();
        let path = store.save(&Page::new("a/b/c", "deep")).await.unwrap();

        assert_eq!(path, dir.path().join("pages/a/b/c.htm"));
        assert_eq!(std::fs::read(path).unwrap(), b"deep");
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let (_dir, store) = test_store();
        store.save(&Page::new("x", "first version")).await.unwrap();
        store.save(&Page::new("x", "2nd")).await.unwrap();
        assert_eq!(store.load("x").await.unwrap().body, b"2nd");
    }

    #[tokio::test]
    async fn test_load_missing_is_not_found() {
        let (_dir, store) = test_store();
        let err = store.load("nope").await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { ref title, .. } if title == "nope"));
    }

    #[tokio::test]
    async fn test_save_failure_is_io_error() {
        let dir = TempDir::new().unwrap();
        // A regular file where the pages directory should be
        let blocker = dir.path().join("pages");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let store = PageStore::new(blocker, "htm");

        let err = store.save(&Page::new("a/b", "x")).await.unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn test_body_text_is_lossy() {
        let page = Page::new("t", vec![b'h', b'i', 0xff]);
        assert_eq!(page.body_text(), "hi\u{fffd}");
    }
}
