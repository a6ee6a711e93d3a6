// Application state module
// Immutable after startup, shared by every connection through an Arc

use std::sync::atomic::AtomicUsize;

use super::types::Config;
use crate::render::Templates;
use crate::store::PageStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub templates: Templates,
    pub store: PageStore,
    /// Connections currently being served
    pub active_connections: AtomicUsize,
}

impl AppState {
    /// Build the state from configuration, parsing the template set.
    ///
    /// Fails if any template is missing or malformed.
    pub fn new(config: &Config) -> Result<Self, handlebars::TemplateError> {
        let templates = Templates::load(&config.templates.dir)?;
        Ok(Self::with_templates(config, templates))
    }

    /// Build the state around an already parsed template set
    pub fn with_templates(config: &Config, templates: Templates) -> Self {
        let store = PageStore::new(&config.storage.pages_dir, &config.storage.extension);
        Self {
            config: config.clone(),
            templates,
            store,
            active_connections: AtomicUsize::new(0),
        }
    }
}
