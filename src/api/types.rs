//! Shared state for the HTTP layer.

use std::sync::Arc;

use crate::pipeline::source::ImageSource;
use crate::pipeline::MenuRecognizer;
use crate::store::MenuStore;

/// Shared context for all routes. Cheap to clone.
#[derive(Clone)]
pub struct ApiContext {
    pub recognizer: Arc<MenuRecognizer>,
    pub source: Arc<dyn ImageSource>,
    pub store: Arc<dyn MenuStore>,
    /// Language every incoming menu photo is recognized in.
    pub language: String,
    /// Store key the latest menu is saved under.
    pub store_key: String,
}

impl ApiContext {
    pub fn new(
        recognizer: Arc<MenuRecognizer>,
        source: Arc<dyn ImageSource>,
        store: Arc<dyn MenuStore>,
        language: &str,
        store_key: &str,
    ) -> Self {
        Self {
            recognizer,
            source,
            store,
            language: language.to_string(),
            store_key: store_key.to_string(),
        }
    }
}
