use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::Config;
use crate::services::name_service::PageName;
use crate::services::WikiService;

/// Free-form page metadata; sorted so the stored JSON is stable
pub type Metadata = BTreeMap<String, String>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub wiki: Arc<WikiService>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let wiki = WikiService::new(&config);
        Self { config: Arc::new(config), wiki: Arc::new(wiki) }
    }
}

/// A page as loaded from or saved to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub name: PageName,
    pub content: String,
    pub metadata: Metadata,
}

impl Page {
    /// An empty page, as shown when editing a name that does not exist yet
    pub fn empty(name: PageName) -> Self {
        Self { name, content: String::new(), metadata: Metadata::new() }
    }
}
