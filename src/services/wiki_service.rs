use log::debug;

use crate::config::Config;
use crate::errors::WikiError;
use crate::services::markup_service::MarkupService;
use crate::services::name_service::PageName;
use crate::services::page_index::PageIndex;
use crate::services::page_store::PageStore;
use crate::services::path_service::PathMapper;
use crate::types::{Metadata, Page};

/// Entry point for everything the HTTP layer does with pages.
///
/// All operations take raw, unsanitized names.
pub struct WikiService {
    store: PageStore,
    index: PageIndex,
    markup: MarkupService,
}

impl WikiService {
    pub fn new(config: &Config) -> Self {
        let mapper = PathMapper::new(config.data_dir.as_ref().clone());
        Self {
            store: PageStore::new(mapper.clone()),
            index: PageIndex::new(mapper),
            markup: MarkupService::new(),
        }
    }

    pub fn store(&self) -> &PageStore {
        &self.store
    }

    pub fn load(&self, raw_name: &str) -> Result<Page, WikiError> {
        let name = PageName::parse(raw_name)?;
        self.store.load(&name)
    }

    /// Save under the sanitized name, which is returned for redirects
    pub fn save(&self, raw_name: &str, content: &str, metadata: Metadata) -> Result<PageName, WikiError> {
        let name = PageName::parse(raw_name)?;
        if name.as_str() != raw_name {
            debug!("Page name '{}' sanitized to '{}'", raw_name, name);
        }
        let page = Page { name, content: content.to_string(), metadata };
        self.store.save(&page)?;
        Ok(page.name)
    }

    pub fn delete(&self, raw_name: &str) -> Result<(), WikiError> {
        let name = PageName::parse(raw_name)?;
        self.store.delete(&name)
    }

    pub fn render(&self, content: &str) -> String {
        self.markup.render(content)
    }

    pub fn list_all_pages(&self) -> Vec<String> {
        self.index.list_all_pages()
    }
}
