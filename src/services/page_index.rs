use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::services::path_service::PathMapper;

/// Reconstructs page names by walking the storage root
#[derive(Clone)]
pub struct PageIndex {
    mapper: PathMapper,
}

impl PageIndex {
    pub fn new(mapper: PathMapper) -> Self {
        Self { mapper }
    }

    /// Walk the root from scratch and yield every page name found.
    ///
    /// Order is whatever the filesystem returns. Unreadable entries are
    /// logged and skipped; a missing root yields nothing.
    pub fn pages(&self) -> impl Iterator<Item = String> + '_ {
        let root = self.mapper.root();
        debug!("Walking page root {:?}", root);

        WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .filter_map(move |entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    if e.depth() == 0 {
                        debug!("Page root {:?} is not readable: {}", root, e);
                    } else {
                        warn!("Skipping unreadable entry under {:?}: {}", root, e);
                    }
                    None
                }
            })
            .filter(|entry| !entry.file_type().is_dir())
            .filter_map(move |entry| {
                let relative = entry.path().strip_prefix(root).ok()?;
                self.mapper.page_name_for(relative)
            })
    }

    /// All page names, sorted lexicographically
    pub fn list_all_pages(&self) -> Vec<String> {
        let mut pages: Vec<String> = self.pages().collect();
        pages.sort();
        info!("Listed {} pages", pages.len());
        pages
    }
}
