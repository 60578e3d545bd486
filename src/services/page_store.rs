use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use log::{debug, error, info, warn};
use uuid::Uuid;

use crate::errors::WikiError;
use crate::services::metadata_codec;
use crate::services::name_service::PageName;
use crate::services::path_service::PathMapper;
use crate::types::Page;

/// Per-file exclusive sections for writers
#[derive(Default)]
struct NameLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl NameLocks {
    fn entry(&self, path: &Path) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // Drop sections nobody holds so the map does not grow with every page ever touched
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(path.to_path_buf()).or_default().clone()
    }
}

/// Loads, saves and deletes pages on disk
pub struct PageStore {
    mapper: PathMapper,
    locks: NameLocks,
}

impl PageStore {
    pub fn new(mapper: PathMapper) -> Self {
        debug!("Creating PageStore with root: {:?}", mapper.root());
        Self { mapper, locks: NameLocks::default() }
    }

    pub fn mapper(&self) -> &PathMapper {
        &self.mapper
    }

    /// Read and decode a page; `NotFound` if it was never saved
    pub fn load(&self, name: &PageName) -> Result<Page, WikiError> {
        let path = self.mapper.page_path(name)?;
        debug!("Loading page '{}' from {:?}", name, path);

        let raw = fs::read(&path).map_err(|e| {
            if e.kind() != io::ErrorKind::NotFound {
                error!("Failed to read page {:?}: {}", path, e);
            }
            WikiError::from(e)
        })?;

        let decoded = metadata_codec::decode(&raw);
        info!("Loaded page '{}', {} bytes", name, raw.len());
        Ok(Page { name: name.clone(), content: decoded.content, metadata: decoded.metadata })
    }

    /// Write a page, replacing any previous version atomically
    pub fn save(&self, page: &Page) -> Result<(), WikiError> {
        let path = self.mapper.page_path(&page.name)?;
        let lock = self.locks.entry(&path);
        let _guard = acquire(&lock);

        if let Some(parent) = path.parent() {
            create_namespace_dirs(parent).map_err(|e| {
                error!("Failed to create namespace directory {:?}: {}", parent, e);
                WikiError::Io(e)
            })?;
        }

        let bytes = metadata_codec::encode(&page.content, &page.metadata);
        write_atomic(&path, &bytes).map_err(|e| {
            error!("Failed to write page {:?}: {}", path, e);
            WikiError::Io(e)
        })?;

        info!("Saved page '{}', {} bytes", page.name, bytes.len());
        Ok(())
    }

    /// Remove a page file permanently
    pub fn delete(&self, name: &PageName) -> Result<(), WikiError> {
        let path = self.mapper.page_path(name)?;
        let lock = self.locks.entry(&path);
        let _guard = acquire(&lock);

        fs::remove_file(&path).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                warn!("Delete requested for missing page '{}'", name);
            } else {
                error!("Failed to delete page {:?}: {}", path, e);
            }
            WikiError::from(e)
        })?;

        info!("Deleted page '{}'", name);
        Ok(())
    }

    pub fn exists(&self, name: &PageName) -> bool {
        self.mapper.page_path(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Filesystem path of the page, for callers that want file metadata
    pub fn path_of(&self, name: &PageName) -> Result<PathBuf, WikiError> {
        self.mapper.page_path(name)
    }
}

fn acquire(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn create_namespace_dirs(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o755);
    }
    builder.create(dir)
}

/// Write to a hidden sibling temp file, then rename it over `path`
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "page path has no file name"))?;
    let tmp_path = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

    let result = (|| {
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}
