use super::backend::StorageBackend;
use super::database::Database;
use super::fs_backend::FsBackend;
use super::loader;
use super::mem_backend::MemBackend;
use super::DocumentStore;
use crate::config::FolioConfig;
use crate::error::{FolioError, Result};
use crate::model::{Kind, Resource};
use std::path::{Path, PathBuf};

/// A loaded [`Database`] kept in step with a [`StorageBackend`].
pub struct DocStore<B: StorageBackend> {
    db: Database,
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: StorageBackend> DocStore<B> {
    pub fn new(db: Database, backend: B) -> Self {
        Self { db, backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn document_path(&self, kind: Kind, id: &str) -> PathBuf {
        self.backend.document_path(kind, id)
    }

}

impl DocStore<FsBackend> {
    /// Loads `<root>/<data_dir>` and opens it for writing.
    pub async fn open(root: &Path, config: &FolioConfig) -> Result<Self> {
        let (db, sources) = loader::load_with_sources(root, config, &[]).await?;
        let backend = FsBackend::from_config(root, config).with_sources(sources);
        Ok(Self::new(db, backend))
    }
}

impl DocStore<MemBackend> {
    pub fn in_memory() -> Self {
        Self::new(Database::default(), MemBackend::new())
    }
}

impl<B: StorageBackend> DocumentStore for DocStore<B> {
    fn database(&self) -> &Database {
        &self.db
    }

    fn get(&self, kind: Kind, id: &str) -> Result<Resource> {
        self.db
            .get(kind, id)
            .cloned()
            .ok_or_else(|| FolioError::DocumentNotFound {
                kind,
                id: id.to_string(),
            })
    }

    fn save(&mut self, resource: &Resource) -> Result<()> {
        // Backend first: a failed write leaves the in-memory view untouched.
        self.backend.write_document(resource)?;
        self.db.insert(resource.clone());
        Ok(())
    }

    fn delete(&mut self, kind: Kind, id: &str) -> Result<Resource> {
        let existing = self.get(kind, id)?;
        self.backend.delete_document(kind, id)?;
        self.db.collection_mut(kind).remove(id);
        Ok(existing)
    }
}
