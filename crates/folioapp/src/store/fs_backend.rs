use super::backend::StorageBackend;
use super::loader::SourceMap;
use crate::config::FolioConfig;
use crate::error::{FolioError, Result};
use crate::model::{Kind, Resource};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Extensions tried when locating an existing document, after the
/// configured one.
const FALLBACK_EXTS: [&str; 2] = [".yaml", ".yml"];

/// One YAML file per document.
///
/// Documents loaded from disk keep the file they came from, whatever its
/// name. New documents are written to `<Kind>/<id><file_ext>`.
pub struct FsBackend {
    data_dir: PathBuf,
    file_ext: String,
    sources: RefCell<SourceMap>,
}

impl FsBackend {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            file_ext: ".yaml".to_string(),
            sources: RefCell::new(SourceMap::new()),
        }
    }

    /// Seeds the known file locations, usually from
    /// [`super::loader::load_with_sources`].
    pub fn with_sources(self, sources: SourceMap) -> Self {
        *self.sources.borrow_mut() = sources;
        self
    }

    pub fn from_config(root: &Path, config: &FolioConfig) -> Self {
        Self::new(config.data_path(root)).with_file_ext(&config.file_ext())
    }

    pub fn with_file_ext(mut self, ext: &str) -> Self {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
        self
    }

    fn kind_dir(&self, kind: Kind) -> PathBuf {
        self.data_dir.join(kind.dir_name())
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(FolioError::Io)?;
        }
        Ok(())
    }

    fn find_document_file(&self, kind: Kind, id: &str) -> Option<PathBuf> {
        if let Some(path) = self.sources.borrow().get(&(kind, id.to_string())) {
            return Some(path.clone());
        }
        let dir = self.kind_dir(kind);
        std::iter::once(self.file_ext.as_str())
            .chain(FALLBACK_EXTS)
            .map(|ext| dir.join(format!("{}{}", id, ext)))
            .find(|path| path.exists())
    }
}

impl StorageBackend for FsBackend {
    fn write_document(&self, resource: &Resource) -> Result<()> {
        let dir = self.kind_dir(resource.kind());
        self.ensure_dir(&dir)?;

        let content = serde_yaml::to_string(resource)?;
        let target = self
            .find_document_file(resource.kind(), &resource.id)
            .unwrap_or_else(|| dir.join(format!("{}{}", resource.id, self.file_ext)));

        // Tmp files stay out of the kind directories, which are scanned on load.
        let tmp = self.data_dir.join(format!(".doc-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, content).map_err(FolioError::Io)?;
        if let Err(e) = fs::rename(&tmp, &target) {
            let _ = fs::remove_file(&tmp);
            return Err(FolioError::Io(e));
        }
        self.sources
            .borrow_mut()
            .insert((resource.kind(), resource.id.clone()), target);
        Ok(())
    }

    // The source entry is kept so a restored document returns to its file.
    fn delete_document(&self, kind: Kind, id: &str) -> Result<()> {
        if let Some(path) = self.find_document_file(kind, id) {
            if path.exists() {
                fs::remove_file(path).map_err(FolioError::Io)?;
            }
        }
        Ok(())
    }

    fn document_path(&self, kind: Kind, id: &str) -> PathBuf {
        self.find_document_file(kind, id)
            .unwrap_or_else(|| self.kind_dir(kind).join(format!("{}{}", id, self.file_ext)))
    }
}
