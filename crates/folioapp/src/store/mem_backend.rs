use super::backend::StorageBackend;
use crate::error::{FolioError, Result};
use crate::model::{Kind, Resource};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// In-memory storage backend for testing.
///
/// Keeps the serialized YAML of every written document, so tests exercise
/// the same encoding as the filesystem backend. Uses `RefCell` since the
/// store is single-threaded.
#[derive(Default)]
pub struct MemBackend {
    documents: RefCell<HashMap<(Kind, String), String>>,
    simulate_write_error: RefCell<bool>,
    fail_countdown: RefCell<Option<usize>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        *self.simulate_write_error.borrow_mut() = simulate;
    }

    /// Fail only the `n`th write or delete from now on, counting from 1.
    pub fn fail_nth_operation(&self, n: usize) {
        *self.fail_countdown.borrow_mut() = Some(n);
    }

    fn check_failure(&self) -> Result<()> {
        let simulated = Err(FolioError::Store("Simulated write error".to_string()));
        if *self.simulate_write_error.borrow() {
            return simulated;
        }
        let mut countdown = self.fail_countdown.borrow_mut();
        match *countdown {
            Some(n) if n <= 1 => {
                *countdown = None;
                simulated
            }
            Some(n) => {
                *countdown = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Raw persisted text of a document, if written.
    pub fn raw(&self, kind: Kind, id: &str) -> Option<String> {
        self.documents
            .borrow()
            .get(&(kind, id.to_string()))
            .cloned()
    }

    pub fn document_count(&self) -> usize {
        self.documents.borrow().len()
    }
}

impl StorageBackend for MemBackend {
    fn write_document(&self, resource: &Resource) -> Result<()> {
        self.check_failure()?;
        let text = serde_yaml::to_string(resource)?;
        self.documents
            .borrow_mut()
            .insert((resource.kind(), resource.id.clone()), text);
        Ok(())
    }

    fn delete_document(&self, kind: Kind, id: &str) -> Result<()> {
        self.check_failure()?;
        self.documents.borrow_mut().remove(&(kind, id.to_string()));
        Ok(())
    }

    fn document_path(&self, kind: Kind, id: &str) -> PathBuf {
        PathBuf::from(format!("memory://{}/{}", kind.dir_name(), id))
    }
}
