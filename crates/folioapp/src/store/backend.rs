use crate::error::Result;
use crate::model::{Kind, Resource};
use std::path::PathBuf;

/// Abstract interface for raw document I/O.
/// This trait handles the "how" of storage (filesystem vs memory),
/// while DocStore handles the "what" (keeping the in-memory view in step).
pub trait StorageBackend {
    /// Persist one document, replacing any previous version.
    /// MUST be atomic (e.g. write to tmp then rename) to avoid partial writes.
    fn write_document(&self, resource: &Resource) -> Result<()>;

    /// Remove a document. Removing a missing document is not an error.
    fn delete_document(&self, kind: Kind, id: &str) -> Result<()>;

    /// Location of the document. For MemBackend, a virtual path.
    fn document_path(&self, kind: Kind, id: &str) -> PathBuf;
}
