//! # Storage Layer
//!
//! Two halves live here:
//!
//! 1. **The typed store** ([`database::Database`]): one [`database::Collection`]
//!    per [`Kind`], built once by [`loader::load`] from the data directory.
//! 2. **Persistence** ([`DocumentStore`]): the write path used by the command
//!    layer. [`doc_store::DocStore`] keeps a loaded `Database` in sync with a
//!    [`backend::StorageBackend`] that does the raw I/O.
//!
//! ## Storage Layout
//!
//! ```text
//! <root>/
//! └── .folio/
//!     ├── folio.toml              # Optional configuration
//!     ├── ApiSpec/
//!     │   └── spc_<hex>.yaml      # One YAML document per resource
//!     ├── Environment/
//!     ├── Request/
//!     ├── RequestGroup/
//!     └── Workspace/
//! ```
//!
//! Every file (or symlink to one) directly inside a kind directory is a
//! document of that kind, whatever its name. Temporary files used for atomic writes live in the data directory
//! itself, never inside a kind directory.
//!
//! ## Consistency
//!
//! - Writes go to the backend first; the in-memory map only changes once the
//!   backend succeeded.
//! - There is no locking: a single caller is assumed per mutation. Two
//!   processes duplicating under the same parent can race.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: production, one file per document.
//! - [`mem_backend::MemBackend`]: for testing logic without filesystem I/O.

use crate::error::Result;
use crate::model::{Kind, Resource};
use crate::sort_key::display_order;

pub mod backend;
pub mod database;
pub mod doc_store;
pub mod fs_backend;
pub mod loader;
pub mod mem_backend;

pub use database::{Collection, Database};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Filter for [`DocumentStore::find`]. Results are sorted by sort key.
#[derive(Debug, Clone, Default)]
pub struct Query {
    parent_id: Option<Option<String>>,
    sort_key_gt: Option<f64>,
    order: SortOrder,
    limit: Option<usize>,
}

impl Query {
    pub fn all() -> Self {
        Self::default()
    }

    /// Siblings under `parent_id` (`None` selects roots).
    pub fn children_of(parent_id: Option<&str>) -> Self {
        Self {
            parent_id: Some(parent_id.map(String::from)),
            ..Self::default()
        }
    }

    pub fn sort_key_gt(mut self, key: f64) -> Self {
        self.sort_key_gt = Some(key);
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, resource: &Resource) -> bool {
        if let Some(parent) = &self.parent_id {
            if resource.parent_id != *parent {
                return false;
            }
        }
        if let Some(key) = self.sort_key_gt {
            if resource.sort_key <= key {
                return false;
            }
        }
        true
    }

    /// Filters, sorts and truncates `resources`.
    pub fn apply<'a>(&self, resources: impl Iterator<Item = &'a Resource>) -> Vec<Resource> {
        let mut found: Vec<&Resource> = resources.filter(|r| self.matches(r)).collect();
        found.sort_by(|a, b| display_order(a, b));
        if self.order == SortOrder::Descending {
            found.reverse();
        }
        if let Some(limit) = self.limit {
            found.truncate(limit);
        }
        found.into_iter().cloned().collect()
    }
}

/// Abstract interface for document persistence.
///
/// The command layer builds create/update/duplicate/move/remove on top of
/// these primitives.
pub trait DocumentStore {
    /// The current in-memory view.
    fn database(&self) -> &Database;

    /// Get a document by kind and exact id.
    fn get(&self, kind: Kind, id: &str) -> Result<Resource>;

    /// Find documents of `kind` matching `query`.
    fn find(&self, kind: Kind, query: &Query) -> Vec<Resource> {
        query.apply(self.database().collection(kind).iter())
    }

    /// Save a document (create or replace).
    fn save(&mut self, resource: &Resource) -> Result<()>;

    /// Delete a document permanently, returning it.
    fn delete(&mut self, kind: Kind, id: &str) -> Result<Resource>;
}
