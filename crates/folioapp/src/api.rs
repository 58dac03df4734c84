//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer, the resolver
//! and the store queries. All UI clients should go through [`FolioApi`].
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Terminal I/O**: Prompts go through the caller's [`Prompter`]
//!
//! ## Generic Over DocumentStore
//!
//! - Production: `FolioApi<DocStore<FsBackend>>`, built by [`FolioApi::open`]
//! - Testing: `FolioApi<DocStore<MemBackend>>`
//!
//! API tests verify dispatch only. Command logic is tested in the command
//! modules.

use crate::commands::{self, CmdResult, Patch};
use crate::config::FolioConfig;
use crate::error::Result;
use crate::hooks::{Hooks, MutationObserver};
use crate::model::{Kind, Resource};
use crate::resolve::{Prompter, Resolver};
use crate::store::doc_store::DocStore;
use crate::store::fs_backend::FsBackend;
use crate::store::{Database, DocumentStore, Query};
use std::path::Path;

pub struct FolioApi<S: DocumentStore> {
    store: S,
    hooks: Hooks,
}

impl FolioApi<DocStore<FsBackend>> {
    /// Loads configuration and every collection under `root`.
    pub async fn open(root: &Path) -> Result<Self> {
        let config = FolioConfig::load(root)?;
        let store = DocStore::open(root, &config).await?;
        Ok(Self::new(store))
    }
}

impl<S: DocumentStore> FolioApi<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            hooks: Hooks::new(),
        }
    }

    pub fn register_observer(&mut self, observer: Box<dyn MutationObserver>) {
        self.hooks.register(observer);
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn database(&self) -> &Database {
        self.store.database()
    }

    pub fn create(&mut self, kind: Kind, patch: Patch) -> Result<CmdResult> {
        commands::create::run(&mut self.store, &self.hooks, kind, patch)
    }

    pub fn update(&mut self, kind: Kind, id: &str, patch: Patch) -> Result<CmdResult> {
        commands::update::run(&mut self.store, &self.hooks, kind, id, patch)
    }

    pub fn duplicate(&mut self, kind: Kind, id: &str, patch: Patch) -> Result<CmdResult> {
        commands::duplicate::run(&mut self.store, &self.hooks, kind, id, patch)
    }

    pub fn move_to(
        &mut self,
        kind: Kind,
        id: &str,
        parent_id: Option<&str>,
        after_id: Option<&str>,
    ) -> Result<CmdResult> {
        commands::move_doc::run(&mut self.store, &self.hooks, kind, id, parent_id, after_id)
    }

    pub fn remove(&mut self, kind: Kind, id: &str) -> Result<CmdResult> {
        commands::remove::run(&mut self.store, &self.hooks, kind, id)
    }

    pub fn rebalance(&mut self, parent_id: Option<&str>) -> Result<CmdResult> {
        commands::rebalance::run(&mut self.store, &self.hooks, parent_id)
    }

    pub fn get(&self, kind: Kind, id: &str) -> Result<Resource> {
        self.store.get(kind, id)
    }

    /// Documents of `kind` in display order, optionally limited to one parent.
    pub fn list(&self, kind: Kind, parent_id: Option<&str>) -> Vec<Resource> {
        let query = match parent_id {
            Some(parent) => Query::children_of(Some(parent)),
            None => Query::all(),
        };
        self.store.find(kind, &query)
    }

    /// Resolves an identifier (id, id prefix or name) to a document of
    /// `kind`, asking `prompter` when none is given.
    pub fn resolve(
        &self,
        kind: Kind,
        identifier: Option<&str>,
        prompter: &dyn Prompter,
    ) -> Result<Option<Resource>> {
        let collection = self.store.database().collection(kind);
        Ok(Resolver::new(prompter)
            .resolve(collection, identifier)?
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::EventLog;
    use crate::store::mem_backend::MemBackend;

    struct FirstChoice;

    impl Prompter for FirstChoice {
        fn prompt(&self, _message: &str, choices: &[String]) -> Result<String> {
            Ok(choices[0].clone())
        }
    }

    fn api() -> FolioApi<DocStore<MemBackend>> {
        FolioApi::new(DocStore::in_memory())
    }

    fn create(api: &mut FolioApi<DocStore<MemBackend>>, kind: Kind, patch: Patch) -> Resource {
        api.create(kind, patch).unwrap().affected.remove(0)
    }

    #[test]
    fn test_create_and_list_dispatch() {
        let mut api = api();
        let wrk = create(&mut api, Kind::Workspace, Patch::new().name("Main"));
        create(&mut api, Kind::Request, Patch::new().parent(&wrk.id).name("one"));
        create(&mut api, Kind::Request, Patch::new().parent(&wrk.id).name("two"));
        create(&mut api, Kind::Request, Patch::new().parent("wrk_other").name("elsewhere"));

        let names: Vec<String> = api
            .list(Kind::Request, Some(&wrk.id))
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, vec!["two", "one"]);
        assert_eq!(api.list(Kind::Request, None).len(), 3);
    }

    #[test]
    fn test_mutations_reach_observers() {
        let mut api = api();
        let log = EventLog::new();
        api.register_observer(Box::new(log.clone()));

        let wrk = create(&mut api, Kind::Workspace, Patch::new().name("Main"));
        let fld = create(&mut api, Kind::RequestGroup, Patch::new().parent(&wrk.id));
        api.update(Kind::RequestGroup, &fld.id, Patch::new().name("Auth"))
            .unwrap();
        let copy = api
            .duplicate(Kind::RequestGroup, &fld.id, Patch::new())
            .unwrap()
            .affected
            .remove(0);
        api.move_to(Kind::RequestGroup, &fld.id, Some(&wrk.id), Some(&copy.id))
            .unwrap();
        api.remove(Kind::RequestGroup, &fld.id).unwrap();

        let actions: Vec<&str> = log.events().iter().map(|e| e.action()).collect();
        assert_eq!(
            actions,
            vec!["created", "created", "updated", "duplicated", "updated", "removed"]
        );
    }

    #[test]
    fn test_resolve_dispatch() {
        let mut api = api();
        let wrk = create(&mut api, Kind::Workspace, Patch::new().name("Main"));

        let by_name = api.resolve(Kind::Workspace, Some("Main"), &FirstChoice).unwrap();
        assert_eq!(by_name.map(|r| r.id), Some(wrk.id.clone()));

        let prompted = api.resolve(Kind::Workspace, None, &FirstChoice).unwrap();
        assert_eq!(prompted.map(|r| r.id), Some(wrk.id));

        assert!(api
            .resolve(Kind::Workspace, Some("nothing"), &FirstChoice)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_rebalance_dispatch() {
        let mut api = api();
        create(&mut api, Kind::Workspace, Patch::new().name("a"));
        create(&mut api, Kind::Workspace, Patch::new().name("b"));

        api.rebalance(None).unwrap();
        let keys: Vec<f64> = api.list(Kind::Workspace, None).iter().map(|r| r.sort_key).collect();
        assert_eq!(keys, vec![100.0, 200.0]);
    }
}
