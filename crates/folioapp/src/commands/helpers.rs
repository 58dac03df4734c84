use crate::error::{FolioError, Result};
use crate::model::{generate_id, Kind, Resource};
use crate::sort_key::display_order;
use crate::store::{Database, DocumentStore, Query};
use std::collections::HashMap;

enum Undo {
    Remove(Kind, String),
    Restore(Resource),
}

/// Undo log for commands that write more than one document.
///
/// Every save or delete made through the journal records how to reverse it.
/// Use [`all_or_nothing`] rather than driving it by hand.
#[derive(Default)]
pub struct Journal {
    undo: Vec<Undo>,
}

impl Journal {
    pub fn save<S: DocumentStore>(&mut self, store: &mut S, resource: &Resource) -> Result<()> {
        let previous = store.database().get(resource.kind(), &resource.id).cloned();
        store.save(resource)?;
        self.undo.push(match previous {
            Some(previous) => Undo::Restore(previous),
            None => Undo::Remove(resource.kind(), resource.id.clone()),
        });
        Ok(())
    }

    pub fn delete<S: DocumentStore>(&mut self, store: &mut S, kind: Kind, id: &str) -> Result<Resource> {
        let removed = store.delete(kind, id)?;
        self.undo.push(Undo::Restore(removed.clone()));
        Ok(removed)
    }

    /// Reverses the recorded writes, newest first.
    fn roll_back<S: DocumentStore>(self, store: &mut S) {
        tracing::warn!(writes = self.undo.len(), "rolling back partial mutation");
        for undo in self.undo.into_iter().rev() {
            let outcome = match &undo {
                Undo::Remove(kind, id) => match store.delete(*kind, id) {
                    Err(FolioError::DocumentNotFound { .. }) => Ok(()),
                    other => other.map(|_| ()),
                },
                Undo::Restore(resource) => store.save(resource),
            };
            if let Err(e) = outcome {
                let id = match &undo {
                    Undo::Remove(_, id) => id.as_str(),
                    Undo::Restore(resource) => resource.id.as_str(),
                };
                tracing::error!(id, error = %e, "rollback failed, store may be inconsistent");
            }
        }
    }
}

/// Runs `writes` against `store`; if it fails, every write it made through
/// the journal is undone before the error is returned.
pub fn all_or_nothing<S, T, F>(store: &mut S, writes: F) -> Result<T>
where
    S: DocumentStore,
    F: FnOnce(&mut S, &mut Journal) -> Result<T>,
{
    let mut journal = Journal::default();
    match writes(store, &mut journal) {
        Ok(value) => Ok(value),
        Err(e) => {
            journal.roll_back(store);
            Err(e)
        }
    }
}

/// All documents under `parent_id`, any kind, in display order.
pub fn siblings<S: DocumentStore>(store: &S, parent_id: Option<&str>) -> Vec<Resource> {
    let query = Query::children_of(parent_id);
    let mut all: Vec<Resource> = Kind::ALL
        .into_iter()
        .flat_map(|kind| store.find(kind, &query))
        .collect();
    all.sort_by(display_order);
    all
}

/// The sibling sorting right after `anchor`, skipping `exclude`.
///
/// Issues one "sort key greater than, ascending, limit 1" query per kind and
/// keeps the lowest hit.
pub fn next_sibling<S: DocumentStore>(
    store: &S,
    anchor: &Resource,
    exclude: Option<&str>,
) -> Option<Resource> {
    // One extra row per kind so an excluded hit does not hide the next one.
    let query = Query::children_of(anchor.parent_id.as_deref())
        .sort_key_gt(anchor.sort_key)
        .limit(2);
    Kind::ALL
        .into_iter()
        .filter_map(|kind| {
            store
                .find(kind, &query)
                .into_iter()
                .find(|r| Some(r.id.as_str()) != exclude)
        })
        .min_by(display_order)
}

/// Whether `candidate` lies in the subtree below `ancestor_id`.
pub fn is_descendant_of(db: &Database, candidate: &str, ancestor_id: &str) -> bool {
    db.descendant_ids(ancestor_id)
        .iter()
        .any(|(_, id)| id == candidate)
}

/// Fresh copies of every document below `source_id`, re-parented under
/// `copy_id`. Sort keys are kept; ids and timestamps are new.
pub fn copy_subtree(db: &Database, source_id: &str, copy_id: &str, now: i64) -> Vec<Resource> {
    let mut new_ids: HashMap<String, String> = HashMap::new();
    new_ids.insert(source_id.to_string(), copy_id.to_string());

    let mut copies = Vec::new();
    // descendant_ids visits parents before their children.
    for (kind, id) in db.descendant_ids(source_id) {
        let Some(original) = db.get(kind, &id) else {
            continue;
        };
        let mut copy = original.clone();
        copy.id = generate_id(kind);
        copy.parent_id = original
            .parent_id
            .as_ref()
            .and_then(|p| new_ids.get(p))
            .cloned();
        copy.created = now;
        copy.modified = now;
        new_ids.insert(id, copy.id.clone());
        copies.push(copy);
    }
    copies
}
