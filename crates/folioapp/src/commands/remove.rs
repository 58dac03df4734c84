use super::helpers::all_or_nothing;
use super::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::hooks::{Hooks, MutationEvent};
use crate::model::{Kind, Resource};
use crate::store::DocumentStore;

/// Permanently deletes a document and everything below it.
///
/// Descendants go first, deepest last-visited first. If any delete fails,
/// the documents already deleted are written back.
pub fn run<S: DocumentStore>(store: &mut S, hooks: &Hooks, kind: Kind, id: &str) -> Result<CmdResult> {
    let resource = store.get(kind, id)?;
    let descendants = store.database().descendant_ids(id);

    let mut removed = all_or_nothing(store, |store, journal| {
        let mut removed = Vec::with_capacity(descendants.len() + 1);
        for (child_kind, child_id) in descendants.iter().rev() {
            removed.push(journal.delete(store, *child_kind, child_id)?);
        }
        removed.push(journal.delete(store, kind, id)?);
        Ok(removed)
    })?;

    for doc in &removed {
        hooks.emit(MutationEvent::Removed(doc.clone()));
    }
    let target = removed.pop();
    let mut affected: Vec<Resource> = target.into_iter().collect();
    affected.extend(removed);

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "{} removed: {}",
        kind,
        resource.name()
    )));
    if !descendants.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "Removed {} nested documents",
            descendants.len()
        )));
    }
    Ok(result.with_affected(affected))
}
