use super::helpers::{all_or_nothing, siblings};
use super::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::hooks::{Hooks, MutationEvent};
use crate::model::now_millis;
use crate::sort_key::rebalance;
use crate::store::DocumentStore;

/// Re-spaces the sort keys under `parent_id`, keeping the display order.
///
/// This is the recovery for `SortKeyExhausted`; it never runs on its own.
/// Only documents whose key changes are written.
pub fn run<S: DocumentStore>(
    store: &mut S,
    hooks: &Hooks,
    parent_id: Option<&str>,
) -> Result<CmdResult> {
    let current = siblings(store, parent_id);
    let keys = rebalance(&current);
    let now = now_millis();

    let affected: Vec<_> = current
        .into_iter()
        .zip(keys)
        .filter(|(resource, (_, key))| resource.sort_key != *key)
        .map(|(mut resource, (_, key))| {
            resource.sort_key = key;
            resource.modified = now;
            resource
        })
        .collect();

    all_or_nothing(store, |store, journal| {
        affected.iter().try_for_each(|doc| journal.save(store, doc))
    })?;
    for doc in &affected {
        hooks.emit(MutationEvent::Updated(doc.clone()));
    }

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Rebalanced {} documents",
        affected.len()
    )));
    Ok(result.with_affected(affected))
}
