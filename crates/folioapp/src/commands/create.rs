use super::helpers::siblings;
use super::{CmdMessage, CmdResult, Patch};
use crate::error::{FolioError, Result};
use crate::hooks::{Hooks, MutationEvent};
use crate::model::{now_millis, Kind, Resource};
use crate::sort_key::allocate_top;
use crate::store::DocumentStore;

/// Creates a document of `kind`. Without an explicit sort key it goes to the
/// top of its sibling list.
pub fn run<S: DocumentStore>(
    store: &mut S,
    hooks: &Hooks,
    kind: Kind,
    patch: Patch,
) -> Result<CmdResult> {
    if kind.requires_parent() && patch.parent_id.is_none() {
        return Err(FolioError::MissingParent { kind });
    }

    let sort_key = match patch.sort_key {
        Some(key) => key,
        None => allocate_top(&siblings(store, patch.parent_id.as_deref()), now_millis())?,
    };

    let mut resource = Resource::new(kind, patch.parent_id.clone(), sort_key);
    patch.apply_fields(&mut resource)?;
    store.save(&resource)?;
    hooks.emit(MutationEvent::Created(resource.clone()));

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "{} created: {}",
        kind,
        resource.name()
    )));
    Ok(result.with_affected(vec![resource]))
}
