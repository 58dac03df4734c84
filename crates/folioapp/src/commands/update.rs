use super::{CmdResult, Patch};
use crate::error::{FolioError, Result};
use crate::hooks::{Hooks, MutationEvent};
use crate::model::{now_millis, Kind};
use crate::store::DocumentStore;

/// Applies `patch` to an existing document. Re-parenting goes through
/// [`super::move_doc`], which checks for cycles.
pub fn run<S: DocumentStore>(
    store: &mut S,
    hooks: &Hooks,
    kind: Kind,
    id: &str,
    patch: Patch,
) -> Result<CmdResult> {
    let mut resource = store.get(kind, id)?;

    if let Some(parent) = &patch.parent_id {
        if resource.parent_id.as_deref() != Some(parent.as_str()) {
            return Err(FolioError::InvalidMove(
                "use move to change a document's parent".to_string(),
            ));
        }
    }

    patch.apply_fields(&mut resource)?;
    resource.modified = now_millis();
    store.save(&resource)?;
    hooks.emit(MutationEvent::Updated(resource.clone()));

    Ok(CmdResult::default().with_affected(vec![resource]))
}
