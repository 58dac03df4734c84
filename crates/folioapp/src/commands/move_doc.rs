use super::helpers::{is_descendant_of, next_sibling, siblings};
use super::{CmdMessage, CmdResult};
use crate::error::{FolioError, Result};
use crate::hooks::{Hooks, MutationEvent};
use crate::model::{now_millis, Kind};
use crate::sort_key::{allocate_after, allocate_between};
use crate::store::DocumentStore;

/// Moves a document under `parent_id`, directly after the sibling `after_id`
/// or, without one, to the top of the destination's sibling list.
pub fn run<S: DocumentStore>(
    store: &mut S,
    hooks: &Hooks,
    kind: Kind,
    id: &str,
    parent_id: Option<&str>,
    after_id: Option<&str>,
) -> Result<CmdResult> {
    let mut resource = store.get(kind, id)?;

    if kind.requires_parent() && parent_id.is_none() {
        return Err(FolioError::MissingParent { kind });
    }

    if let Some(target) = parent_id {
        if target == id {
            return Err(FolioError::InvalidMove(format!(
                "Cannot move '{}' into itself",
                resource.name()
            )));
        }
        if store.database().find_by_id(target).is_none() {
            return Err(FolioError::InvalidMove(format!(
                "Destination {} not found",
                target
            )));
        }
        if is_descendant_of(store.database(), target, id) {
            return Err(FolioError::InvalidMove(format!(
                "Cannot move '{}' into its own descendant",
                resource.name()
            )));
        }
    }

    let sort_key = match after_id {
        Some(anchor_id) => {
            if anchor_id == id {
                return Err(FolioError::InvalidMove(format!(
                    "Cannot place '{}' after itself",
                    resource.name()
                )));
            }
            let anchor = store
                .database()
                .find_by_id(anchor_id)
                .cloned()
                .ok_or_else(|| FolioError::InvalidMove(format!("Sibling {} not found", anchor_id)))?;
            if anchor.parent_id.as_deref() != parent_id {
                return Err(FolioError::InvalidMove(format!(
                    "'{}' is not under the destination",
                    anchor.name()
                )));
            }
            let successor: Vec<_> = next_sibling(store, &anchor, Some(id)).into_iter().collect();
            allocate_after(&anchor, &successor)?
        }
        None => {
            let top = siblings(store, parent_id)
                .into_iter()
                .find(|r| r.id != id)
                .map(|r| r.sort_key);
            match top {
                Some(key) => allocate_between(None, Some(key))?,
                None => resource.sort_key,
            }
        }
    };

    let mut result = CmdResult::default();
    if resource.parent_id.as_deref() == parent_id && resource.sort_key == sort_key {
        result.add_message(CmdMessage::info(format!(
            "'{}' is already in place",
            resource.name()
        )));
        return Ok(result);
    }

    resource.parent_id = parent_id.map(String::from);
    resource.sort_key = sort_key;
    resource.modified = now_millis();
    store.save(&resource)?;
    hooks.emit(MutationEvent::Updated(resource.clone()));

    Ok(result.with_affected(vec![resource]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Resource;
    use crate::store::doc_store::DocStore;
    use crate::store::mem_backend::MemBackend;

    fn put(store: &mut DocStore<MemBackend>, kind: Kind, id: &str, parent: Option<&str>, key: f64) {
        let mut r = Resource::new(kind, parent.map(String::from), key);
        r.id = id.to_string();
        store.save(&r).unwrap();
    }

    fn setup() -> DocStore<MemBackend> {
        let mut store = DocStore::in_memory();
        put(&mut store, Kind::Workspace, "wrk_1", None, 0.0);
        put(&mut store, Kind::RequestGroup, "fld_a", Some("wrk_1"), 10.0);
        put(&mut store, Kind::RequestGroup, "fld_b", Some("wrk_1"), 20.0);
        put(&mut store, Kind::RequestGroup, "fld_c", Some("wrk_1"), 30.0);
        put(&mut store, Kind::RequestGroup, "fld_nested", Some("fld_a"), 0.0);
        store
    }

    fn ids_under(store: &DocStore<MemBackend>, parent: &str) -> Vec<String> {
        siblings(store, Some(parent)).into_iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_move_after_sibling() {
        let mut store = setup();
        let res = run(&mut store, &Hooks::new(), Kind::RequestGroup, "fld_c", Some("wrk_1"), Some("fld_a")).unwrap();
        assert_eq!(res.affected[0].sort_key, 15.0);
        assert_eq!(ids_under(&store, "wrk_1"), vec!["fld_a", "fld_c", "fld_b"]);
    }

    #[test]
    fn test_move_after_own_predecessor_skips_self() {
        let mut store = setup();
        // fld_b already follows fld_a; the successor search skips fld_b itself,
        // lands on the midpoint of fld_a and fld_c, which is fld_b's key.
        let res = run(&mut store, &Hooks::new(), Kind::RequestGroup, "fld_b", Some("wrk_1"), Some("fld_a")).unwrap();
        assert!(res.affected.is_empty());
        assert_eq!(ids_under(&store, "wrk_1"), vec!["fld_a", "fld_b", "fld_c"]);
    }

    #[test]
    fn test_move_to_top() {
        let mut store = setup();
        run(&mut store, &Hooks::new(), Kind::RequestGroup, "fld_c", Some("wrk_1"), None).unwrap();
        assert_eq!(ids_under(&store, "wrk_1"), vec!["fld_c", "fld_a", "fld_b"]);
        assert_eq!(store.get(Kind::RequestGroup, "fld_c").unwrap().sort_key, -90.0);
    }

    #[test]
    fn test_move_into_other_folder() {
        let mut store = setup();
        run(&mut store, &Hooks::new(), Kind::RequestGroup, "fld_b", Some("fld_c"), None).unwrap();
        let moved = store.get(Kind::RequestGroup, "fld_b").unwrap();
        assert_eq!(moved.parent_id.as_deref(), Some("fld_c"));
        // Only document under fld_c: key unchanged.
        assert_eq!(moved.sort_key, 20.0);
    }

    #[test]
    fn test_prevent_move_into_self() {
        let mut store = setup();
        let err = run(&mut store, &Hooks::new(), Kind::RequestGroup, "fld_a", Some("fld_a"), None).unwrap_err();
        assert!(err.to_string().contains("into itself"));
    }

    #[test]
    fn test_prevent_cycle_move_into_descendant() {
        let mut store = setup();
        let err = run(&mut store, &Hooks::new(), Kind::RequestGroup, "fld_a", Some("fld_nested"), None)
            .unwrap_err();
        assert!(err.to_string().contains("descendant"));
        assert_eq!(
            store.get(Kind::RequestGroup, "fld_a").unwrap().parent_id.as_deref(),
            Some("wrk_1")
        );
    }

    #[test]
    fn test_child_kind_needs_destination() {
        let mut store = setup();
        let err = run(&mut store, &Hooks::new(), Kind::RequestGroup, "fld_a", None, None).unwrap_err();
        assert!(matches!(err, FolioError::MissingParent { .. }));
    }

    #[test]
    fn test_anchor_must_share_destination() {
        let mut store = setup();
        let err = run(&mut store, &Hooks::new(), Kind::RequestGroup, "fld_c", Some("wrk_1"), Some("fld_nested"))
            .unwrap_err();
        assert!(matches!(err, FolioError::InvalidMove(_)));
    }

    #[test]
    fn test_already_in_place_is_a_no_op() {
        let mut store = setup();
        let res = run(&mut store, &Hooks::new(), Kind::RequestGroup, "fld_nested", Some("fld_a"), None).unwrap();
        assert!(res.affected.is_empty());
        assert_eq!(res.messages.len(), 1);
    }
}
