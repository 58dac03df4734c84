use super::helpers::{all_or_nothing, copy_subtree, next_sibling, siblings};
use super::{CmdMessage, CmdResult, Patch};
use crate::error::{FolioError, Result};
use crate::hooks::{Hooks, MutationEvent};
use crate::model::{generate_id, now_millis, Kind};
use crate::sort_key::{allocate_after, allocate_top};
use crate::store::DocumentStore;

/// Copies a document, placing the copy directly after the original.
///
/// The copy is named `"<name> (Copy)"` unless the patch names it. Documents
/// below the original are copied too, under the new id. A patch with a
/// different parent puts the copy at the top of that parent instead.
pub fn run<S: DocumentStore>(
    store: &mut S,
    hooks: &Hooks,
    kind: Kind,
    id: &str,
    patch: Patch,
) -> Result<CmdResult> {
    let source = store.get(kind, id)?;
    if !kind.can_duplicate() {
        return Err(FolioError::Store(format!("{} cannot be duplicated", kind)));
    }

    let parent_id = patch.parent_id.clone().or_else(|| source.parent_id.clone());
    if kind.requires_parent() && parent_id.is_none() {
        return Err(FolioError::MissingParent { kind });
    }

    let now = now_millis();
    let sort_key = match patch.sort_key {
        Some(key) => key,
        None if parent_id == source.parent_id => {
            let successor: Vec<_> = next_sibling(store, &source, None).into_iter().collect();
            allocate_after(&source, &successor)?
        }
        None => allocate_top(&siblings(store, parent_id.as_deref()), now)?,
    };

    let mut copy = source.clone();
    copy.id = generate_id(kind);
    copy.parent_id = parent_id;
    copy.sort_key = sort_key;
    copy.created = now;
    copy.modified = now;
    copy.body.set_name(format!("{} (Copy)", source.name()));
    patch.apply_fields(&mut copy)?;

    let children = copy_subtree(store.database(), &source.id, &copy.id, now);

    let mut affected = vec![copy.clone()];
    affected.extend(children);
    all_or_nothing(store, |store, journal| {
        affected.iter().try_for_each(|doc| journal.save(store, doc))
    })?;

    hooks.emit(MutationEvent::Duplicated {
        source_id: source.id.clone(),
        copy: copy.clone(),
    });
    for child in &affected[1..] {
        hooks.emit(MutationEvent::Created(child.clone()));
    }

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "{} duplicated: {}",
        kind,
        copy.name()
    )));
    if affected.len() > 1 {
        result.add_message(CmdMessage::info(format!(
            "Copied {} nested documents",
            affected.len() - 1
        )));
    }
    Ok(result.with_affected(affected))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::EventLog;
    use crate::model::Resource;
    use crate::store::doc_store::DocStore;
    use crate::store::mem_backend::MemBackend;

    fn folder(store: &mut DocStore<MemBackend>, id: &str, key: f64) -> Resource {
        let mut r = Resource::new(Kind::RequestGroup, Some("wrk_1".into()), key);
        r.id = id.to_string();
        r.body.set_name(id.to_string());
        store.save(&r).unwrap();
        r
    }

    fn order(store: &DocStore<MemBackend>) -> Vec<String> {
        siblings(store, Some("wrk_1"))
            .into_iter()
            .map(|r| r.name().to_string())
            .collect()
    }

    #[test]
    fn test_duplicate_between_two_siblings() {
        let mut store = DocStore::in_memory();
        folder(&mut store, "fld_a", 10.0);
        folder(&mut store, "fld_b", 20.0);

        let res = run(&mut store, &Hooks::new(), Kind::RequestGroup, "fld_a", Patch::new()).unwrap();
        let copy = &res.affected[0];
        assert_eq!(copy.sort_key, 15.0);
        assert_eq!(copy.name(), "fld_a (Copy)");
        assert_eq!(order(&store), vec!["fld_a", "fld_a (Copy)", "fld_b"]);
    }

    #[test]
    fn test_duplicate_at_end_of_list() {
        let mut store = DocStore::in_memory();
        folder(&mut store, "fld_a", 10.0);

        let res = run(&mut store, &Hooks::new(), Kind::RequestGroup, "fld_a", Patch::new()).unwrap();
        assert_eq!(res.affected[0].sort_key, 110.0);
    }

    #[test]
    fn test_successor_ignores_other_parents() {
        let mut store = DocStore::in_memory();
        folder(&mut store, "fld_a", 10.0);
        let mut elsewhere = Resource::new(Kind::RequestGroup, Some("wrk_2".into()), 12.0);
        elsewhere.id = "fld_elsewhere".into();
        store.save(&elsewhere).unwrap();

        let res = run(&mut store, &Hooks::new(), Kind::RequestGroup, "fld_a", Patch::new()).unwrap();
        assert_eq!(res.affected[0].sort_key, 110.0);
    }

    #[test]
    fn test_repeated_duplicates_stay_adjacent() {
        let mut store = DocStore::in_memory();
        folder(&mut store, "fld_a", 10.0);
        folder(&mut store, "fld_b", 20.0);
        let hooks = Hooks::new();

        for i in 0..10 {
            run(
                &mut store,
                &hooks,
                Kind::RequestGroup,
                "fld_a",
                Patch::new().name(format!("copy {}", i)),
            )
            .unwrap();
        }

        let names = order(&store);
        assert_eq!(names.first().map(String::as_str), Some("fld_a"));
        assert_eq!(names.get(1).map(String::as_str), Some("copy 9"));
        assert_eq!(names.last().map(String::as_str), Some("fld_b"));
    }

    #[test]
    fn test_duplicate_copies_subtree() {
        let mut store = DocStore::in_memory();
        folder(&mut store, "fld_a", 10.0);
        let mut req = Resource::new(Kind::Request, Some("fld_a".into()), 1.0);
        req.id = "req_1".into();
        store.save(&req).unwrap();

        let log = EventLog::new();
        let mut hooks = Hooks::new();
        hooks.register(Box::new(log.clone()));

        let res = run(&mut store, &hooks, Kind::RequestGroup, "fld_a", Patch::new()).unwrap();
        assert_eq!(res.affected.len(), 2);
        let copy_id = res.affected[0].id.clone();
        let nested = &res.affected[1];
        assert_eq!(nested.parent_id.as_deref(), Some(copy_id.as_str()));
        assert_ne!(nested.id, "req_1");
        assert_eq!(store.database().collection(Kind::Request).len(), 2);

        let events = log.events();
        assert_eq!(events[0].action(), "duplicated");
        assert_eq!(events[1].action(), "created");
    }

    #[test]
    fn test_duplicate_into_other_parent_goes_to_top() {
        let mut store = DocStore::in_memory();
        folder(&mut store, "fld_a", 10.0);
        let mut other = Resource::new(Kind::RequestGroup, Some("wrk_2".into()), -5.0);
        other.id = "fld_other".into();
        store.save(&other).unwrap();

        let res = run(
            &mut store,
            &Hooks::new(),
            Kind::RequestGroup,
            "fld_a",
            Patch::new().parent("wrk_2"),
        )
        .unwrap();
        let copy = &res.affected[0];
        assert_eq!(copy.parent_id.as_deref(), Some("wrk_2"));
        assert!(copy.sort_key < -5.0);
    }

    #[test]
    fn test_exhausted_key_space_is_surfaced() {
        let mut store = DocStore::in_memory();
        let lo = 1.0_f64;
        folder(&mut store, "fld_a", lo);
        folder(&mut store, "fld_b", f64::from_bits(lo.to_bits() + 1));

        let err = run(&mut store, &Hooks::new(), Kind::RequestGroup, "fld_a", Patch::new()).unwrap_err();
        assert!(matches!(err, FolioError::SortKeyExhausted { .. }));
        assert_eq!(store.database().collection(Kind::RequestGroup).len(), 2);
    }

    #[test]
    fn test_failed_child_write_undoes_the_copy() {
        let mut store = DocStore::in_memory();
        folder(&mut store, "fld_a", 10.0);
        for id in ["req_1", "req_2"] {
            let mut req = Resource::new(Kind::Request, Some("fld_a".into()), 1.0);
            req.id = id.into();
            store.save(&req).unwrap();
        }
        let log = EventLog::new();
        let mut hooks = Hooks::new();
        hooks.register(Box::new(log.clone()));

        for nth in [2, 3] {
            store.backend().fail_nth_operation(nth);
            let err = run(&mut store, &hooks, Kind::RequestGroup, "fld_a", Patch::new()).unwrap_err();
            assert!(matches!(err, FolioError::Store(_)));

            assert_eq!(store.database().len(), 3);
            assert_eq!(store.backend().document_count(), 3);
            assert_eq!(order(&store), vec!["fld_a"]);
        }
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_api_specs_cannot_be_duplicated() {
        let mut store = DocStore::in_memory();
        let mut spec = Resource::new(Kind::ApiSpec, Some("wrk_1".into()), 0.0);
        spec.id = "spc_1".into();
        store.save(&spec).unwrap();

        assert!(run(&mut store, &Hooks::new(), Kind::ApiSpec, "spc_1", Patch::new()).is_err());
    }
}
