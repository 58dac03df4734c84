use crate::model::{Kind, Resource};
use crate::sort_key::display_order;
use std::collections::{HashMap, HashSet};

/// All resources of one kind, keyed by id.
///
/// Enumeration order is unspecified; use [`Collection::children`] for
/// display order.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    docs: HashMap<String, Resource>,
}

impl Collection {
    pub fn get(&self, id: &str) -> Option<&Resource> {
        self.docs.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.docs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.docs.values()
    }

    /// Siblings under `parent_id`, in display order.
    pub fn children(&self, parent_id: Option<&str>) -> Vec<&Resource> {
        let mut children: Vec<&Resource> = self
            .docs
            .values()
            .filter(|r| r.parent_id.as_deref() == parent_id)
            .collect();
        children.sort_by(|a, b| display_order(a, b));
        children
    }

    pub(crate) fn insert(&mut self, resource: Resource) -> Option<Resource> {
        self.docs.insert(resource.id.clone(), resource)
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<Resource> {
        self.docs.remove(id)
    }
}

impl FromIterator<Resource> for Collection {
    fn from_iter<T: IntoIterator<Item = Resource>>(iter: T) -> Self {
        let mut collection = Collection::default();
        for resource in iter {
            collection.insert(resource);
        }
        collection
    }
}

/// One collection per kind. Built by [`crate::store::loader::load`] and
/// read-only to everything outside the persistence layer.
#[derive(Debug, Clone, Default)]
pub struct Database {
    api_specs: Collection,
    environments: Collection,
    requests: Collection,
    request_groups: Collection,
    workspaces: Collection,
}

impl Database {
    pub fn collection(&self, kind: Kind) -> &Collection {
        match kind {
            Kind::ApiSpec => &self.api_specs,
            Kind::Environment => &self.environments,
            Kind::Request => &self.requests,
            Kind::RequestGroup => &self.request_groups,
            Kind::Workspace => &self.workspaces,
        }
    }

    pub(crate) fn collection_mut(&mut self, kind: Kind) -> &mut Collection {
        match kind {
            Kind::ApiSpec => &mut self.api_specs,
            Kind::Environment => &mut self.environments,
            Kind::Request => &mut self.requests,
            Kind::RequestGroup => &mut self.request_groups,
            Kind::Workspace => &mut self.workspaces,
        }
    }

    pub fn get(&self, kind: Kind, id: &str) -> Option<&Resource> {
        self.collection(kind).get(id)
    }

    /// Looks an id up across all kinds. Used for parent references, which
    /// may point at any container kind.
    pub fn find_by_id(&self, id: &str) -> Option<&Resource> {
        Kind::ALL.into_iter().find_map(|kind| self.get(kind, id))
    }

    /// Direct children of `parent_id` across all kinds.
    pub fn children_of(&self, parent_id: &str) -> Vec<&Resource> {
        Kind::ALL
            .into_iter()
            .flat_map(|kind| self.collection(kind).children(Some(parent_id)))
            .collect()
    }

    /// Ids of every resource below `id`, depth first. A parent always comes
    /// before its children. Parent cycles in hand-edited data are cut.
    pub fn descendant_ids(&self, id: &str) -> Vec<(Kind, String)> {
        let mut result = Vec::new();
        let mut seen: HashSet<String> = HashSet::from([id.to_string()]);
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            for child in self.children_of(&current) {
                if !seen.insert(child.id.clone()) {
                    continue;
                }
                result.push((child.kind(), child.id.clone()));
                stack.push(child.id.clone());
            }
        }
        result
    }

    pub fn len(&self) -> usize {
        Kind::ALL
            .into_iter()
            .map(|kind| self.collection(kind).len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn insert(&mut self, resource: Resource) -> Option<Resource> {
        self.collection_mut(resource.kind()).insert(resource)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn res(kind: Kind, id: &str, parent: Option<&str>, key: f64) -> Resource {
        let mut r = Resource::new(kind, parent.map(String::from), key);
        r.id = id.to_string();
        r
    }

    #[test]
    fn test_insert_routes_by_kind() {
        let mut db = Database::default();
        db.insert(res(Kind::Workspace, "wrk_1", None, 0.0));
        db.insert(res(Kind::RequestGroup, "fld_1", Some("wrk_1"), 0.0));

        assert_eq!(db.collection(Kind::Workspace).len(), 1);
        assert_eq!(db.collection(Kind::RequestGroup).len(), 1);
        assert!(db.collection(Kind::Request).is_empty());
        assert_eq!(db.len(), 2);
        assert_eq!(db.find_by_id("fld_1").map(|r| r.kind()), Some(Kind::RequestGroup));
    }

    #[test]
    fn test_same_id_replaces() {
        let mut db = Database::default();
        db.insert(res(Kind::Workspace, "wrk_1", None, 0.0));
        let previous = db.insert(res(Kind::Workspace, "wrk_1", None, 5.0));
        assert!(previous.is_some());
        assert_eq!(db.collection(Kind::Workspace).len(), 1);
        assert_eq!(db.get(Kind::Workspace, "wrk_1").unwrap().sort_key, 5.0);
    }

    #[test]
    fn test_children_in_display_order() {
        let mut older = res(Kind::Request, "req_old", Some("fld_1"), 10.0);
        older.created = 1;
        let mut newer = res(Kind::Request, "req_new", Some("fld_1"), 10.0);
        newer.created = 2;
        let collection: Collection = vec![
            res(Kind::Request, "req_c", Some("fld_1"), 30.0),
            older,
            res(Kind::Request, "req_a", Some("fld_1"), -5.0),
            newer,
            res(Kind::Request, "req_other", Some("fld_2"), 0.0),
        ]
        .into_iter()
        .collect();

        let ids: Vec<&str> = collection
            .children(Some("fld_1"))
            .into_iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["req_a", "req_new", "req_old", "req_c"]);
    }

    #[test]
    fn test_descendants_cross_kinds() {
        let mut db = Database::default();
        db.insert(res(Kind::Workspace, "wrk_1", None, 0.0));
        db.insert(res(Kind::RequestGroup, "fld_1", Some("wrk_1"), 0.0));
        db.insert(res(Kind::Request, "req_1", Some("fld_1"), 0.0));
        db.insert(res(Kind::Environment, "env_1", Some("wrk_1"), 0.0));
        db.insert(res(Kind::Request, "req_x", Some("wrk_2"), 0.0));

        let mut ids: Vec<String> = db
            .descendant_ids("wrk_1")
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["env_1", "fld_1", "req_1"]);
    }

    #[test]
    fn test_descendants_stop_at_parent_cycles() {
        let mut db = Database::default();
        db.insert(res(Kind::RequestGroup, "fld_a", Some("fld_b"), 0.0));
        db.insert(res(Kind::RequestGroup, "fld_b", Some("fld_a"), 0.0));

        let ids: Vec<String> = db
            .descendant_ids("fld_a")
            .into_iter()
            .map(|(_, id)| id)
            .collect();
        assert_eq!(ids, vec!["fld_b"]);
    }
}
