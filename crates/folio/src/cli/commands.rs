//! Per-command handlers: resolve identifiers, call the API, print.

use super::prompt::TermPrompter;
use super::render::{render_list, render_messages, render_resource};
use anyhow::{anyhow, Result};
use folioapp::api::FolioApi;
use folioapp::commands::{CmdResult, Patch};
use folioapp::model::{Kind, Resource};
use folioapp::resolve::match_identifier;
use folioapp::store::DocumentStore;

fn print_result(result: &CmdResult) {
    print!("{}", render_messages(&result.messages));
}

/// Resolves a document of `kind`, prompting when `identifier` is absent.
fn resolve<S: DocumentStore>(
    api: &FolioApi<S>,
    kind: Kind,
    identifier: Option<&str>,
) -> Result<Resource> {
    let prompter = TermPrompter::new();
    api.resolve(kind, identifier, &prompter)?.ok_or_else(|| match identifier {
        Some(id) if !id.is_empty() => anyhow!("No {} matches '{}'", kind, id),
        _ => anyhow!("No {} selected", kind),
    })
}

/// Parents can be of any kind, so every collection is searched.
fn resolve_parent<S: DocumentStore>(api: &FolioApi<S>, identifier: &str) -> Result<String> {
    Kind::ALL
        .into_iter()
        .find_map(|kind| match_identifier(api.database().collection(kind), identifier))
        .map(|r| r.id.clone())
        .ok_or_else(|| anyhow!("No parent matches '{}'", identifier))
}

fn resolve_parent_opt<S: DocumentStore>(
    api: &FolioApi<S>,
    identifier: Option<&str>,
) -> Result<Option<String>> {
    identifier.map(|id| resolve_parent(api, id)).transpose()
}

pub fn list<S: DocumentStore>(api: &FolioApi<S>, kind: Kind, parent: Option<&str>) -> Result<()> {
    let parent_id = resolve_parent_opt(api, parent)?;
    print!("{}", render_list(&api.list(kind, parent_id.as_deref())));
    Ok(())
}

pub fn show<S: DocumentStore>(api: &FolioApi<S>, kind: Kind, id: Option<&str>) -> Result<()> {
    let resource = resolve(api, kind, id)?;
    print!("{}", render_resource(&resource));
    Ok(())
}

pub fn create<S: DocumentStore>(
    api: &mut FolioApi<S>,
    kind: Kind,
    name: Option<String>,
    description: Option<String>,
    parent: Option<&str>,
) -> Result<()> {
    let mut patch = Patch::new();
    if let Some(parent_id) = resolve_parent_opt(api, parent)? {
        patch = patch.parent(parent_id);
    }
    if let Some(name) = name {
        patch = patch.name(name);
    }
    if let Some(description) = description {
        patch = patch.description(description);
    }
    let result = api.create(kind, patch)?;
    print_result(&result);
    Ok(())
}

pub fn duplicate<S: DocumentStore>(
    api: &mut FolioApi<S>,
    kind: Kind,
    id: Option<&str>,
    name: Option<String>,
    parent: Option<&str>,
) -> Result<()> {
    let source = resolve(api, kind, id)?;
    let mut patch = Patch::new();
    if let Some(parent_id) = resolve_parent_opt(api, parent)? {
        patch = patch.parent(parent_id);
    }
    if let Some(name) = name {
        patch = patch.name(name);
    }
    let result = api.duplicate(kind, &source.id, patch)?;
    print_result(&result);
    Ok(())
}

pub fn move_doc<S: DocumentStore>(
    api: &mut FolioApi<S>,
    kind: Kind,
    id: Option<&str>,
    parent: Option<&str>,
    after: Option<&str>,
) -> Result<()> {
    let resource = resolve(api, kind, id)?;
    let parent_id = match parent {
        Some(p) => Some(resolve_parent(api, p)?),
        None => resource.parent_id.clone(),
    };
    let after_id = match after {
        Some(a) => Some(resolve_parent(api, a)?),
        None => None,
    };

    let result = api.move_to(kind, &resource.id, parent_id.as_deref(), after_id.as_deref())?;
    print_result(&result);
    if let Some(moved) = result.affected.first() {
        println!("{} moved: {}", kind, moved.name());
    }
    Ok(())
}

pub fn remove<S: DocumentStore>(api: &mut FolioApi<S>, kind: Kind, id: Option<&str>) -> Result<()> {
    let resource = resolve(api, kind, id)?;
    let result = api.remove(kind, &resource.id)?;
    print_result(&result);
    Ok(())
}

pub fn rebalance<S: DocumentStore>(api: &mut FolioApi<S>, parent: Option<&str>) -> Result<()> {
    let parent_id = resolve_parent_opt(api, parent)?;
    let result = api.rebalance(parent_id.as_deref())?;
    print_result(&result);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use folioapp::store::doc_store::DocStore;
    use folioapp::store::mem_backend::MemBackend;

    fn api_with_tree() -> (FolioApi<DocStore<MemBackend>>, String, String) {
        let mut api = FolioApi::new(DocStore::in_memory());
        let wrk = api
            .create(Kind::Workspace, Patch::new().name("Main"))
            .unwrap()
            .affected
            .remove(0);
        let fld = api
            .create(Kind::RequestGroup, Patch::new().parent(&wrk.id).name("Auth"))
            .unwrap()
            .affected
            .remove(0);
        (api, wrk.id, fld.id)
    }

    #[test]
    fn test_parent_resolves_by_name_across_kinds() {
        let (api, wrk_id, fld_id) = api_with_tree();
        assert_eq!(resolve_parent(&api, "Main").unwrap(), wrk_id);
        assert_eq!(resolve_parent(&api, "Auth").unwrap(), fld_id);
        assert_eq!(resolve_parent(&api, &fld_id[..6]).unwrap(), fld_id);
        assert!(resolve_parent(&api, "Nope").is_err());
    }

    #[test]
    fn test_create_under_named_parent() {
        let (mut api, _, fld_id) = api_with_tree();
        create(&mut api, Kind::Request, Some("Login".into()), None, Some("Auth")).unwrap();
        let listed = api.list(Kind::Request, Some(&fld_id));
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name(), "Login");
    }

    #[test]
    fn test_move_keeps_parent_when_not_given() {
        let (mut api, wrk_id, _) = api_with_tree();
        create(&mut api, Kind::RequestGroup, Some("Users".into()), None, Some("Main")).unwrap();

        // Users went to the top; move it after Auth.
        move_doc(&mut api, Kind::RequestGroup, Some("Users"), None, Some("Auth")).unwrap();
        let names: Vec<String> = api
            .list(Kind::RequestGroup, Some(&wrk_id))
            .iter()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, vec!["Auth", "Users"]);
    }

    #[test]
    fn test_unknown_identifier_is_an_error() {
        let (api, _, _) = api_with_tree();
        let err = show(&api, Kind::Workspace, Some("Other")).unwrap_err();
        assert!(err.to_string().contains("No Workspace matches 'Other'"));
    }
}
