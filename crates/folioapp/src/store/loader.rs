use super::database::Database;
use crate::config::FolioConfig;
use crate::error::{FolioError, Result};
use crate::model::{Kind, Resource};
use futures::future::try_join_all;
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;

/// The file each loaded document was read from.
pub type SourceMap = HashMap<(Kind, String), PathBuf>;

/// Builds a [`Database`] from `<root>/<data_dir>/<Kind>/*`.
///
/// `kinds` limits which collections are populated; an empty slice means all
/// kinds. A missing data directory or kind directory yields empty
/// collections. Any file that fails to read or decode fails the whole load.
pub async fn load(root: &Path, config: &FolioConfig, kinds: &[Kind]) -> Result<Database> {
    Ok(load_with_sources(root, config, kinds).await?.0)
}

/// Like [`load`], also returning where every document lives on disk.
///
/// File names are free-form, so writers must go through these paths rather
/// than derive one from the id.
pub async fn load_with_sources(
    root: &Path,
    config: &FolioConfig,
    kinds: &[Kind],
) -> Result<(Database, SourceMap)> {
    let mut db = Database::default();
    let mut sources = SourceMap::new();
    let data_dir = config.data_path(root);

    if !fs::try_exists(&data_dir).await? {
        tracing::debug!(dir = %data_dir.display(), "data directory not found, empty store");
        return Ok((db, sources));
    }

    let kinds: Vec<Kind> = if kinds.is_empty() {
        Kind::ALL.to_vec()
    } else {
        kinds.to_vec()
    };

    let loaded = try_join_all(kinds.into_iter().map(|kind| load_kind(&data_dir, kind))).await?;

    for (kind, docs) in loaded {
        for (doc, path) in docs {
            if let Some(previous) = sources.insert((kind, doc.id.clone()), path) {
                tracing::warn!(id = %doc.id, path = %previous.display(), "duplicate id, file shadowed");
            }
            db.collection_mut(kind).insert(doc);
        }
    }

    tracing::debug!(documents = db.len(), "store loaded");
    Ok((db, sources))
}

async fn load_kind(data_dir: &Path, kind: Kind) -> Result<(Kind, Vec<(Resource, PathBuf)>)> {
    let kind_dir = data_dir.join(kind.dir_name());
    if !fs::try_exists(&kind_dir).await? {
        return Ok((kind, Vec::new()));
    }

    let mut files: Vec<PathBuf> = Vec::new();
    let mut entries = fs::read_dir(&kind_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        // Follows symlinks; a dangling link is a read error, not a skip.
        let metadata = fs::metadata(&path).await.map_err(|source| FolioError::ReadFile {
            path: path.clone(),
            source,
        })?;
        if metadata.is_file() {
            files.push(path);
        } else {
            tracing::warn!(path = %path.display(), "skipping directory entry");
        }
    }

    let docs = try_join_all(files.into_iter().map(|path| async move {
        let resource = read_document(kind, &path).await?;
        Ok::<_, FolioError>((resource, path))
    }))
    .await?;
    Ok((kind, docs))
}

/// Reads and decodes one persisted document of `kind`.
pub async fn read_document(kind: Kind, path: &Path) -> Result<Resource> {
    let bytes = fs::read(path).await.map_err(|source| FolioError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let resource = parse_document(kind, path, &bytes)?;
    tracing::debug!(id = %resource.id, path = %path.display(), "parsed document");
    Ok(resource)
}

/// Decodes a YAML document found in `kind`'s directory.
///
/// A document without a `type` tag takes the kind of its directory; one whose
/// tag names a different kind is rejected.
pub fn parse_document(kind: Kind, path: &Path, bytes: &[u8]) -> Result<Resource> {
    let parse_error = |message: String| FolioError::Parse {
        path: path.to_path_buf(),
        message,
    };

    let mut value: Value = serde_yaml::from_slice(bytes).map_err(|e| parse_error(e.to_string()))?;
    let mapping = value
        .as_mapping_mut()
        .ok_or_else(|| parse_error("expected a key-value document".to_string()))?;

    match mapping.get("type").map(|t| t.as_str()) {
        None => {
            mapping.insert(Value::from("type"), Value::from(kind.dir_name()));
        }
        Some(Some(tag)) if tag == kind.dir_name() => {}
        Some(tag) => {
            return Err(parse_error(format!(
                "type {:?} does not match directory {}",
                tag.unwrap_or("<non-string>"),
                kind.dir_name()
            )))
        }
    }

    let resource: Resource =
        serde_yaml::from_value(value).map_err(|e| parse_error(e.to_string()))?;
    Ok(resource.migrate())
}
