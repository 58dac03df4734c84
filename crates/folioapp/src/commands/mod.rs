//! # Command Layer
//!
//! This module contains the **mutation logic** of folio. Each command lives in
//! its own submodule and operates on any [`crate::store::DocumentStore`].
//!
//! ## Role and Responsibilities
//!
//! - Validate the request (`MissingParent`, cycles on move, ...)
//! - Compute sort keys through [`crate::sort_key`]
//! - Write through the store, then notify [`crate::hooks::Hooks`]
//! - Return a structured [`CmdResult`]
//!
//! ## What Commands Do NOT Do
//!
//! - **Any terminal I/O**: No stdout, stderr or prompts
//! - **Retries**: An error aborts the command; the caller decides what next
//!
//! ## Atomicity
//!
//! Single-document commands either write or fail without touching state.
//! Commands over a subtree (duplicate, remove, rebalance) validate everything
//! before the first write and go through [`helpers::all_or_nothing`]: a
//! backend failure midway undoes the writes made so far. Hooks fire only
//! once every write committed.
//!
//! ## Command Modules
//!
//! - [`create`]: Create a document at the top of its sibling list
//! - [`update`]: Apply a patch to a document
//! - [`duplicate`]: Copy a document (and its subtree) right after itself
//! - [`move_doc`]: Re-parent and/or re-position a document
//! - [`remove`]: Delete a document and its subtree
//! - [`rebalance`]: Spread a sibling set back over evenly spaced keys
//! - [`helpers`]: Sibling lookups shared by the above

use crate::error::{FolioError, Result};
use crate::model::{Body, Resource};
use serde::Serialize;

pub mod create;
pub mod duplicate;
pub mod helpers;
pub mod move_doc;
pub mod rebalance;
pub mod remove;
pub mod update;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default)]
pub struct CmdResult {
    /// Documents written or removed, primary document first.
    pub affected: Vec<Resource>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected(mut self, resources: Vec<Resource>) -> Self {
        self.affected = resources;
        self
    }
}

/// Field changes for create/update/duplicate. Unset fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct Patch {
    pub parent_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub sort_key: Option<f64>,
    pub body: Option<Body>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn sort_key(mut self, key: f64) -> Self {
        self.sort_key = Some(key);
        self
    }

    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Applies the payload fields (body, name, description) and the sort
    /// key. Parent changes are handled by the commands themselves.
    pub(crate) fn apply_fields(&self, resource: &mut Resource) -> Result<()> {
        if let Some(body) = &self.body {
            if body.kind() != resource.kind() {
                return Err(FolioError::Store(format!(
                    "Cannot apply a {} payload to a {}",
                    body.kind(),
                    resource.kind()
                )));
            }
            resource.body = body.clone();
        }
        if let Some(name) = &self.name {
            resource.body.set_name(name.clone());
        }
        if let Some(description) = &self.description {
            resource.body.set_description(description.clone());
        }
        if let Some(key) = self.sort_key {
            if !key.is_finite() {
                return Err(FolioError::InvalidSortKey(key));
            }
            resource.sort_key = key;
        }
        Ok(())
    }
}
