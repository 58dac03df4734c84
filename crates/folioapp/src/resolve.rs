//! # Identifier Resolution
//!
//! Ids are long (`fld_3f1c0a9e...`), so users refer to documents by a prefix,
//! by name, or not at all and pick from a list.
//!
//! ## Matching Rules
//!
//! Tried in order; the first rule with a match wins:
//!
//! 1. **Exact id**: `fld_abc999` → that document.
//! 2. **Id prefix**: `fld_abc1` → first document whose id starts with it.
//! 3. **Name**: the kind's display field (file name for API specs) equals the
//!    input exactly.
//!
//! An ambiguous prefix returns whichever match the collection enumerates
//! first. Callers must not rely on which one that is.
//!
//! ## Interactive Selection
//!
//! Without an identifier the resolver offers one choice per document,
//! labelled `"<name> - <first 10 chars of id>"`, through a [`Prompter`]. The
//! chosen label is mapped back by id prefix.
//!
//! No match is `Ok(None)`, not an error.

use crate::error::Result;
use crate::model::Resource;
use crate::sort_key::display_order;
use crate::store::Collection;

/// Capability for asking the user to pick one of several choices.
pub trait Prompter {
    /// Returns the chosen entry of `choices`.
    fn prompt(&self, message: &str, choices: &[String]) -> Result<String>;
}

pub struct Resolver<'p> {
    prompter: &'p dyn Prompter,
}

impl<'p> Resolver<'p> {
    pub fn new(prompter: &'p dyn Prompter) -> Self {
        Self { prompter }
    }

    /// Resolves `identifier` within `collection`, prompting when it is absent
    /// or empty.
    pub fn resolve<'a>(
        &self,
        collection: &'a Collection,
        identifier: Option<&str>,
    ) -> Result<Option<&'a Resource>> {
        match identifier.filter(|s| !s.is_empty()) {
            Some(identifier) => Ok(match_identifier(collection, identifier)),
            None => self.select(collection),
        }
    }

    fn select<'a>(&self, collection: &'a Collection) -> Result<Option<&'a Resource>> {
        let mut candidates: Vec<&Resource> = collection.iter().collect();
        let Some(first) = candidates.first() else {
            return Ok(None);
        };
        let message = format!("Select a {}", first.kind());

        candidates.sort_by(|a, b| display_order(a, b));
        let choices: Vec<String> = candidates.iter().map(|r| r.choice_label()).collect();

        let chosen = self.prompter.prompt(&message, &choices)?;
        tracing::debug!(%chosen, "prompt answered");

        let Some((_, id_prefix)) = chosen.rsplit_once(" - ") else {
            return Ok(None);
        };
        Ok(candidates.into_iter().find(|r| r.id.starts_with(id_prefix)))
    }
}

/// Applies the exact-id, id-prefix and name rules in that order.
pub fn match_identifier<'a>(collection: &'a Collection, identifier: &str) -> Option<&'a Resource> {
    collection
        .get(identifier)
        .or_else(|| collection.iter().find(|r| r.id.starts_with(identifier)))
        .or_else(|| collection.iter().find(|r| r.name() == identifier))
}
