//! # Folio Architecture
//!
//! Folio is a **typed, file-backed document store**. It keeps API specs,
//! environments, requests, folders and workspaces as one YAML file each, and
//! orders siblings with fractional sort keys so that inserting between two
//! documents never rewrites the others.
//!
//! Like any UI-agnostic library, the CLI in the `folio` crate is just one
//! client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (folio crate)                                    │
//! │  - Parses arguments, prompts, prints                        │
//! │  - Owns the tokio runtime and the tracing subscriber        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, resolver and queries          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - create, update, duplicate, move, remove, rebalance       │
//! │  - Sort keys from sort_key.rs, notifications via hooks.rs   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Async loader building a typed Database                   │
//! │  - DocumentStore trait, FsBackend / MemBackend              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Sort Keys
//!
//! Every document carries a `metaSortKey`. Siblings (documents of any kind
//! sharing a parent) display in ascending key order. New documents go to the
//! top, duplicates go right after their original, and when two neighbouring
//! keys get too close to split, the caller runs an explicit rebalance. See
//! [`sort_key`].
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never reads
//! from the terminal. Interactive selection goes through the injected
//! [`resolve::Prompter`].
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Mutations over a [`store::DocumentStore`]
//! - [`store`]: Loader, typed collections, persistence backends
//! - [`model`]: Kinds, payloads and the [`model::Resource`] record
//! - [`sort_key`]: Fractional key allocation
//! - [`resolve`]: Identifier resolution and interactive selection
//! - [`hooks`]: Post-commit observers
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod hooks;
pub mod model;
pub mod resolve;
pub mod sort_key;
pub mod store;
