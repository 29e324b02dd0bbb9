//! Tempus - Template Engine
//!
//! Renders `{TAG}` templates for a web request: components, `{LOOP}` blocks,
//! option menus, page lists and filters, all held in a request-scoped
//! [`Context`] created from a shared [`Engine`].
mod config;
mod context;
mod engine;
mod filter;
mod format;
mod forms;
mod issues;
mod log;
mod pagination;
mod region;
mod render;
mod store;

pub mod markup;

pub use config::{DateSettings, PaginationSettings, Settings, DEFAULT_CONFIG};
pub use context::{Context, Request};
pub use engine::Engine;
pub use filter::{Filter, Filters};
pub use forms::Forms;
pub use issues::{IssueKind, Issues};
pub use log::{Error, ErrorKind, NotFoundContext};
pub use pagination::{Limit, PageLink, Pagination};
pub use render::{render, Renderer};
pub use store::Store;

/// Types used to pass records to [`Context::parse`].
pub mod data {
    pub use serde_json::{json, Map, Value};
}
