//! dftr - a wiki-based personal knowledge organizer
//!
//! Pages are plain text files under a data directory. A page name such as
//! `Projects:Rust` maps to `data/Projects/Rust.txt`; each file holds the page
//! body followed by a sentinel line and a JSON metadata record. Bodies are
//! rendered to HTML with a small line-oriented markup.

pub mod components;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logger;
pub mod services;
pub mod types;
pub mod utils;

use axum::{routing::{get, post}, Router};

pub use config::Config;
pub use errors::WikiError;
pub use types::{AppState, Metadata, Page};
pub use services::{sanitize_page_name, MarkupService, PageIndex, PageName, PageStore, PathMapper, WikiService};
pub use services::metadata_codec::SENTINEL;

/// Build the HTTP router over a shared state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::handle_root))
        .route("/view/*name", get(handlers::handle_view))
        .route("/edit/*name", get(handlers::handle_edit))
        .route("/save", post(handlers::handle_save))
        .route("/delete/*name", get(handlers::handle_delete))
        .route("/all_pages", get(handlers::handle_all_pages))
        .route("/static/*path", get(handlers::handle_static))
        .with_state(state)
}
