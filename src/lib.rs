// src/lib.rs
//
// Shift constraint validation and gap-resolution ranking for healthcare
// facility rosters, plus the thin HTTP surface that exposes them. The
// engine itself lives in `engine` and only ever talks to the collaborator
// traits in `store`.

use std::sync::Arc;

pub mod engine;
pub mod models;
pub mod routes;
pub mod rules;
pub mod store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<store::MemoryStore>,
}
