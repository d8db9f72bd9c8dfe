//! `schoolhub-api` — HTTP gating surface.
//!
//! Thin axum layer over the evaluator/guard/registry: bearer→session
//! middleware, guarded module routes, and the admin-gated tenant settings
//! endpoints. Module handlers are stubs on purpose; the CRUD screens behind
//! them are a different subsystem.

pub mod app;
pub mod context;
pub mod errors;
pub mod middleware;
pub mod session;

pub use app::{AppState, router};
pub use context::SessionContext;
pub use session::StaticSessionProvider;
