//! `schoolhub-guard` — the route guard.
//!
//! Wraps a protected view and decides whether to render it, keep showing a
//! loading indicator, or redirect. Pure decision logic lives in
//! [`RouteGuard::evaluate`]; the one suspension point (waiting on the
//! identity provider) lives in [`resolve_session`].

pub mod guard;
pub mod resolve;

pub use guard::{GuardRequirements, GuardState, RedirectTarget, RouteGuard};
pub use resolve::resolve_session;
