//! `schoolhub-auth` — pure authorization boundary for the school platform.
//!
//! This crate is intentionally decoupled from HTTP and storage: it holds the
//! closed role/feature/module vocabulary, the static role→permission table,
//! and the fail-closed [`AuthorizationEvaluator`] that gates every protected
//! route and UI affordance. Identity verification and flag persistence live
//! outside this crate.

pub mod evaluator;
pub mod feature;
pub mod module;
pub mod role;
pub mod session;
pub mod table;

pub use evaluator::{AuthorizationEvaluator, FeatureFlagReader};
pub use feature::{Feature, UnknownFeature};
pub use module::{Module, ModuleGate, UnknownModule};
pub use role::{Role, UnknownRole};
pub use session::{AuthenticatedUser, Session, SessionProvider};
pub use table::{Grant, RolePermissionTable};
