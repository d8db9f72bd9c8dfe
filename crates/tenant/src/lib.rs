//! `schoolhub-tenant` — per-tenant feature configuration.
//!
//! Owns the mutable flag state the evaluator projects over: the per-tenant
//! [`TenantFeatureSet`] and the admin-gated [`TenantFeatureRegistry`].

pub mod features;
pub mod registry;

pub use features::TenantFeatureSet;
pub use registry::TenantFeatureRegistry;
