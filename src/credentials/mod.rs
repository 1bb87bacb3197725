//! Tracker credential and feature-flag resolution.
//!
//! Credentials come from a [`ResolverChain`]: typically the tenant settings store first,
//! then process-wide environment defaults.

pub mod error;
pub mod resolver;
pub mod store;


pub use error::CredentialError;
pub use resolver::{
    CredentialResolver, EnvCredentialResolver, ResolverChain, StoreCredentialResolver,
};
pub use store::{FeatureFlags, MemorySettingsStore, SettingsStore, TenantSettings};
