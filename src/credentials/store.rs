use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::CredentialError;

/// Per-tenant settings document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantSettings {
    #[serde(default)]
    pub jira_domain: String,
    #[serde(default)]
    pub jira_email: String,
    #[serde(default)]
    pub jira_api_token: String,
    pub pr_summaries_enabled: Option<bool>,
    pub jira_ticket_enabled: Option<bool>,
}

/// Feature switches resolved for one tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    pub pr_summaries_enabled: bool,
    pub jira_ticket_enabled: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            pr_summaries_enabled: true,
            jira_ticket_enabled: false,
        }
    }
}

impl FeatureFlags {
    /// Applies a tenant's explicit overrides on top of `self`.
    pub fn overridden_by(self, settings: &TenantSettings) -> Self {
        Self {
            pr_summaries_enabled: settings
                .pr_summaries_enabled
                .unwrap_or(self.pr_summaries_enabled),
            jira_ticket_enabled: settings
                .jira_ticket_enabled
                .unwrap_or(self.jira_ticket_enabled),
        }
    }
}

/// Document store holding tenant settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn tenant_settings(&self, tenant_id: &str)
    -> Result<Option<TenantSettings>, CredentialError>;

    /// Flags applied when a tenant has no explicit value.
    async fn default_feature_flags(&self) -> Result<FeatureFlags, CredentialError> {
        Ok(FeatureFlags::default())
    }

    async fn feature_flags(&self, tenant_id: Option<&str>) -> Result<FeatureFlags, CredentialError> {
        let defaults = self.default_feature_flags().await?;
        let Some(tenant_id) = tenant_id else {
            return Ok(defaults);
        };

        match self.tenant_settings(tenant_id).await? {
            Some(settings) => Ok(defaults.overridden_by(&settings)),
            None => {
                debug!(tenant_id, "No tenant settings, using default feature flags");
                Ok(defaults)
            }
        }
    }
}

/// In-process settings store, optionally seeded from a JSON file.
///
/// The file maps tenant ids to settings documents. The reserved key `__defaults__` holds the
/// default feature flags.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    tenants: RwLock<HashMap<String, TenantSettings>>,
    defaults: FeatureFlags,
}

const DEFAULTS_KEY: &str = "__defaults__";

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tenant(self, tenant_id: impl Into<String>, settings: TenantSettings) -> Self {
        self.tenants.write().insert(tenant_id.into(), settings);
        self
    }

    pub fn with_default_flags(mut self, defaults: FeatureFlags) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn insert(&self, tenant_id: impl Into<String>, settings: TenantSettings) {
        self.tenants.write().insert(tenant_id.into(), settings);
    }

    pub fn len(&self) -> usize {
        self.tenants.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.read().is_empty()
    }

    pub fn from_json(json: &str) -> Result<Self, CredentialError> {
        let mut tenants: HashMap<String, TenantSettings> = serde_json::from_str(json)?;
        let defaults = tenants
            .remove(DEFAULTS_KEY)
            .map(|d| FeatureFlags::default().overridden_by(&d))
            .unwrap_or_default();

        Ok(Self {
            tenants: RwLock::new(tenants),
            defaults,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, CredentialError> {
        let json =
            std::fs::read_to_string(path).map_err(|source| CredentialError::SettingsRead {
                path: path.to_path_buf(),
                source,
            })?;
        let store = Self::from_json(&json)?;
        info!(path = %path.display(), tenants = store.len(), "Loaded tenant settings");
        Ok(store)
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn tenant_settings(
        &self,
        tenant_id: &str,
    ) -> Result<Option<TenantSettings>, CredentialError> {
        Ok(self.tenants.read().get(tenant_id).cloned())
    }

    async fn default_feature_flags(&self) -> Result<FeatureFlags, CredentialError> {
        Ok(self.defaults)
    }
}
