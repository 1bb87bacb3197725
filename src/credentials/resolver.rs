use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::error::CredentialError;
use super::store::SettingsStore;
use crate::tracker::TrackerCredentials;

/// Looks up tracker credentials for a tenant.
///
/// `Ok(None)` means "not known here" and lets a [`ResolverChain`] try the next link.
#[async_trait]
pub trait CredentialResolver: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn resolve(
        &self,
        tenant_id: Option<&str>,
    ) -> Result<Option<TrackerCredentials>, CredentialError>;
}

/// Process-wide default credentials taken from the environment at startup.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialResolver {
    credentials: Option<TrackerCredentials>,
}

impl EnvCredentialResolver {
    /// Builds the resolver; without a URL it never resolves anything.
    pub fn new(url: Option<&str>, email: Option<&str>, token: Option<&str>) -> Self {
        let credentials = url
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(|u| TrackerCredentials::basic(u, email.unwrap_or(""), token.unwrap_or("")));
        Self { credentials }
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_some()
    }
}

#[async_trait]
impl CredentialResolver for EnvCredentialResolver {
    fn name(&self) -> &'static str {
        "environment"
    }

    async fn resolve(
        &self,
        _tenant_id: Option<&str>,
    ) -> Result<Option<TrackerCredentials>, CredentialError> {
        Ok(self.credentials.clone())
    }
}

/// Tenant credentials read from a [`SettingsStore`].
pub struct StoreCredentialResolver {
    store: Arc<dyn SettingsStore>,
}

impl StoreCredentialResolver {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CredentialResolver for StoreCredentialResolver {
    fn name(&self) -> &'static str {
        "tenant_store"
    }

    async fn resolve(
        &self,
        tenant_id: Option<&str>,
    ) -> Result<Option<TrackerCredentials>, CredentialError> {
        let Some(tenant_id) = tenant_id else {
            return Ok(None);
        };

        let Some(settings) = self.store.tenant_settings(tenant_id).await? else {
            debug!(tenant_id, "No tracker credentials stored for tenant");
            return Ok(None);
        };

        if settings.jira_domain.trim().is_empty() || settings.jira_api_token.is_empty() {
            debug!(tenant_id, "Stored tracker credentials are incomplete");
            return Ok(None);
        }

        Ok(Some(TrackerCredentials::basic(
            &settings.jira_domain,
            &settings.jira_email,
            &settings.jira_api_token,
        )))
    }
}

/// Ordered resolvers; the first `Some` wins.
///
/// A link that fails is logged and skipped, so a store outage degrades to the
/// environment defaults.
#[derive(Default, Clone)]
pub struct ResolverChain {
    links: Vec<Arc<dyn CredentialResolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, resolver: Arc<dyn CredentialResolver>) -> Self {
        self.links.push(resolver);
        self
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl std::fmt::Debug for ResolverChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.links.iter().map(|l| l.name()))
            .finish()
    }
}

#[async_trait]
impl CredentialResolver for ResolverChain {
    fn name(&self) -> &'static str {
        "chain"
    }

    async fn resolve(
        &self,
        tenant_id: Option<&str>,
    ) -> Result<Option<TrackerCredentials>, CredentialError> {
        for link in &self.links {
            match link.resolve(tenant_id).await {
                Ok(Some(credentials)) => {
                    debug!(resolver = link.name(), "Resolved tracker credentials");
                    return Ok(Some(credentials));
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(resolver = link.name(), error = %e, "Credential resolver failed, trying next");
                }
            }
        }
        Ok(None)
    }
}
