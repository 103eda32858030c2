//! Engine configuration.

use crate::task::domain::TenantId;
use serde::Deserialize;

/// Tunables for the task lifecycle engine.
///
/// # Examples
///
/// ```
/// use signoff::task::services::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert!(config.allow_resume);
///
/// let locked = EngineConfig::locked_down();
/// assert!(!locked.allow_resume);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tenant tag stamped on every record the engine creates.
    pub tenant_id: Option<TenantId>,
    /// Whether archived tasks may be revived with `resume`.
    pub allow_resume: bool,
    /// Largest participant list accepted by creation and sign-addition.
    pub max_participants: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tenant_id: None,
            allow_resume: true,
            max_participants: 200,
        }
    }
}

impl EngineConfig {
    /// Configuration that refuses to revive archived tasks.
    #[must_use]
    pub fn locked_down() -> Self {
        Self {
            allow_resume: false,
            ..Self::default()
        }
    }

    /// Sets the tenant tag.
    #[must_use]
    pub fn with_tenant(mut self, tenant_id: TenantId) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }
}
