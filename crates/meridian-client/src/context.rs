//! # Tenant Context Resolution
//!
//! Nearly every call is scoped by company, environment and user. Callers
//! may pass any of them; whatever is missing comes from device storage.
//!
//! ## Resolution
//! ```text
//!   caller override (non-blank)?  ──yes──►  use it
//!            │ no
//!            ▼
//!   device storage (read concurrently with the other missing ids)
//!            │
//!            ▼
//!   still missing?  ──►  "<field> is required", before any I/O
//! ```

use meridian_core::endpoint::Requires;
use meridian_core::validation::require_identifier;
use meridian_core::ContextOverrides;
use meridian_store::{SessionStore, StoreResult};

use crate::error::ClientResult;

/// Identifiers resolved for one call. Only the required ones are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedContext {
    pub cmp_uuid: Option<String>,
    pub env_uuid: Option<String>,
    pub user_uuid: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ContextResolver {
    session: SessionStore,
}

fn supplied(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ContextResolver {
    pub fn new(session: SessionStore) -> Self {
        ContextResolver { session }
    }

    async fn lookup<F, Fut>(
        needed: bool,
        given: &Option<String>,
        read: F,
    ) -> StoreResult<Option<String>>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = StoreResult<Option<String>>>,
    {
        if !needed {
            return Ok(None);
        }
        match supplied(given) {
            Some(v) => Ok(Some(v)),
            None => read().await,
        }
    }

    /// Resolves the identifiers in `requires`.
    ///
    /// Missing values are reported in the order company, environment, user.
    pub async fn resolve(
        &self,
        requires: Requires,
        overrides: &ContextOverrides,
    ) -> ClientResult<ResolvedContext> {
        if requires.is_empty() {
            return Ok(ResolvedContext::default());
        }

        let (cmp, env, user) = tokio::join!(
            Self::lookup(requires.contains(Requires::CMP), &overrides.cmp_uuid, || {
                self.session.cmp_uuid()
            }),
            Self::lookup(requires.contains(Requires::ENV), &overrides.env_uuid, || {
                self.session.env_uuid()
            }),
            Self::lookup(requires.contains(Requires::USER), &overrides.user_uuid, || {
                self.session.uuid()
            }),
        );
        let (cmp, env, user) = (cmp?, env?, user?);

        let mut resolved = ResolvedContext::default();
        if requires.contains(Requires::CMP) {
            resolved.cmp_uuid = Some(require_identifier("cmpUuid", cmp.as_deref())?);
        }
        if requires.contains(Requires::ENV) {
            resolved.env_uuid = Some(require_identifier("envUuid", env.as_deref())?);
        }
        if requires.contains(Requires::USER) {
            resolved.user_uuid = Some(require_identifier("userUuid", user.as_deref())?);
        }
        Ok(resolved)
    }
}
