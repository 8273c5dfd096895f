//! Tenant slug derivation from hostnames.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use manuplan_core::{DomainError, DomainResult};

/// Sentinel tenant for contexts that require a non-null value when the
/// hostname is ambiguous (bare base domain, localhost).
const DEFAULT_TENANT: &str = "default";

/// A tenant identifier derived from a hostname label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantSlug(String);

impl TenantSlug {
    pub fn new(raw: impl AsRef<str>) -> DomainResult<Self> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(DomainError::validation("tenant slug cannot be empty"));
        }
        if normalized.contains('.') {
            return Err(DomainError::validation("tenant slug must be a single label"));
        }
        Ok(Self(normalized))
    }

    /// The sentinel tenant used by callers that need a non-null value.
    pub fn default_tenant() -> Self {
        Self(DEFAULT_TENANT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for TenantSlug {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TenantSlug {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

fn is_local_or_loopback(hostname: &str) -> bool {
    matches!(hostname, "localhost" | "127.0.0.1" | "::1" | "[::1]" | "0.0.0.0")
        || hostname.ends_with(".localhost")
}

/// Derive the tenant slug from a hostname, or `None` when the hostname does
/// not designate a tenant.
///
/// Rules, purely syntactic (no network or database state):
/// - localhost/loopback hostnames carry no tenant (local/dev context);
/// - a hostname equal to the base domain, or with fewer labels, carries no
///   tenant;
/// - otherwise the leftmost of at least three dot-separated labels is the
///   slug (`acme.sistema.com` resolves to `acme`).
pub fn tenant_slug(hostname: &str, base_domain: &str) -> Option<TenantSlug> {
    let hostname = hostname.trim().to_lowercase();
    let base_domain = base_domain.trim().to_lowercase();

    if hostname.is_empty() || is_local_or_loopback(&hostname) {
        return None;
    }
    if hostname == base_domain {
        return None;
    }

    let mut labels = hostname.split('.');
    let leftmost = labels.next()?;
    if labels.count() < 2 {
        // Fewer than three labels total: bare or apex-like hostname.
        return None;
    }

    TenantSlug::new(leftmost).ok()
}

/// Like [`tenant_slug`], for callers that require a non-null tenant: the
/// ambiguous cases resolve to the `default` sentinel instead of `None`.
pub fn resolve_or_default(hostname: &str, base_domain: &str) -> TenantSlug {
    tenant_slug(hostname, base_domain).unwrap_or_else(TenantSlug::default_tenant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BASE: &str = "sistema.com";

    #[test]
    fn subdomain_yields_its_leftmost_label() {
        assert_eq!(tenant_slug("acme.sistema.com", BASE).unwrap().as_str(), "acme");
        assert_eq!(
            tenant_slug("vale-mina.sistema.com", BASE).unwrap().as_str(),
            "vale-mina"
        );
    }

    #[test]
    fn localhost_and_loopback_have_no_tenant() {
        assert_eq!(tenant_slug("localhost", BASE), None);
        assert_eq!(tenant_slug("127.0.0.1", BASE), None);
        assert_eq!(tenant_slug("::1", BASE), None);
        assert_eq!(tenant_slug("acme.localhost", BASE), None);
    }

    #[test]
    fn bare_base_domain_has_no_tenant() {
        assert_eq!(tenant_slug("sistema.com", BASE), None);
        assert_eq!(tenant_slug("SISTEMA.COM", BASE), None);
    }

    #[test]
    fn two_label_hostnames_have_no_tenant() {
        assert_eq!(tenant_slug("example.com", BASE), None);
        assert_eq!(tenant_slug("", BASE), None);
    }

    #[test]
    fn resolution_is_case_insensitive() {
        assert_eq!(tenant_slug("ACME.Sistema.Com", BASE).unwrap().as_str(), "acme");
    }

    #[test]
    fn ambiguous_hostnames_resolve_to_the_default_sentinel_when_required() {
        assert_eq!(resolve_or_default("localhost", BASE).as_str(), "default");
        assert_eq!(resolve_or_default("sistema.com", BASE).as_str(), "default");
        assert_eq!(resolve_or_default("acme.sistema.com", BASE).as_str(), "acme");
    }

    #[test]
    fn slug_validation_rejects_empty_and_dotted_labels() {
        assert!(TenantSlug::new("  ").is_err());
        assert!(TenantSlug::new("a.b").is_err());
        assert_eq!(TenantSlug::new(" Acme ").unwrap().as_str(), "acme");
    }

    proptest! {
        /// Property: whenever a slug is derived, it is the hostname's first
        /// label, lower-cased.
        #[test]
        fn derived_slug_is_the_leftmost_label(
            label in "[a-z][a-z0-9-]{0,14}",
            middle in "[a-z]{1,8}",
        ) {
            let hostname = format!("{label}.{middle}.sistema.com");
            let slug = tenant_slug(&hostname, BASE);
            let slug = slug.unwrap();
            prop_assert_eq!(slug.as_str(), label.as_str());
        }
    }
}
