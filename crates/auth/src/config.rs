//! Process-wide owner-domain configuration.
//!
//! Loaded once at bootstrap from the environment, immutable thereafter, and
//! passed by reference into every decision function. The privileged
//! allow-list can therefore never be altered at runtime by any code path;
//! changing it requires a restart.

use manuplan_core::{DomainError, DomainResult, Email};

/// Environment variable holding the owner hostname.
pub const OWNER_HOSTNAME_VAR: &str = "MANUPLAN_OWNER_HOSTNAME";
/// Environment variable holding the comma-separated system-owner allow-list.
pub const SYSTEM_OWNER_EMAILS_VAR: &str = "MANUPLAN_SYSTEM_OWNER_EMAILS";
/// Environment variable holding the tenant base domain.
pub const TENANT_BASE_DOMAIN_VAR: &str = "MANUPLAN_TENANT_BASE_DOMAIN";

const DEFAULT_OWNER_HOSTNAME: &str = "owner.sistema.com";
const DEFAULT_TENANT_BASE_DOMAIN: &str = "sistema.com";

/// Immutable owner-domain configuration.
///
/// Invariants held by construction:
/// - hostnames are non-empty and lower-cased;
/// - the allow-list is normalized (lower-case via [`Email`]) and
///   deduplicated;
/// - an empty allow-list is valid and fail-closed: no email ever matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerDomainConfig {
    owner_hostname: String,
    system_owner_emails: Vec<Email>,
    tenant_base_domain: String,
}

impl OwnerDomainConfig {
    pub fn new(
        owner_hostname: impl AsRef<str>,
        system_owner_emails: impl IntoIterator<Item = Email>,
        tenant_base_domain: impl AsRef<str>,
    ) -> DomainResult<Self> {
        let owner_hostname = normalize_hostname(owner_hostname.as_ref(), "owner hostname")?;
        let tenant_base_domain =
            normalize_hostname(tenant_base_domain.as_ref(), "tenant base domain")?;

        let mut emails: Vec<Email> = Vec::new();
        for email in system_owner_emails {
            if !emails.contains(&email) {
                emails.push(email);
            }
        }

        Ok(Self {
            owner_hostname,
            system_owner_emails: emails,
            tenant_base_domain,
        })
    }

    /// Load configuration from the process environment.
    ///
    /// Unset variables fall back to the documented defaults; a variable that
    /// is *present but malformed* is a fatal [`DomainError::Configuration`].
    /// Call once at bootstrap, before serving any authorization decision.
    pub fn from_env() -> DomainResult<Self> {
        Self::from_values(
            std::env::var(OWNER_HOSTNAME_VAR).ok().as_deref(),
            std::env::var(SYSTEM_OWNER_EMAILS_VAR).ok().as_deref(),
            std::env::var(TENANT_BASE_DOMAIN_VAR).ok().as_deref(),
        )
    }

    /// Pure core of [`Self::from_env`]; `None` means "variable unset".
    pub fn from_values(
        owner_hostname: Option<&str>,
        system_owner_emails: Option<&str>,
        tenant_base_domain: Option<&str>,
    ) -> DomainResult<Self> {
        let owner = owner_hostname.unwrap_or(DEFAULT_OWNER_HOSTNAME);
        let base = tenant_base_domain.unwrap_or(DEFAULT_TENANT_BASE_DOMAIN);

        let emails = match system_owner_emails {
            None => Vec::new(),
            Some(raw) => parse_allow_list(raw)?,
        };

        Self::new(owner, emails, base)
    }

    pub fn owner_hostname(&self) -> &str {
        &self.owner_hostname
    }

    pub fn tenant_base_domain(&self) -> &str {
        &self.tenant_base_domain
    }

    pub fn system_owner_emails(&self) -> &[Email] {
        &self.system_owner_emails
    }
}

fn normalize_hostname(raw: &str, what: &str) -> DomainResult<String> {
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(DomainError::configuration(format!("{what} cannot be empty")));
    }
    Ok(normalized)
}

fn parse_allow_list(raw: &str) -> DomainResult<Vec<Email>> {
    let mut emails = Vec::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let email = Email::new(entry)
            .map_err(|e| DomainError::configuration(format!("allow-list entry '{entry}': {e}")))?;
        if !emails.contains(&email) {
            emails.push(email);
        }
    }
    Ok(emails)
}
