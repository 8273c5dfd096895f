//! Domain binding evaluation.
//!
//! Two independent pure checks: "is this hostname the owner domain" and "is
//! this email on the system-owner allow-list". Both are total; neither does
//! IO; both resolve ambiguity to `false`.

use manuplan_core::Email;

use crate::config::OwnerDomainConfig;

/// Case-insensitive **exact** match against the configured owner hostname.
///
/// No wildcard or subdomain matching: `admin.owner.sistema.com` must not
/// match an owner hostname of `owner.sistema.com`, so the owner surface
/// cannot be reached by registering a subdomain.
pub fn is_owner_domain(config: &OwnerDomainConfig, hostname: &str) -> bool {
    hostname.trim().to_lowercase() == config.owner_hostname()
}

/// Membership test against the configured allow-list.
///
/// An absent email is never a member. An empty allow-list makes this check
/// unconditionally false: absence of configuration must never default to
/// "allow everyone".
pub fn is_system_owner_email(config: &OwnerDomainConfig, email: Option<&Email>) -> bool {
    match email {
        Some(email) => config.system_owner_emails().contains(email),
        None => false,
    }
}
