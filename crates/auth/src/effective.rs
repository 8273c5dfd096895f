//! Effective-role calculation.
//!
//! The single source of truth for "who is this request acting as". Every
//! guard and every storage policy acts on the role computed here and on
//! nothing else. The result is never persisted; it is recomputed on every
//! decision.

use manuplan_core::Email;

use crate::config::OwnerDomainConfig;
use crate::domain::{is_owner_domain, is_system_owner_email};
use crate::role::{Role, RoleAssignment};

/// Compute the effective role for one access context.
///
/// First match wins:
/// 1. owner domain AND a `SystemOwner` assignment AND allow-listed email
///    => `SystemOwner`;
/// 2. a `MasterTi` assignment => `MasterTi`;
/// 3. an `Admin` assignment => `Admin`;
/// 4. otherwise `Usuario`.
///
/// The owner tier requires a conjunction of three independent signals so
/// that compromising any single one (a stolen role row, a spoofed host
/// header, a DNS mistake) is insufficient alone. Total function: always
/// returns a valid role, no error path.
pub fn effective_role(
    config: &OwnerDomainConfig,
    assignments: &[RoleAssignment],
    email: Option<&Email>,
    hostname: &str,
) -> Role {
    let holds = |role: Role| assignments.iter().any(|a| a.role == role);

    if is_owner_domain(config, hostname)
        && holds(Role::SystemOwner)
        && is_system_owner_email(config, email)
    {
        return Role::SystemOwner;
    }

    if holds(Role::MasterTi) {
        Role::MasterTi
    } else if holds(Role::Admin) {
        Role::Admin
    } else {
        Role::Usuario
    }
}
