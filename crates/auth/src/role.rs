//! Role model and hierarchy resolution.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use manuplan_core::{DomainError, UserId};

/// Privilege role.
///
/// `Usuario < Admin < MasterTi` form the tenant tier, strictly ordered by
/// privilege. `SystemOwner` is a disjoint, domain-gated tier: it is not
/// simply "above" `MasterTi` and is only attainable when the owner-domain
/// conjunction holds (see [`crate::effective_role`]).
///
/// The wire form uses the upper-case names stored in the role table:
/// `USUARIO`, `ADMIN`, `MASTER_TI`, `SYSTEM_OWNER`. Anything else is a
/// parse error, never silently coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Usuario,
    Admin,
    MasterTi,
    SystemOwner,
}

impl Role {
    /// Rank within the tenant tier (1..=3). `SystemOwner` has no tenant
    /// rank; it lives outside the tenant order.
    pub fn tenant_rank(&self) -> Option<u8> {
        match self {
            Role::Usuario => Some(1),
            Role::Admin => Some(2),
            Role::MasterTi => Some(3),
            Role::SystemOwner => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Usuario => "USUARIO",
            Role::Admin => "ADMIN",
            Role::MasterTi => "MASTER_TI",
            Role::SystemOwner => "SYSTEM_OWNER",
        }
    }

    /// Whether this role grants at least the privilege of `required`.
    ///
    /// `SystemOwner` satisfies every requirement (the global administrative
    /// tier); within the tenant tier this is a rank comparison.
    pub fn satisfies(&self, required: Role) -> bool {
        match (self.tenant_rank(), required.tenant_rank()) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(own), Some(req)) => own >= req,
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USUARIO" => Ok(Role::Usuario),
            "ADMIN" => Ok(Role::Admin),
            "MASTER_TI" => Ok(Role::MasterTi),
            "SYSTEM_OWNER" => Ok(Role::SystemOwner),
            other => Err(DomainError::validation(format!("unknown role: {other}"))),
        }
    }
}

/// A role granted to one subject. Many may exist per subject (multi-role).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub subject: UserId,
    pub role: Role,
}

impl RoleAssignment {
    pub fn new(subject: UserId, role: Role) -> Self {
        Self { subject, role }
    }
}

/// Resolve the highest-privilege tenant-tier role among `assignments`.
///
/// Empty input resolves to `Usuario` (fail to the least-privileged role,
/// never to "no role"). `SystemOwner` assignments contribute nothing here;
/// that tier is resolved by the effective-role calculator. Total function:
/// no error path.
pub fn highest_role(assignments: &[RoleAssignment]) -> Role {
    assignments
        .iter()
        .filter_map(|a| a.role.tenant_rank().map(|rank| (rank, a.role)))
        .max_by_key(|(rank, _)| *rank)
        .map(|(_, role)| role)
        .unwrap_or(Role::Usuario)
}
