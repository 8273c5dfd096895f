//! Row-level isolation contract.
//!
//! The external relational store enforces these rules with row filters and
//! triggers; this module states the contract as a trait and ships a
//! reference enforcement so the invariants are executable in tests even with
//! every client-side guard bypassed.

use thiserror::Error;
use tracing::warn;

use manuplan_audit::{record_best_effort, AuditRecord, AuditSink};
use manuplan_auth::Role;
use manuplan_core::UserId;

use crate::session::SessionContext;
use crate::slug::TenantSlug;

/// Row-touching operation, as seen by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAccess {
    Select,
    Insert,
    Update,
    Delete,
}

impl RowAccess {
    pub fn as_str(&self) -> &'static str {
        match self {
            RowAccess::Select => "select",
            RowAccess::Insert => "insert",
            RowAccess::Update => "update",
            RowAccess::Delete => "delete",
        }
    }
}

impl core::fmt::Display for RowAccess {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rejected storage operation.
///
/// Violations are *rejections*, not silent filtering: the caller gets an
/// error and the attempt lands in the audit trail.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IsolationViolation {
    #[error("cross-tenant {access} rejected: session tenant '{session_tenant}' touched row of '{row_tenant}'")]
    CrossTenant {
        session_tenant: TenantSlug,
        row_tenant: TenantSlug,
        access: RowAccess,
    },

    /// Owner sessions act only through owner-scoped operations; tenant
    /// tables are off limits even to them.
    #[error("owner session may not touch tenant-scoped tables")]
    OwnerScopeMisuse,

    /// Owner-scoped operations require the owner tier.
    #[error("owner-scoped operation requires the owner tier")]
    NotOwnerScoped,

    #[error("subject {actor} may not grant itself {role}")]
    SelfEscalation { actor: UserId, role: Role },

    #[error("session role {role} may not mutate role assignments")]
    InsufficientPrivilege { role: Role },

    /// The owner tier is granted only through owner-scoped operations.
    #[error("SYSTEM_OWNER cannot be granted through a tenant session")]
    OwnerGrantViaTenantSession,
}

/// Contract every storage binding must uphold.
///
/// `check_row` guards tenant-scoped tables; `check_owner_operation` guards
/// the explicitly owner-scoped surface; `check_role_mutation` is the
/// trigger-level guarantee that privilege self-escalation fails at the
/// storage layer regardless of any application guard.
pub trait IsolationPolicy {
    fn check_row(
        &self,
        session: &SessionContext,
        row_tenant: &TenantSlug,
        access: RowAccess,
    ) -> Result<(), IsolationViolation>;

    fn check_owner_operation(&self, session: &SessionContext) -> Result<(), IsolationViolation>;

    fn check_role_mutation(
        &self,
        session: &SessionContext,
        target: UserId,
        new_role: Role,
    ) -> Result<(), IsolationViolation>;
}

/// Reference enforcement of the contract.
#[derive(Debug, Default)]
pub struct ReferencePolicy;

impl IsolationPolicy for ReferencePolicy {
    fn check_row(
        &self,
        session: &SessionContext,
        row_tenant: &TenantSlug,
        access: RowAccess,
    ) -> Result<(), IsolationViolation> {
        if session.is_owner_session() {
            return Err(IsolationViolation::OwnerScopeMisuse);
        }
        if session.tenant != *row_tenant {
            return Err(IsolationViolation::CrossTenant {
                session_tenant: session.tenant.clone(),
                row_tenant: row_tenant.clone(),
                access,
            });
        }
        Ok(())
    }

    fn check_owner_operation(&self, session: &SessionContext) -> Result<(), IsolationViolation> {
        if session.is_owner_session() {
            Ok(())
        } else {
            Err(IsolationViolation::NotOwnerScoped)
        }
    }

    fn check_role_mutation(
        &self,
        session: &SessionContext,
        target: UserId,
        new_role: Role,
    ) -> Result<(), IsolationViolation> {
        if new_role == Role::SystemOwner && !session.is_owner_session() {
            return Err(IsolationViolation::OwnerGrantViaTenantSession);
        }
        if !session.role.satisfies(Role::Admin) {
            return Err(IsolationViolation::InsufficientPrivilege { role: session.role });
        }
        // Trigger-level self-escalation stop: holds even when the actor got
        // past every client guard.
        if session.actor == target && !session.role.satisfies(new_role) {
            return Err(IsolationViolation::SelfEscalation {
                actor: session.actor,
                role: new_role,
            });
        }
        Ok(())
    }
}

/// Record a violation in the audit trail (best-effort) and the log.
pub fn report_violation(
    sink: &dyn AuditSink,
    session: &SessionContext,
    violation: &IsolationViolation,
) {
    warn!(
        tenant = session.tenant.as_str(),
        role = session.role.as_str(),
        violation = %violation,
        "tenant isolation violation"
    );
    let record = AuditRecord::new(session.actor, "isolation.violation", violation.to_string())
        .with_tag("security");
    record_best_effort(sink, record);
}
