//! Session context handed to the storage collaborator.

use serde::{Deserialize, Serialize};

use manuplan_auth::Role;
use manuplan_core::UserId;

use crate::slug::TenantSlug;

/// The resolved tenant identity and effective role of one session.
///
/// This is the value row-level policies key on. The transport (header,
/// session claim, RPC parameter) is the store binding's concern; this type
/// only fixes the shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    pub tenant: TenantSlug,
    pub role: Role,
    pub actor: UserId,
}

impl SessionContext {
    pub fn new(tenant: TenantSlug, role: Role, actor: UserId) -> Self {
        Self { tenant, role, actor }
    }

    /// Whether this session acts in the owner tier.
    pub fn is_owner_session(&self) -> bool {
        self.role == Role::SystemOwner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_wire_role_names() {
        let session = SessionContext::new(
            TenantSlug::new("acme").unwrap(),
            Role::MasterTi,
            UserId::new(),
        );
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["tenant"], "acme");
        assert_eq!(json["role"], "MASTER_TI");
    }
}
