//! `manuplan-tenancy` — tenant resolution and the isolation-policy contract.
//!
//! The slug resolver is purely syntactic over the hostname so it can run
//! before any authentication completes. The policy module states the
//! row-level contract the external store must uphold and provides a
//! reference enforcement used by tests: client-side guards are convenience,
//! these checks are the last line of defense.

pub mod policy;
pub mod session;
pub mod slug;

pub use policy::{IsolationPolicy, IsolationViolation, ReferencePolicy, RowAccess};
pub use session::SessionContext;
pub use slug::{resolve_or_default, tenant_slug, TenantSlug};
