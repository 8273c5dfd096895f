//! `manuplan-auth` — pure authorization boundary for the maintenance planner.
//!
//! This crate is intentionally decoupled from HTTP, storage and rendering: it
//! turns raw signals (role assignments, authenticated email, current
//! hostname) into one authoritative effective role and guard verdicts. Every
//! ambiguous or missing input resolves to denial, never to access.

pub mod config;
pub mod context;
pub mod domain;
pub mod effective;
pub mod guard;
pub mod role;
pub mod surfaces;

pub use config::OwnerDomainConfig;
pub use context::{AccessContext, AuthSnapshot, ContextCounter, ContextVersion};
pub use domain::{is_owner_domain, is_system_owner_email};
pub use effective::effective_role;
pub use guard::{Guard, GuardOutcome, GuardState, RedirectTarget, SurfacePolicy, Verdict};
pub use role::{highest_role, Role, RoleAssignment};
pub use surfaces::{DomainClass, DomainRouterSurface, OwnerSurface, RoleFlagSurface};
