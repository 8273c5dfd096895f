//! Surface policies: the per-surface predicates behind the guard machine.

use tracing::warn;

use crate::config::OwnerDomainConfig;
use crate::context::AccessContext;
use crate::domain::is_owner_domain;
use crate::effective::effective_role;
use crate::guard::{RedirectTarget, SurfacePolicy, Verdict};
use crate::role::Role;

fn context_role(config: &OwnerDomainConfig, ctx: &AccessContext) -> Role {
    effective_role(config, ctx.assignments(), ctx.email(), ctx.hostname())
}

/// Guards a surface that requires a minimum tenant-tier role.
///
/// Unauthenticated sessions go to the login page; authenticated sessions
/// lacking the role go to the default landing page.
#[derive(Debug, Clone, Copy)]
pub struct RoleFlagSurface {
    pub required: Role,
}

impl RoleFlagSurface {
    pub fn new(required: Role) -> Self {
        Self { required }
    }
}

impl SurfacePolicy for RoleFlagSurface {
    fn name(&self) -> &'static str {
        "role-flag"
    }

    fn decide(&self, config: &OwnerDomainConfig, ctx: &AccessContext) -> Verdict {
        if !ctx.is_authenticated() {
            return Verdict::Denied(RedirectTarget::Login);
        }
        if context_role(config, ctx).satisfies(self.required) {
            Verdict::Allowed
        } else {
            Verdict::Denied(RedirectTarget::Dashboard)
        }
    }
}

/// Guards the distinguished owner administrative surface.
///
/// Allowed only when the request comes from the owner domain *and* the
/// effective role is `SystemOwner`. Every denial goes to the login page,
/// without distinguishing "not authorized" from "not found".
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnerSurface;

impl SurfacePolicy for OwnerSurface {
    fn name(&self) -> &'static str {
        "owner-surface"
    }

    fn decide(&self, config: &OwnerDomainConfig, ctx: &AccessContext) -> Verdict {
        let on_owner_domain = is_owner_domain(config, ctx.hostname());
        if on_owner_domain && context_role(config, ctx) == Role::SystemOwner {
            Verdict::Allowed
        } else {
            Verdict::Denied(RedirectTarget::Login)
        }
    }
}

/// Domain class of a hostname or route prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainClass {
    Owner,
    Tenant,
}

impl DomainClass {
    pub fn of_hostname(config: &OwnerDomainConfig, hostname: &str) -> Self {
        if is_owner_domain(config, hostname) {
            DomainClass::Owner
        } else {
            DomainClass::Tenant
        }
    }

    /// Classify a route by its prefix: `/owner` and everything under it
    /// belongs to the owner domain, all other routes to tenant domains.
    pub fn of_route(path: &str) -> Self {
        if path == "/owner" || path.starts_with("/owner/") {
            DomainClass::Owner
        } else {
            DomainClass::Tenant
        }
    }

    pub fn canonical_root(&self) -> RedirectTarget {
        match self {
            DomainClass::Owner => RedirectTarget::OwnerRoot,
            DomainClass::Tenant => RedirectTarget::TenantRoot,
        }
    }
}

/// Routes each navigation to the domain class it belongs to.
///
/// Owner routes are reachable only from the owner domain and tenant routes
/// only from tenant domains; a cross-domain navigation is redirected to the
/// current domain's canonical root. This is the only surface permitted to
/// log a security-relevant event on denial; the guard machine guarantees it
/// fires once per offending navigation.
#[derive(Debug, Clone)]
pub struct DomainRouterSurface {
    route: String,
}

impl DomainRouterSurface {
    pub fn new(route: impl Into<String>) -> Self {
        Self { route: route.into() }
    }

    pub fn route(&self) -> &str {
        &self.route
    }
}

impl SurfacePolicy for DomainRouterSurface {
    fn name(&self) -> &'static str {
        "domain-router"
    }

    fn decide(&self, config: &OwnerDomainConfig, ctx: &AccessContext) -> Verdict {
        let host_class = DomainClass::of_hostname(config, ctx.hostname());
        let route_class = DomainClass::of_route(&self.route);

        if host_class == route_class {
            Verdict::Allowed
        } else {
            Verdict::Denied(host_class.canonical_root())
        }
    }

    fn on_denied(&self, ctx: &AccessContext) {
        warn!(
            hostname = ctx.hostname(),
            route = self.route.as_str(),
            "denied cross-domain navigation"
        );
    }
}
