//! Guard state machine.
//!
//! One state machine serves every protected surface; the per-surface
//! variation lives entirely in a [`SurfacePolicy`] predicate. This replaces
//! a family of near-duplicate per-flag guards with a single evaluation path
//! so the loading/denial/idempotence rules are enforced in one place.

use crate::config::OwnerDomainConfig;
use crate::context::{AccessContext, ContextVersion};

/// Where a denied session is sent.
///
/// Denial is always a redirect to a safe, generic destination: never an
/// error page, and never one that reveals whether the guarded resource
/// exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectTarget {
    /// Unauthenticated or owner-surface denial.
    Login,
    /// Authenticated but lacking the required tenant-tier role.
    Dashboard,
    /// Canonical root of the owner domain.
    OwnerRoot,
    /// Canonical root of a tenant domain.
    TenantRoot,
}

impl RedirectTarget {
    pub fn path(&self) -> &'static str {
        match self {
            RedirectTarget::Login => "/login",
            RedirectTarget::Dashboard => "/dashboard",
            RedirectTarget::OwnerRoot => "/owner",
            RedirectTarget::TenantRoot => "/",
        }
    }
}

/// Verdict of a surface predicate, evaluated once loading has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allowed,
    Denied(RedirectTarget),
}

/// Guard state. `Loading` is initial; `Allowed`/`Denied` are terminal for a
/// given context and stable under re-evaluation with an unchanged context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Allowed,
    Denied { redirect: RedirectTarget },
}

/// What the rendering/navigation collaborator should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    RenderChildren,
    RenderPlaceholder,
    Redirect(&'static str),
}

impl GuardState {
    pub fn outcome(&self) -> GuardOutcome {
        match self {
            GuardState::Loading => GuardOutcome::RenderPlaceholder,
            GuardState::Allowed => GuardOutcome::RenderChildren,
            GuardState::Denied { redirect } => GuardOutcome::Redirect(redirect.path()),
        }
    }
}

/// Per-surface authorization predicate.
///
/// Implementations must be pure over `(config, ctx)`; side effects are
/// restricted to [`SurfacePolicy::on_denied`], which the state machine
/// invokes exactly once per denied context version (never once per render).
pub trait SurfacePolicy {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Decide the verdict for a fully loaded context.
    fn decide(&self, config: &OwnerDomainConfig, ctx: &AccessContext) -> Verdict;

    /// Hook fired once per denied navigation.
    fn on_denied(&self, _ctx: &AccessContext) {}
}

/// A guard instance protecting one surface.
#[derive(Debug)]
pub struct Guard<P> {
    policy: P,
    state: GuardState,
    evaluated_at: Option<ContextVersion>,
}

impl<P: SurfacePolicy> Guard<P> {
    pub fn new(policy: P) -> Self {
        Self {
            policy,
            state: GuardState::Loading,
            evaluated_at: None,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Evaluate the guard against the current context.
    ///
    /// While the context is loading the guard stays in `Loading` and renders
    /// a neutral placeholder: no redirect, no protected content, no flash of
    /// privileged content. Re-evaluating with an already-seen context
    /// version returns the cached state without re-running the predicate,
    /// which keeps the denial diagnostic at one per navigation.
    ///
    /// A context older than the last one evaluated is a stale in-flight
    /// result and is ignored outright (last-write-wins by version).
    pub fn evaluate(&mut self, config: &OwnerDomainConfig, ctx: &AccessContext) -> GuardState {
        if let Some(seen) = self.evaluated_at {
            if ctx.version().is_stale_against(seen) {
                return self.state;
            }
            if ctx.version() == seen {
                return self.state;
            }
        }

        self.evaluated_at = Some(ctx.version());

        if ctx.is_loading() {
            self.state = GuardState::Loading;
            return self.state;
        }

        self.state = match self.policy.decide(config, ctx) {
            Verdict::Allowed => GuardState::Allowed,
            Verdict::Denied(redirect) => {
                self.policy.on_denied(ctx);
                GuardState::Denied { redirect }
            }
        };
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AuthSnapshot, ContextCounter};
    use std::cell::Cell;

    fn config() -> OwnerDomainConfig {
        OwnerDomainConfig::new("owner.sistema.com", Vec::new(), "sistema.com").unwrap()
    }

    /// Denies everything and counts how often the denial hook fires.
    struct CountingDeny<'a> {
        denials: &'a Cell<u32>,
    }

    impl SurfacePolicy for CountingDeny<'_> {
        fn name(&self) -> &'static str {
            "counting-deny"
        }

        fn decide(&self, _config: &OwnerDomainConfig, _ctx: &AccessContext) -> Verdict {
            Verdict::Denied(RedirectTarget::Login)
        }

        fn on_denied(&self, _ctx: &AccessContext) {
            self.denials.set(self.denials.get() + 1);
        }
    }

    struct AllowAll;

    impl SurfacePolicy for AllowAll {
        fn name(&self) -> &'static str {
            "allow-all"
        }

        fn decide(&self, _config: &OwnerDomainConfig, _ctx: &AccessContext) -> Verdict {
            Verdict::Allowed
        }
    }

    #[test]
    fn loading_context_renders_placeholder_and_nothing_else() {
        let config = config();
        let mut counter = ContextCounter::new();
        let ctx = AccessContext::new(AuthSnapshot::loading(), "acme.sistema.com", counter.next());

        let mut guard = Guard::new(AllowAll);
        let state = guard.evaluate(&config, &ctx);

        assert_eq!(state, GuardState::Loading);
        assert_eq!(state.outcome(), GuardOutcome::RenderPlaceholder);
    }

    #[test]
    fn loaded_context_reaches_exactly_one_terminal_state_and_is_stable() {
        let config = config();
        let mut counter = ContextCounter::new();
        let ctx = AccessContext::new(
            AuthSnapshot::authenticated(None, Vec::new()),
            "acme.sistema.com",
            counter.next(),
        );

        let mut guard = Guard::new(AllowAll);
        let first = guard.evaluate(&config, &ctx);
        let second = guard.evaluate(&config, &ctx);

        assert_eq!(first, GuardState::Allowed);
        assert_eq!(second, first);
    }

    #[test]
    fn denial_hook_fires_once_per_navigation_not_once_per_render() {
        let config = config();
        let denials = Cell::new(0);
        let mut guard = Guard::new(CountingDeny { denials: &denials });

        let mut counter = ContextCounter::new();
        let ctx = AccessContext::new(
            AuthSnapshot::unauthenticated(),
            "acme.sistema.com",
            counter.next(),
        );

        // Several re-renders of the same navigation.
        for _ in 0..5 {
            guard.evaluate(&config, &ctx);
        }
        assert_eq!(denials.get(), 1);

        // A new navigation (new context version) fires the hook again.
        let next = AccessContext::new(
            AuthSnapshot::unauthenticated(),
            "acme.sistema.com",
            counter.next(),
        );
        guard.evaluate(&config, &next);
        assert_eq!(denials.get(), 2);
    }

    #[test]
    fn stale_context_is_ignored() {
        let config = config();
        let mut counter = ContextCounter::new();
        let older = AccessContext::new(
            AuthSnapshot::authenticated(None, Vec::new()),
            "acme.sistema.com",
            counter.next(),
        );
        let newer = AccessContext::new(
            AuthSnapshot::unauthenticated(),
            "acme.sistema.com",
            counter.next(),
        );

        let denials = Cell::new(0);
        let mut guard = Guard::new(CountingDeny { denials: &denials });

        let state = guard.evaluate(&config, &newer);
        assert_eq!(state, GuardState::Denied { redirect: RedirectTarget::Login });

        // The older context's result arrives late; the guard must not move.
        let state = guard.evaluate(&config, &older);
        assert_eq!(state, GuardState::Denied { redirect: RedirectTarget::Login });
        assert_eq!(denials.get(), 1);
    }

    #[test]
    fn fetch_failure_fallback_resolves_to_denied_never_allowed() {
        let config = config();
        let mut counter = ContextCounter::new();
        // Failed role fetch: collaborator reports unauthenticated, not loading.
        let ctx = AccessContext::new(
            AuthSnapshot::unauthenticated(),
            "acme.sistema.com",
            counter.next(),
        );

        let denials = Cell::new(0);
        let mut guard = Guard::new(CountingDeny { denials: &denials });
        let state = guard.evaluate(&config, &ctx);
        assert!(matches!(state, GuardState::Denied { .. }));
    }
}
