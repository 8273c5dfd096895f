//! Immutable access-context snapshots.
//!
//! A new [`AccessContext`] is computed on every navigation or auth-state
//! change; nothing here is mutated in place. Snapshots carry a monotonic
//! version so that a superseded in-flight fetch is discarded when its result
//! arrives after a newer context has already been computed (last-write-wins
//! by version, not by arrival order).

use serde::{Deserialize, Serialize};

use manuplan_core::Email;

use crate::role::RoleAssignment;

/// What the identity collaborator reports for the current session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSnapshot {
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub email: Option<Email>,
    pub assignments: Vec<RoleAssignment>,
}

impl AuthSnapshot {
    /// Snapshot while identity/role data is still being fetched.
    pub fn loading() -> Self {
        Self {
            is_authenticated: false,
            is_loading: true,
            email: None,
            assignments: Vec::new(),
        }
    }

    /// Snapshot for an unauthenticated session.
    ///
    /// Also the mandatory fallback for a failed role/identity fetch: a
    /// transient store failure resolves to this, and therefore to denial,
    /// never to allowed-by-default.
    pub fn unauthenticated() -> Self {
        Self {
            is_authenticated: false,
            is_loading: false,
            email: None,
            assignments: Vec::new(),
        }
    }

    pub fn authenticated(email: Option<Email>, assignments: Vec<RoleAssignment>) -> Self {
        Self {
            is_authenticated: true,
            is_loading: false,
            email,
            assignments,
        }
    }
}

/// Monotonic version of an access context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ContextVersion(u64);

impl ContextVersion {
    /// Whether a fetch result tagged with this version is stale relative to
    /// the context currently in force and must be discarded.
    pub fn is_stale_against(&self, current: ContextVersion) -> bool {
        *self < current
    }
}

/// Issues strictly increasing context versions.
///
/// Decisions are recomputed synchronously on re-render triggers in a single
/// cooperative event loop, so a plain counter suffices; there is no
/// background authorization thread.
#[derive(Debug, Default)]
pub struct ContextCounter(u64);

impl ContextCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self) -> ContextVersion {
        self.0 += 1;
        ContextVersion(self.0)
    }
}

/// Immutable snapshot consumed per authorization decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessContext {
    snapshot: AuthSnapshot,
    hostname: String,
    version: ContextVersion,
}

impl AccessContext {
    pub fn new(snapshot: AuthSnapshot, hostname: impl Into<String>, version: ContextVersion) -> Self {
        Self {
            snapshot,
            hostname: hostname.into(),
            version,
        }
    }

    pub fn snapshot(&self) -> &AuthSnapshot {
        &self.snapshot
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn version(&self) -> ContextVersion {
        self.version
    }

    pub fn is_loading(&self) -> bool {
        self.snapshot.is_loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot.is_authenticated
    }

    pub fn email(&self) -> Option<&Email> {
        self.snapshot.email.as_ref()
    }

    pub fn assignments(&self) -> &[RoleAssignment] {
        &self.snapshot.assignments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_strictly_increasing() {
        let mut counter = ContextCounter::new();
        let a = counter.next();
        let b = counter.next();
        let c = counter.next();
        assert!(a < b && b < c);
    }

    #[test]
    fn stale_fetch_results_are_detected_by_version_not_arrival_order() {
        let mut counter = ContextCounter::new();
        let older = counter.next();
        let current = counter.next();

        // The older request's response arrives last; it must be discarded.
        assert!(older.is_stale_against(current));
        assert!(!current.is_stale_against(current));
        assert!(!current.is_stale_against(older));
    }

    #[test]
    fn failed_fetch_fallback_is_unauthenticated_and_not_loading() {
        let snapshot = AuthSnapshot::unauthenticated();
        assert!(!snapshot.is_authenticated);
        assert!(!snapshot.is_loading);
        assert!(snapshot.assignments.is_empty());
    }
}
