//! `manuplan-audit` — privileged-action audit trail.
//!
//! Writing an audit record is best-effort by contract: a failed write is
//! surfaced as a non-fatal warning and must never block or roll back the
//! action being audited.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use manuplan_core::UserId;

/// One privileged-action record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub actor: UserId,
    pub action: String,
    pub description: String,
    pub tag: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(
        actor: UserId,
        action: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            actor,
            action: action.into(),
            description: description.into(),
            tag: None,
            occurred_at: Utc::now(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),
}

/// Destination for audit records.
pub trait AuditSink {
    fn record(&self, record: &AuditRecord) -> Result<(), AuditError>;
}

/// Emits audit records as structured log events.
#[derive(Debug, Default)]
pub struct TracingSink;

impl AuditSink for TracingSink {
    fn record(&self, record: &AuditRecord) -> Result<(), AuditError> {
        info!(
            actor = %record.actor,
            action = record.action.as_str(),
            description = record.description.as_str(),
            tag = record.tag.as_deref(),
            "audit"
        );
        Ok(())
    }
}

/// In-memory sink for tests and local tooling.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().expect("audit sink poisoned").clone()
    }
}

impl AuditSink for MemorySink {
    fn record(&self, record: &AuditRecord) -> Result<(), AuditError> {
        self.records
            .lock()
            .map_err(|_| AuditError::Unavailable("memory sink poisoned".to_string()))?
            .push(record.clone());
        Ok(())
    }
}

/// Write a record, recovering locally from sink failure.
///
/// Returns whether the record was persisted; the caller proceeds either way.
pub fn record_best_effort(sink: &dyn AuditSink, record: AuditRecord) -> bool {
    match sink.record(&record) {
        Ok(()) => true,
        Err(e) => {
            warn!(
                action = record.action.as_str(),
                error = %e,
                "audit write failed; continuing without record"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSink;

    impl AuditSink for FailingSink {
        fn record(&self, _record: &AuditRecord) -> Result<(), AuditError> {
            Err(AuditError::Unavailable("down for maintenance".to_string()))
        }
    }

    #[test]
    fn memory_sink_stores_records() {
        let sink = MemorySink::new();
        let record = AuditRecord::new(UserId::new(), "role.assign", "granted ADMIN")
            .with_tag("security");

        assert!(record_best_effort(&sink, record.clone()));

        let stored = sink.records();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].action, "role.assign");
        assert_eq!(stored[0].tag.as_deref(), Some("security"));
    }

    #[test]
    fn sink_failure_is_recovered_not_propagated() {
        let record = AuditRecord::new(UserId::new(), "tenant.create", "created tenant acme");
        // Must not panic or propagate; the action proceeds without a record.
        assert!(!record_best_effort(&FailingSink, record));
    }
}
