//! Audit logging for task mutations.
//!
//! Every successful mutation appends one entry to the audit log. Audit
//! writes are best-effort: a failed write is logged to the diagnostic
//! channel and swallowed, it never surfaces to the caller.

use log::warn;

use crate::backend::{AuditAction, AuditEntry, Task};
use crate::sync::TaskService;

/// Classify a successful update for the audit log.
///
/// "status_changed" is recorded instead of "updated" only when the status
/// field is the sole attribute that differs between the before and after
/// snapshots. Without a before snapshot the update cannot be classified more
/// precisely than "updated".
pub(crate) fn classify_update(previous: Option<&Task>, updated: &Task) -> AuditAction {
    match previous {
        Some(before) if only_status_differs(before, updated) => AuditAction::StatusChanged,
        _ => AuditAction::Updated,
    }
}

fn only_status_differs(before: &Task, after: &Task) -> bool {
    if before.status == after.status {
        return false;
    }
    let mut normalized = after.clone();
    normalized.status = before.status;
    normalized == *before
}

impl TaskService {
    /// Append an audit entry, swallowing any failure.
    pub(crate) async fn record_audit(&self, entry: AuditEntry) {
        if !self.audit_enabled() {
            return;
        }
        if let Err(e) = self.backend().insert_audit_entry(entry).await {
            warn!("audit log write failed: {e}");
        }
    }
}
