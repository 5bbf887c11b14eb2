//! Builds audit records and hands them to the injected sink.

use std::sync::Arc;

use mockable::Clock;
use tracing::error;

use crate::domain::ports::AuditSink;
use crate::domain::{AuditAction, AuditRecord, ChangeSet, RequestContext, TraceId, User};

/// Audit logger for user management mutations.
///
/// Sink failures are degraded service: they are reported on the error log
/// and never returned to the caller, so the parent mutation still succeeds.
#[derive(Clone)]
pub struct AuditLogger {
    sink: Arc<dyn AuditSink>,
    clock: Arc<dyn Clock>,
}

impl AuditLogger {
    /// Create a logger writing to `sink` and stamping records with `clock`.
    pub fn new(sink: Arc<dyn AuditSink>, clock: Arc<dyn Clock>) -> Self {
        Self { sink, clock }
    }

    /// Append one record describing `action` by `actor` on `target`.
    pub async fn log_user_management(
        &self,
        action: AuditAction,
        actor: &User,
        target: Option<&User>,
        context: &RequestContext,
        changes: ChangeSet,
    ) {
        let record = AuditRecord {
            action,
            actor_id: actor.id,
            actor_email: actor.email.clone(),
            target_id: target.map(|user| user.id),
            target_email: target.map(|user| user.email.clone()),
            target_role: target.map(|user| user.role),
            changes,
            ip_address: context.ip_address.clone(),
            user_agent: context.user_agent.clone(),
            occurred_at: self.clock.utc(),
        };

        if let Err(err) = self.sink.append(&record).await {
            error!(
                error = %err,
                action = %record.action,
                actor_id = %record.actor_id,
                target_id = ?record.target_id.map(|id| id.to_string()),
                trace_id = ?TraceId::current().map(|id| id.to_string()),
                "audit sink write failed"
            );
        }
    }
}
