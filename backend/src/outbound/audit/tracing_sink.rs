//! Audit sink emitting records as structured log events.

use async_trait::async_trait;
use tracing::info;

use crate::domain::AuditRecord;
use crate::domain::ports::{AuditSink, AuditSinkError};

/// Tracing target carrying audit events.
pub const AUDIT_TARGET: &str = "audit";

/// Writes each record to the `audit` tracing target as one JSON field.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn append(&self, record: &AuditRecord) -> Result<(), AuditSinkError> {
        let encoded = serde_json::to_string(record)
            .map_err(|err| AuditSinkError::encoding(err.to_string()))?;
        info!(
            target: AUDIT_TARGET,
            action = record.action.as_str(),
            record = %encoded,
            "audit.user_management"
        );
        Ok(())
    }
}
