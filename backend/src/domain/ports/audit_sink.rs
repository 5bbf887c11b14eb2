//! Port for the append-only audit destination.

use async_trait::async_trait;

use crate::domain::AuditRecord;

use super::define_port_error;

define_port_error! {
    /// Errors raised while appending audit records.
    pub enum AuditSinkError {
        /// The destination could not be reached or written.
        Unavailable { message: String } => "audit sink unavailable: {message}",
        /// The record could not be encoded.
        Encoding { message: String } => "audit record encoding failed: {message}",
    }
}

/// Append-only destination receiving one structured record per mutation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Append `record`; existing entries are never rewritten.
    async fn append(&self, record: &AuditRecord) -> Result<(), AuditSinkError>;
}
