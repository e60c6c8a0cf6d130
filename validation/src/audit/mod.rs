//! Audit trail stores.

pub mod memory;
pub mod postgres;

pub use memory::MemoryAuditLog;
pub use postgres::PostgresAuditLog;
