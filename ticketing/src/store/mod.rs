//! Ticketing store implementations.

pub mod memory;
pub mod postgres;

pub use memory::MemoryTicketingStore;
pub use postgres::PostgresTicketingStore;
