//! Directory client implementations.

pub mod http;
pub mod memory;

pub use http::{HttpIdentityDirectory, HttpTicketingDirectory};
pub use memory::{MemoryIdentityDirectory, MemoryTicketingDirectory};
