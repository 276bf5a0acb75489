//! Storage backends for short links.
//!
//! Both backends implement [`Repository`]: an in-memory store for tests
//! and single-node setups, and a PostgreSQL store.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;
pub use snip_core::{ReadRepository, Repository, StorageError};
