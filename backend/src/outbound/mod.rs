//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories and the owner-index
//!   ledger using Diesel ORM
//! - **memory**: a process-local store implementing the same ports, used
//!   when no database is configured and throughout the tests
//! - **password**: Argon2id password verifiers
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
pub mod password;
pub mod persistence;

pub use memory::InMemoryStore;
pub use password::Argon2PasswordHasher;
