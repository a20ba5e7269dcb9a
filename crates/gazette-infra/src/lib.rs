//! # Gazette Infrastructure
//!
//! Concrete implementations of the ports defined in `gazette-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM. Without it
//!   only the in-memory repositories are available.

pub mod database;
pub mod memory;

// Re-exports - In-Memory
pub use memory::{InMemoryCategoryRepository, InMemoryPostRepository};

pub use database::DatabaseConfig;

#[cfg(feature = "postgres")]
pub use database::{PostgresCategoryRepository, PostgresPostRepository};
