//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`cache`] - Cache backends (Redis, in-memory, no-op)
//! - [`persistence`] - PostgreSQL repository implementation and pool setup

pub mod cache;
pub mod persistence;
