//! Core domain entities.
//!
//! Entities follow the "New Type" pattern with separate structs for writes:
//! - [`NewUser`] - For creating records
//! - [`UpdateUser`] - For replacing mutable fields

pub mod user;

pub use user::{NewUser, UpdateUser, User};
