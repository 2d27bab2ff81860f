//! Domain layer containing the user entity and the storage contract.
//!
//! - [`entities`] - Data structures
//! - [`repositories`] - Data access trait definitions
//!
//! The domain layer has no dependencies on the infrastructure layer; the
//! repository trait is implemented there.

pub mod entities;
pub mod repositories;
