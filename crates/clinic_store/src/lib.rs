//! Patient and medical record storage for MoviCare.
//!
//! This crate provides a storage abstraction for users, patients, and
//! medical records. The in-memory implementation backs the server today;
//! the trait leaves room for a database-backed store later.

mod error;
mod memory;
mod traits;

pub use error::*;
pub use memory::*;
pub use traits::*;
