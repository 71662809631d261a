//! Client data access layer for the MoviCare API.
//!
//! Mirrors the server's REST surface: one async method per route, an
//! explicit [`Session`] carried by the client (no ambient credential
//! lookups), and error messages extracted from the server's `{ message }`
//! bodies.

mod client;
mod error;
mod session;
mod types;

pub use client::*;
pub use error::*;
pub use session::*;
pub use types::*;
