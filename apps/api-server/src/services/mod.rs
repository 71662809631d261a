//! Server-side services.

pub mod seed;
