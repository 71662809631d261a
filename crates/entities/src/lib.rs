//! Core entity definitions for MoviCare.
//!
//! This crate defines the data types shared across the MoviCare clinic
//! application: users, patients, and medical records.

mod patient;
mod record;
mod user;

pub use patient::*;
pub use record::*;
pub use user::*;
