//! # API Module
//!
//! Screen level operations built on top of [`crate::repo::AppRepo`]. Reads
//! fetch whole tables and filter in memory, the same way the screens did.
//!
//! ## Modules
//!
//! - [`appointment`] - Booking, consultations and agenda views
//! - [`pet`] - Pets, vaccines and patient lists
//! - [`user`] - Client and vet directories

pub mod appointment;
pub mod pet;
pub mod user;
