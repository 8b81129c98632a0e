//! # Animalia
//!
//! Data access layer of a small veterinary clinic app: clients register
//! their pets and book appointments, vets run their daily agenda and record
//! consultations. Everything lives in one SQLite file on the device.

pub mod api;
pub mod config;
pub mod consts;
pub mod error;
pub mod logger;
pub mod models;
pub mod repo;
pub mod session;
pub mod utils;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use session::Session;
