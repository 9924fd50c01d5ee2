//! # Late Show Common Library
//!
//! Shared code for the Late Show API:
//! - Entity store (guests, episodes, appearances) on SQLite
//! - Field validation
//! - Response views with cycle truncation
//! - Configuration loading

pub mod config;
pub mod db;
pub mod error;
pub mod validation;
pub mod views;

pub use error::{Error, Result};
pub use validation::Rating;
