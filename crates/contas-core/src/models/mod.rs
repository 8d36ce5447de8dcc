//! Data models.

pub mod bill;
pub mod config;
