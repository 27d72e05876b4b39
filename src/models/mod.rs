// src/models/mod.rs

//! Domain models for the complaint monitor.
//!
//! This module contains the record types that flow through a poll cycle
//! and the configuration structures that drive it.

mod complaint;
mod config;

// Re-export all public types
pub use complaint::{ComplaintRecord, Snapshot};
pub use config::{Config, MonitorConfig, SourceConfig, StorageConfig};
