// src/lib.rs

//! Complaint Monitor Library
//!
//! Watches a public complaint status page and reports complaints that were
//! not present in the last persisted snapshot.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
