//! Shared types and configuration for Outlay.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Line item amounts with fixed two-place precision
//! - Configuration management

pub mod config;
pub mod types;

pub use config::{AppConfig, ClosePolicy, LogConfig, WorkflowConfig};
