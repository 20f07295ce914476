//! Shared cleanup sweep domain primitives.
//!
//! This crate owns the expiry decision policy, run configuration, and the
//! sweep report contract. It intentionally excludes AWS SDK and Lambda
//! runtime concerns.

pub mod config;
pub mod notify;
pub mod policy;
pub mod report;
pub mod tags;
