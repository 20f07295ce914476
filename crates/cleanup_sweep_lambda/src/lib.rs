//! AWS-oriented adapters and the sweep orchestrator for the test-resource
//! cleanup Lambda.
//!
//! This crate owns runtime integration details (resource sweepers backed by
//! the AWS SDK, structured run logging, and the Lambda handler) on top of
//! the pure decision logic in `cleanup_sweep_core`.

pub mod adapters;
pub mod aws;
pub mod handlers;
