//! PostgreSQL database integration
//!
//! This module provides the write side of the pipeline: a deadpool-managed
//! connection and a [`TargetStore`](crate::adapters::database::TargetStore)
//! that runs the schema DDL and the load transaction on it.

pub mod adapter;
pub mod client;

pub use adapter::PostgreSQLTarget;
pub use client::PostgreSQLClient;
