//! SQL Server source integration
//!
//! This module provides the read side of the pipeline: a tiberius client
//! implementing [`SourceStore`](crate::adapters::database::SourceStore) and
//! the positional row decoder.

pub mod client;
pub mod decode;

pub use client::{parse_connection_string, SqlServerSource};
pub use decode::decode_row;
