//! Data models shared across the pipeline.

pub mod billing;
pub mod config;
pub mod contract;
pub mod fees;
