//! Core library: video registry, processing coordinator and review operations.

pub mod classifier;
pub mod config;
pub mod coordinator;
pub mod disposal;
pub mod intake;
pub mod models;
pub mod pipeline;
pub mod query;
pub mod registry;
pub mod review;
