//! Olympic Medal Studio
//!
//! Aggregation, ranking, and comparative analysis pipelines for historical
//! Olympic Games data.
//!
//! This crate provides the core implementation for the
//! `medal-studio` CLI tool.
//!
//! ## Getting Started
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! cargo install olympic-medal-studio
//! medal-studio --help
//! ```

pub mod commands;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod utils;
