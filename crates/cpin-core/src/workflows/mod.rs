//! # Workflows Module
//!
//! High-level entry points that run the whole cpin pipeline.
//!
//! - **Generation Workflow** ([`generate`]) - Checks the topology, selects and
//!   resolves the titratable residues, computes offsets and assembles a
//!   [`crate::core::models::record::CpinRecord`] ready to be encoded.

pub mod generate;
