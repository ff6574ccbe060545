//! # Engine Module
//!
//! This module turns a topology and a set of selection criteria into the
//! validated pieces of a cpin record.
//!
//! ## Architecture
//!
//! The stages run in a fixed order, each consuming the previous one's output:
//!
//! - **Configuration** ([`config`]) - Selection filters, the pKa window and the builder for [`config::CpinConfig`]
//! - **Residue Selection** ([`selection`]) - Chooses which residues are titrated and fixes the block order of residue names
//! - **Reference Resolution** ([`resolver`]) - Looks up the protonation states of every distinct selected name
//! - **Offset Calculation** ([`offsets`]) - Builds the per-residue `STATEINF` indices and checks the initial states
//! - **Error Handling** ([`error`]) - The [`error::EngineError`] taxonomy shared by all stages

pub mod config;
pub mod error;
pub mod offsets;
pub mod resolver;
pub mod selection;
