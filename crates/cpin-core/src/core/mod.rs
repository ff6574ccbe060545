//! # Core Module
//!
//! This module provides the stateless building blocks of cpin assembly: the
//! data models, the file formats, and the reference data for titratable
//! residues.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Topology residues, protonation-state tables, and the assembled namelist record
//! - **File I/O** ([`io`]) - AMBER `prmtop` reading, the `&CNSTPH` namelist codec, and the 80-column line wrapper
//! - **Reference Data** ([`reference`]) - Built-in titratable residues and tabulated state libraries
//!
//! Nothing in this module selects residues or validates a selection; that
//! belongs to the [`crate::engine`] layer.

pub mod io;
pub mod models;
pub mod reference;
