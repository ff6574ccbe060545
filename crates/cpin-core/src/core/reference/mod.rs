//! # Reference Data Module
//!
//! Tabulated protonation-state data for titratable residues.
//!
//! ## Key Components
//!
//! - [`titratable`] - The built-in set of titratable residue names and their reference pKa values
//! - [`library`] - The [`library::ReferenceTable`] lookup trait and a TOML-backed implementation
//!
//! ## Data File Layout
//!
//! Each residue name holds one array of states per `igb` value:
//!
//! ```toml
//! [[AS4.igb5]]
//! energy = 0.0
//! protons = 0
//! charges = [-0.4157, 0.2719, 0.0341]
//! ```

pub mod library;
pub mod titratable;
