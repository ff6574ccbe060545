//! Provides input/output functionality for the file formats around constant-pH setup.
//!
//! This module reads the residue sections of AMBER topology files and reads and
//! writes the `&CNSTPH` namelist consumed by the constant-pH MD engine. Both
//! formats share the [`traits::RecordFile`] interface.

pub mod cpin;
pub mod namelist;
pub mod prmtop;
pub mod traits;
