//! # cpinkit
//!
//! A library for preparing the constant-pH input (`cpin`) of AMBER molecular
//! dynamics runs: it picks the titratable residues of a topology, pairs them
//! with tabulated protonation states and writes the `&CNSTPH` namelist.
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three-layer split throughout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Topology`,
//!   `ReferenceStateSet`, `CpinRecord`), the built-in titratable residue table,
//!   the reference library and the file formats (`prmtop`, `cpin`).
//!
//! - **[`engine`]: The Logic Core.** Residue selection, reference resolution
//!   and offset calculation, each a pure function of its inputs that reports
//!   problems through [`engine::error::EngineError`].
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into
//!   a single call that produces a validated record.

pub mod core;
pub mod engine;
pub mod workflows;
