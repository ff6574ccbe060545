//! # Core Models Module
//!
//! This module contains the plain data structures that flow through the cpin
//! assembly pipeline.
//!
//! ## Key Components
//!
//! - [`topology`] - Residue labels, first-atom pointers and the radius-set label of a topology
//! - [`states`] - Tabulated protonation states and the per-residue state sets built from them
//! - [`record`] - The assembled `&CNSTPH` namelist contents and its per-residue offset table
//!
//! ## Usage
//!
//! ```ignore
//! use cpinkit::core::models::topology::{Topology, TopologyResidue};
//!
//! let topology = Topology::new(
//!     vec![TopologyResidue::new("ALA", 1), TopologyResidue::new("AS4", 11)],
//!     Some("H(N)-modified Bondi radii (mbondi2)".to_string()),
//! );
//! assert_eq!(topology.residue(2).unwrap().name, "AS4");
//! ```

pub mod record;
pub mod states;
pub mod topology;
