use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::prmtop::PrmtopError;
use crate::core::reference::library::ReferenceLoadError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to read topology: {0}")]
    Topology(#[from] PrmtopError),

    #[error("Failed to load reference data: {0}")]
    Reference(#[from] ReferenceLoadError),

    #[error("Residue {number} is out of range (topology has {residue_count} residues)")]
    ResidueOutOfRange { number: usize, residue_count: usize },

    #[error("Residue {number} is listed more than once; each residue number may be given only once")]
    DuplicateResidue { number: usize },

    #[error("Residue {number} is a {name}. This is not in the list of titratable residues")]
    NotTitratable { number: usize, name: String },

    #[error("No titratable residues conform to the selection criteria")]
    NoResiduesSelected,

    #[error("No reference data for residue {name} with igb={igb}")]
    MissingReference { name: String, igb: u8 },

    #[error("{given} initial states were specified for {selected} titrated residues")]
    StateCountMismatch { given: usize, selected: usize },

    #[error(
        "Initial state {state} of residue {name} {number} is out of range ({name} has {num_states} states, numbered from 0)"
    )]
    StateOutOfRange {
        number: usize,
        name: String,
        state: usize,
        num_states: usize,
    },

    #[error(
        "Topology radius set is {found:?} but reference energies require '{expected}' (use ignore-warnings to continue)"
    )]
    RadiusSetMismatch {
        found: Option<String>,
        expected: &'static str,
    },
}
