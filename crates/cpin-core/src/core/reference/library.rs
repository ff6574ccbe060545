use crate::core::models::states::{ReferenceStateSet, StateRecord, StateSetError};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Raw layout of a reference data file: residue name -> `igb<N>` -> states.
type RawReferenceFile = HashMap<String, HashMap<String, Vec<StateRecord>>>;

/// Source of tabulated protonation-state data.
///
/// The discretization parameter (`igb`) selects which generalized Born
/// parameterization the reference energies belong to.
pub trait ReferenceTable {
    fn lookup(&self, residue_name: &str, igb: u8) -> Option<&ReferenceStateSet>;
}

/// Reference states for every residue type and `igb` value known to a data file.
#[derive(Debug, Clone, Default)]
pub struct ReferenceLibrary {
    entries: HashMap<(String, u8), ReferenceStateSet>,
}

#[derive(Debug, Error)]
pub enum ReferenceLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid parameter key '{key}' for residue '{residue}' (expected 'igb<N>')")]
    InvalidParameterKey { residue: String, key: String },
    #[error("Invalid state table for residue '{residue}' (igb={igb}): {source}")]
    InvalidStateSet {
        residue: String,
        igb: u8,
        source: StateSetError,
    },
}

impl ReferenceLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, ReferenceLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ReferenceLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::from_toml_str(&content, &path.to_string_lossy())
    }

    /// Parses reference data from TOML text; `origin` only labels errors.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ReferenceLoadError> {
        let raw: RawReferenceFile =
            toml::from_str(content).map_err(|e| ReferenceLoadError::Toml {
                path: origin.to_string(),
                source: e,
            })?;

        let mut library = Self::new();
        for (residue, tables) in raw {
            for (key, states) in tables {
                let igb = parse_parameter_key(&key).ok_or_else(|| {
                    ReferenceLoadError::InvalidParameterKey {
                        residue: residue.clone(),
                        key: key.clone(),
                    }
                })?;
                let set = ReferenceStateSet::new(states).map_err(|source| {
                    ReferenceLoadError::InvalidStateSet {
                        residue: residue.clone(),
                        igb,
                        source,
                    }
                })?;
                library.insert(&residue, igb, set);
            }
        }
        Ok(library)
    }

    pub fn insert(&mut self, residue_name: &str, igb: u8, states: ReferenceStateSet) {
        self.entries
            .insert((residue_name.trim().to_string(), igb), states);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ReferenceTable for ReferenceLibrary {
    fn lookup(&self, residue_name: &str, igb: u8) -> Option<&ReferenceStateSet> {
        self.entries.get(&(residue_name.trim().to_string(), igb))
    }
}

fn parse_parameter_key(key: &str) -> Option<u8> {
    key.strip_prefix("igb")?.parse().ok()
}
