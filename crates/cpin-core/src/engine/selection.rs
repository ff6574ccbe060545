use super::config::{NameFilter, NumberFilter, SelectionCriteria};
use super::error::EngineError;
use crate::core::models::topology::Topology;
use crate::core::reference::titratable;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedResidue {
    pub number: usize,
    pub name: String,
}

/// The residues chosen for titration.
///
/// `residues` is in selection order. `names` lists each distinct residue name
/// once, in order of first occurrence; it fixes the block order of the
/// flattened charge and state arrays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidueSelection {
    residues: Vec<SelectedResidue>,
    names: Vec<String>,
}

impl ResidueSelection {
    fn new(residues: Vec<SelectedResidue>) -> Self {
        let mut names: Vec<String> = Vec::new();
        for residue in &residues {
            if !names.contains(&residue.name) {
                names.push(residue.name.clone());
            }
        }
        Self { residues, names }
    }

    pub fn residues(&self) -> &[SelectedResidue] {
        &self.residues
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn numbers(&self) -> impl Iterator<Item = usize> + '_ {
        self.residues.iter().map(|r| r.number)
    }
}

/// Resolves the residue names eligible for titration under `criteria`.
///
/// The pKa range narrows the built-in set only; an explicit include list
/// replaces it entirely.
pub fn active_names(criteria: &SelectionCriteria) -> Vec<String> {
    let built_in = || {
        titratable::titratable_residues()
            .filter(|(_, pka)| criteria.pka_range.contains(*pka))
            .map(|(name, _)| name.to_string())
    };

    match &criteria.names {
        NameFilter::Default => built_in().collect(),
        NameFilter::Include(names) => {
            let mut active: Vec<String> = Vec::with_capacity(names.len());
            for name in names.iter().map(|n| n.trim().to_string()) {
                if !active.contains(&name) {
                    active.push(name);
                }
            }
            active
        }
        NameFilter::Exclude(excluded) => built_in()
            .filter(|name| !excluded.iter().any(|e| e.trim() == name.as_str()))
            .collect(),
    }
}

/// Applies `criteria` to the residues of `topology`.
///
/// # Errors
///
/// Fails when an explicitly requested residue number is out of range, listed
/// twice, or names a residue that is not titratable, and when nothing is
/// left to titrate.
pub fn select_residues(
    topology: &Topology,
    criteria: &SelectionCriteria,
) -> Result<ResidueSelection, EngineError> {
    let active = active_names(criteria);
    debug!("Active titratable residue names: {:?}", active);
    let is_active = |name: &str| active.iter().any(|a| a == name);

    let mut residues = match &criteria.numbers {
        NumberFilter::Include(numbers) => {
            let mut seen = HashSet::new();
            let mut selected = Vec::with_capacity(numbers.len());
            for &number in numbers {
                let residue = topology.residue(number).ok_or_else(|| {
                    EngineError::ResidueOutOfRange {
                        number,
                        residue_count: topology.len(),
                    }
                })?;
                if !seen.insert(number) {
                    return Err(EngineError::DuplicateResidue { number });
                }
                if !is_active(&residue.name) {
                    return Err(EngineError::NotTitratable {
                        number,
                        name: residue.name.clone(),
                    });
                }
                selected.push(SelectedResidue {
                    number,
                    name: residue.name.clone(),
                });
            }
            selected
        }
        NumberFilter::All | NumberFilter::Exclude(_) => topology
            .numbered_residues()
            .filter(|(_, residue)| is_active(&residue.name))
            .map(|(number, residue)| SelectedResidue {
                number,
                name: residue.name.clone(),
            })
            .collect(),
    };

    if let NumberFilter::Exclude(excluded) = &criteria.numbers {
        let before = residues.len();
        residues.retain(|r| !excluded.contains(&r.number));
        debug!("Excluded {} residue(s) by number.", before - residues.len());
    }

    if residues.is_empty() {
        return Err(EngineError::NoResiduesSelected);
    }

    let selection = ResidueSelection::new(residues);
    debug!(
        "Selected {} residue(s) with {} distinct name(s).",
        selection.len(),
        selection.names().len()
    );
    Ok(selection)
}
