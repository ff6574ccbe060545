use super::error::EngineError;
use super::selection::ResidueSelection;
use crate::core::models::states::{ReferenceStateSet, StateRecord};
use crate::core::reference::library::ReferenceTable;
use tracing::debug;

/// Reference state sets for the distinct names of a selection, in block order.
#[derive(Debug, Clone)]
pub struct ResolvedReferences<'a> {
    igb: u8,
    blocks: Vec<(&'a str, &'a ReferenceStateSet)>,
}

impl<'a> ResolvedReferences<'a> {
    pub fn igb(&self) -> u8 {
        self.igb
    }

    pub fn blocks(&self) -> &[(&'a str, &'a ReferenceStateSet)] {
        &self.blocks
    }

    /// Position of `name` in block order.
    pub fn block_index(&self, name: &str) -> Option<usize> {
        self.blocks.iter().position(|(n, _)| *n == name)
    }

    /// Per-atom charges of every state, block after block.
    pub fn charges(&self) -> Vec<f64> {
        self.states()
            .flat_map(|state| state.charges.iter().copied())
            .collect()
    }

    pub fn proton_counts(&self) -> Vec<u32> {
        self.states().map(|state| state.protons).collect()
    }

    pub fn energies(&self) -> Vec<f64> {
        self.states().map(|state| state.energy).collect()
    }

    fn states(&self) -> impl Iterator<Item = &'a StateRecord> + '_ {
        self.blocks.iter().flat_map(|&(_, set)| set.states())
    }
}

/// Looks up the reference states of every distinct selected residue name.
///
/// # Errors
///
/// Returns [`EngineError::MissingReference`] for the first name that `table`
/// has no entry for under `igb`.
pub fn resolve_references<'a, T: ReferenceTable>(
    selection: &'a ResidueSelection,
    table: &'a T,
    igb: u8,
) -> Result<ResolvedReferences<'a>, EngineError> {
    let blocks = selection
        .names()
        .iter()
        .map(|name| {
            let states = table
                .lookup(name, igb)
                .ok_or_else(|| EngineError::MissingReference {
                    name: name.clone(),
                    igb,
                })?;
            debug!(
                "Resolved {} (igb={}): {} states of {} atoms.",
                name,
                igb,
                states.num_states(),
                states.num_atoms()
            );
            Ok((name.as_str(), states))
        })
        .collect::<Result<Vec<_>, EngineError>>()?;
    Ok(ResolvedReferences { igb, blocks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::topology::{Topology, TopologyResidue};
    use crate::core::reference::library::ReferenceLibrary;
    use crate::engine::config::SelectionCriteria;
    use crate::engine::selection::select_residues;

    fn state_set(states: Vec<(f64, u32, Vec<f64>)>) -> ReferenceStateSet {
        ReferenceStateSet::new(
            states
                .into_iter()
                .map(|(energy, protons, charges)| StateRecord {
                    energy,
                    protons,
                    charges,
                })
                .collect(),
        )
        .unwrap()
    }

    fn library() -> ReferenceLibrary {
        let mut library = ReferenceLibrary::new();
        library.insert(
            "TYR",
            5,
            state_set(vec![(0.0, 1, vec![0.1, 0.2]), (-65.1, 0, vec![0.3, 0.4])]),
        );
        library.insert(
            "AS4",
            5,
            state_set(vec![
                (0.0, 0, vec![-0.5]),
                (26.9, 1, vec![-0.4]),
                (26.9, 1, vec![-0.3]),
            ]),
        );
        library
    }

    fn selection(names: &[&str]) -> ResidueSelection {
        let topology = Topology::new(
            names
                .iter()
                .enumerate()
                .map(|(i, n)| TopologyResidue::new(n, i + 1))
                .collect(),
            None,
        );
        select_residues(&topology, &SelectionCriteria::default()).unwrap()
    }

    #[test]
    fn resolve_follows_first_occurrence_name_order() {
        let library = library();
        let selection = selection(&["TYR", "AS4", "TYR"]);
        let resolved = resolve_references(&selection, &library, 5).unwrap();
        let names: Vec<&str> = resolved.blocks().iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["TYR", "AS4"]);
        assert_eq!(resolved.block_index("AS4"), Some(1));
        assert_eq!(resolved.blocks()[1].1.num_states(), 3);
    }

    #[test]
    fn flattened_arrays_are_grouped_by_block_then_state() {
        let library = library();
        let selection = selection(&["TYR", "AS4"]);
        let resolved = resolve_references(&selection, &library, 5).unwrap();
        assert_eq!(resolved.charges(), vec![0.1, 0.2, 0.3, 0.4, -0.5, -0.4, -0.3]);
        assert_eq!(resolved.proton_counts(), vec![1, 0, 0, 1, 1]);
        assert_eq!(resolved.energies(), vec![0.0, -65.1, 0.0, 26.9, 26.9]);
    }

    #[test]
    fn resolve_fails_for_unknown_igb() {
        let library = library();
        let selection = selection(&["AS4"]);
        match resolve_references(&selection, &library, 2) {
            Err(EngineError::MissingReference { name, igb }) => {
                assert_eq!(name, "AS4");
                assert_eq!(igb, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn resolve_fails_for_name_without_reference_data() {
        let library = library();
        let selection = selection(&["AS4", "LYS"]);
        assert!(matches!(
            resolve_references(&selection, &library, 5),
            Err(EngineError::MissingReference { ref name, .. }) if name == "LYS"
        ));
    }
}
