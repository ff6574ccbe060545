use super::error::EngineError;
use super::resolver::ResolvedReferences;
use super::selection::ResidueSelection;
use crate::core::models::record::OffsetEntry;
use crate::core::models::topology::Topology;
use tracing::debug;

/// Expands the optional explicit initial states to one entry per selected residue.
///
/// Without explicit states every residue starts in state 0.
pub fn initial_states(
    explicit: Option<&[usize]>,
    selection: &ResidueSelection,
) -> Result<Vec<usize>, EngineError> {
    match explicit {
        None => Ok(vec![0; selection.len()]),
        Some(states) if states.len() == selection.len() => Ok(states.to_vec()),
        Some(states) => Err(EngineError::StateCountMismatch {
            given: states.len(),
            selected: selection.len(),
        }),
    }
}

/// Builds the `STATEINF` table for `selection`.
///
/// Offsets index the flattened arrays, which hold one block per distinct
/// residue name; residues sharing a name share a block. Every initial state
/// is checked against the number of states of its residue; there must be
/// exactly one initial state per selected residue.
pub fn compute_offsets(
    selection: &ResidueSelection,
    references: &ResolvedReferences<'_>,
    topology: &Topology,
    initial_states: &[usize],
) -> Result<Vec<OffsetEntry>, EngineError> {
    if initial_states.len() != selection.len() {
        return Err(EngineError::StateCountMismatch {
            given: initial_states.len(),
            selected: selection.len(),
        });
    }

    let mut block_starts = Vec::with_capacity(references.blocks().len());
    let (mut charge_cursor, mut state_cursor) = (0, 0);
    for (_, states) in references.blocks() {
        block_starts.push((charge_cursor, state_cursor));
        charge_cursor += states.charge_block_len();
        state_cursor += states.num_states();
    }

    selection
        .residues()
        .iter()
        .zip(initial_states)
        .map(|(residue, &state)| {
            let block = references.block_index(&residue.name).ok_or_else(|| {
                EngineError::MissingReference {
                    name: residue.name.clone(),
                    igb: references.igb(),
                }
            })?;
            let (first_charge, first_state) = block_starts[block];
            let states = references.blocks()[block].1;

            if state >= states.num_states() {
                return Err(EngineError::StateOutOfRange {
                    number: residue.number,
                    name: residue.name.clone(),
                    state,
                    num_states: states.num_states(),
                });
            }

            let first_atom = topology
                .residue(residue.number)
                .map(|r| r.first_atom)
                .ok_or(EngineError::ResidueOutOfRange {
                    number: residue.number,
                    residue_count: topology.len(),
                })?;

            let entry = OffsetEntry {
                first_atom,
                first_charge,
                first_state,
                num_atoms: states.num_atoms(),
                num_states: states.num_states(),
            };
            debug!(
                "Residue {} {}: {:?}, initial state {}.",
                residue.name, residue.number, entry, state
            );
            Ok(entry)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::states::{ReferenceStateSet, StateRecord};
    use crate::core::models::topology::TopologyResidue;
    use crate::core::reference::library::ReferenceLibrary;
    use crate::engine::config::SelectionCriteria;
    use crate::engine::resolver::resolve_references;
    use crate::engine::selection::select_residues;

    fn uniform_set(num_states: usize, num_atoms: usize) -> ReferenceStateSet {
        ReferenceStateSet::new(
            (0..num_states)
                .map(|s| StateRecord {
                    energy: s as f64,
                    protons: s as u32,
                    charges: vec![0.0; num_atoms],
                })
                .collect(),
        )
        .unwrap()
    }

    fn library() -> ReferenceLibrary {
        let mut library = ReferenceLibrary::new();
        library.insert("AS4", 5, uniform_set(5, 12));
        library.insert("TYR", 5, uniform_set(2, 21));
        library.insert("HIP", 5, uniform_set(3, 17));
        library
    }

    fn topology(names: &[&str]) -> Topology {
        Topology::new(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| TopologyResidue::new(name, i * 20 + 1))
                .collect(),
            None,
        )
    }

    #[test]
    fn offsets_accumulate_over_distinct_name_blocks() {
        let topology = topology(&["HIP", "AS4", "HIP", "TYR", "AS4"]);
        let selection = select_residues(&topology, &SelectionCriteria::default()).unwrap();
        let library = library();
        let references = resolve_references(&selection, &library, 5).unwrap();
        let states = vec![0; selection.len()];

        let offsets = compute_offsets(&selection, &references, &topology, &states).unwrap();

        let first_charges: Vec<usize> = offsets.iter().map(|e| e.first_charge).collect();
        let first_states: Vec<usize> = offsets.iter().map(|e| e.first_state).collect();
        let first_atoms: Vec<usize> = offsets.iter().map(|e| e.first_atom).collect();
        // Blocks: HIP (3x17=51), AS4 (5x12=60), TYR (2x21=42).
        assert_eq!(first_charges, vec![0, 51, 0, 111, 51]);
        assert_eq!(first_states, vec![0, 3, 0, 8, 3]);
        assert_eq!(first_atoms, vec![1, 21, 41, 61, 81]);
        assert_eq!(offsets[3].num_atoms, 21);
        assert_eq!(offsets[3].num_states, 2);
    }

    #[test]
    fn consecutive_blocks_satisfy_offset_invariant() {
        let topology = topology(&["TYR", "HIP", "AS4"]);
        let selection = select_residues(&topology, &SelectionCriteria::default()).unwrap();
        let library = library();
        let references = resolve_references(&selection, &library, 5).unwrap();
        let offsets =
            compute_offsets(&selection, &references, &topology, &[0, 0, 0]).unwrap();

        for pair in offsets.windows(2) {
            let (i, j) = (pair[0], pair[1]);
            assert_eq!(j.first_charge, i.first_charge + i.num_atoms * i.num_states);
            assert_eq!(j.first_state, i.first_state + i.num_states);
        }
    }

    #[test]
    fn last_valid_state_is_accepted_and_next_is_rejected() {
        let topology = topology(&["TYR", "AS4"]);
        let selection = select_residues(&topology, &SelectionCriteria::default()).unwrap();
        let library = library();
        let references = resolve_references(&selection, &library, 5).unwrap();

        assert!(compute_offsets(&selection, &references, &topology, &[1, 4]).is_ok());
        match compute_offsets(&selection, &references, &topology, &[2, 0]) {
            Err(EngineError::StateOutOfRange {
                number,
                name,
                state,
                num_states,
            }) => {
                assert_eq!((number, name.as_str()), (1, "TYR"));
                assert_eq!((state, num_states), (2, 2));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn initial_states_default_to_zero() {
        let topology = topology(&["TYR", "AS4"]);
        let selection = select_residues(&topology, &SelectionCriteria::default()).unwrap();
        assert_eq!(initial_states(None, &selection).unwrap(), vec![0, 0]);
        assert_eq!(initial_states(Some(&[1, 3]), &selection).unwrap(), vec![1, 3]);
    }

    #[test]
    fn compute_offsets_rejects_short_state_slice() {
        let topology = topology(&["TYR", "AS4"]);
        let selection = select_residues(&topology, &SelectionCriteria::default()).unwrap();
        let library = library();
        let references = resolve_references(&selection, &library, 5).unwrap();

        assert!(matches!(
            compute_offsets(&selection, &references, &topology, &[0]),
            Err(EngineError::StateCountMismatch {
                given: 1,
                selected: 2
            })
        ));
        assert!(matches!(
            compute_offsets(&selection, &references, &topology, &[0, 0, 0]),
            Err(EngineError::StateCountMismatch {
                given: 3,
                selected: 2
            })
        ));
    }

    #[test]
    fn initial_states_must_match_selection_length() {
        let topology = topology(&["TYR", "AS4"]);
        let selection = select_residues(&topology, &SelectionCriteria::default()).unwrap();
        assert!(matches!(
            initial_states(Some(&[0]), &selection),
            Err(EngineError::StateCountMismatch {
                given: 1,
                selected: 2
            })
        ));
    }
}
