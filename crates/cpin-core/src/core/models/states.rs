use serde::Deserialize;
use thiserror::Error;

/// One tabulated protonation state of a titratable residue.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StateRecord {
    /// Reference energy of the state (kcal/mol).
    pub energy: f64,
    /// Number of titratable protons present in this state.
    pub protons: u32,
    /// Partial charge on every atom of the residue, in topology atom order.
    pub charges: Vec<f64>,
}

/// The ordered protonation states of a single residue type.
///
/// All states share the same atom count; the constructor is the only way to
/// build a set, so the invariant holds for every instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceStateSet {
    states: Vec<StateRecord>,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateSetError {
    #[error("a residue must define at least one protonation state")]
    Empty,
    #[error("state {state} has {found} charges, expected {expected}")]
    InconsistentAtomCount {
        state: usize,
        expected: usize,
        found: usize,
    },
}

impl ReferenceStateSet {
    pub fn new(states: Vec<StateRecord>) -> Result<Self, StateSetError> {
        let first = states.first().ok_or(StateSetError::Empty)?;
        let expected = first.charges.len();
        if let Some((state, record)) = states
            .iter()
            .enumerate()
            .find(|(_, record)| record.charges.len() != expected)
        {
            return Err(StateSetError::InconsistentAtomCount {
                state,
                expected,
                found: record.charges.len(),
            });
        }
        Ok(Self { states })
    }

    pub fn states(&self) -> &[StateRecord] {
        &self.states
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_atoms(&self) -> usize {
        self.states[0].charges.len()
    }

    /// Size of this set's block in a flattened charge array.
    pub fn charge_block_len(&self) -> usize {
        self.num_atoms() * self.num_states()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(energy: f64, protons: u32, charges: &[f64]) -> StateRecord {
        StateRecord {
            energy,
            protons,
            charges: charges.to_vec(),
        }
    }

    #[test]
    fn new_accepts_states_with_equal_atom_counts() {
        let set = ReferenceStateSet::new(vec![
            state(0.0, 1, &[0.1, -0.1, 0.0]),
            state(-12.5, 0, &[0.2, -0.2, -1.0]),
        ])
        .unwrap();
        assert_eq!(set.num_states(), 2);
        assert_eq!(set.num_atoms(), 3);
        assert_eq!(set.charge_block_len(), 6);
    }

    #[test]
    fn new_rejects_empty_state_list() {
        assert_eq!(ReferenceStateSet::new(vec![]), Err(StateSetError::Empty));
    }

    #[test]
    fn new_reports_first_state_with_mismatched_atom_count() {
        let result = ReferenceStateSet::new(vec![
            state(0.0, 1, &[0.1, 0.2]),
            state(1.0, 0, &[0.1, 0.2]),
            state(2.0, 0, &[0.1]),
        ]);
        assert_eq!(
            result,
            Err(StateSetError::InconsistentAtomCount {
                state: 2,
                expected: 2,
                found: 1,
            })
        );
    }
}
