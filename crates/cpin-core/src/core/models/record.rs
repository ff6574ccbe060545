/// Per-residue indexing data written as one `STATEINF` group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OffsetEntry {
    pub first_atom: usize,   // 1-based topology index of the residue's first atom
    pub first_charge: usize, // Offset of the residue's block in `CHRGDAT`
    pub first_state: usize,  // Offset of the residue's block in `PROTCNT`/`STATENE`
    pub num_atoms: usize,
    pub num_states: usize,
}

/// Identifies one titrated residue occurrence in the `RESNAME` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidueLabel {
    pub name: String,
    pub number: usize,
}

impl ResidueLabel {
    pub fn new(name: &str, number: usize) -> Self {
        Self {
            name: name.to_string(),
            number,
        }
    }
}

/// The fully assembled contents of a `&CNSTPH` namelist.
///
/// `charges`, `proton_counts` and `energies` are grouped by distinct residue
/// name (block order), then by state, then by atom. `residues`, `offsets` and
/// `initial_states` are indexed by titrated residue occurrence and always have
/// the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CpinRecord {
    pub system_name: String,
    pub residues: Vec<ResidueLabel>,
    pub charges: Vec<f64>,
    pub proton_counts: Vec<u32>,
    pub energies: Vec<f64>,
    pub offsets: Vec<OffsetEntry>,
    pub initial_states: Vec<usize>,
}

impl CpinRecord {
    /// The value written to `TRESCNT`.
    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    /// Total number of tabulated states across all residue blocks.
    pub fn state_count(&self) -> usize {
        self.energies.len()
    }
}
