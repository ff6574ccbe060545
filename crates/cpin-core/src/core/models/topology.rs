/// A single residue entry of a molecular topology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopologyResidue {
    pub name: String,      // Residue label as stored in the topology (e.g., "AS4")
    pub first_atom: usize, // 1-based index of the residue's first atom
}

impl TopologyResidue {
    pub fn new(name: &str, first_atom: usize) -> Self {
        Self {
            name: name.trim().to_string(),
            first_atom,
        }
    }
}

/// The residue-level view of a molecular topology.
///
/// Residues are addressed by their 1-based residue number, matching the
/// numbering used by AMBER tools and by the `RESNAME` labels of a cpin file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    residues: Vec<TopologyResidue>,
    radius_set: Option<String>,
}

impl Topology {
    pub fn new(residues: Vec<TopologyResidue>, radius_set: Option<String>) -> Self {
        Self {
            residues,
            radius_set: radius_set.map(|label| label.trim().to_string()),
        }
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Returns the residue with the given 1-based number.
    pub fn residue(&self, number: usize) -> Option<&TopologyResidue> {
        number
            .checked_sub(1)
            .and_then(|index| self.residues.get(index))
    }

    /// Iterates residues in ascending order together with their 1-based numbers.
    pub fn numbered_residues(&self) -> impl Iterator<Item = (usize, &TopologyResidue)> {
        self.residues
            .iter()
            .enumerate()
            .map(|(index, residue)| (index + 1, residue))
    }

    pub fn residues(&self) -> &[TopologyResidue] {
        &self.residues
    }

    pub fn radius_set(&self) -> Option<&str> {
        self.radius_set.as_deref()
    }
}
