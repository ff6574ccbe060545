use phf::{OrderedMap, phf_ordered_map};

/// Residues that can be titrated by default, with their reference pKa values.
///
/// Iteration order is the order in which names enter the default active set.
static TITRATABLE_RESIDUES: OrderedMap<&'static str, f64> = phf_ordered_map! {
    "AS4" => 4.0,
    "GL4" => 4.4,
    "HIP" => 6.5,
    "TYR" => 9.6,
    "LYS" => 10.4,
    "CYS" => 8.55,
};

/// Radius set that all tabulated reference energies were computed with.
pub const EXPECTED_RADIUS_SET: &str = "H(N)-modified Bondi radii (mbondi2)";

pub fn titratable_residues() -> impl Iterator<Item = (&'static str, f64)> {
    TITRATABLE_RESIDUES
        .entries()
        .map(|(name, pka)| (*name, *pka))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_names_keep_table_order() {
        let names: Vec<&str> = titratable_residues().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["AS4", "GL4", "HIP", "TYR", "LYS", "CYS"]);
    }

    #[test]
    fn titratable_residues_pairs_names_with_pkas() {
        let pairs: Vec<(&str, f64)> = titratable_residues().collect();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[3], ("TYR", 9.6));
    }
}
