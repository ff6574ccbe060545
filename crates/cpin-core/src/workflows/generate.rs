use crate::core::models::record::{CpinRecord, ResidueLabel};
use crate::core::models::topology::Topology;
use crate::core::reference::library::ReferenceTable;
use crate::core::reference::titratable::EXPECTED_RADIUS_SET;
use crate::engine::config::CpinConfig;
use crate::engine::error::EngineError;
use crate::engine::offsets::{compute_offsets, initial_states};
use crate::engine::resolver::resolve_references;
use crate::engine::selection::select_residues;
use tracing::{info, instrument, warn};

/// Builds the cpin record for `topology` under `config`.
///
/// The stages run in order: radius-set check, residue selection, initial
/// state expansion, reference resolution and offset calculation. The first
/// failing stage aborts the run, so a returned record is always complete and
/// internally consistent.
#[instrument(skip_all, name = "cpin_workflow")]
pub fn run<T: ReferenceTable>(
    topology: &Topology,
    config: &CpinConfig,
    references: &T,
) -> Result<CpinRecord, EngineError> {
    info!(
        "Generating cpin for system '{}' with igb={} ({} topology residues).",
        config.system_name,
        config.igb,
        topology.len()
    );

    check_radius_set(topology, config.ignore_warnings)?;

    let selection = select_residues(topology, &config.selection)?;
    info!(
        "Selected {} titratable residue(s): {}.",
        selection.len(),
        selection.names().join(", ")
    );

    let states = initial_states(config.selection.initial_states.as_deref(), &selection)?;
    let resolved = resolve_references(&selection, references, config.igb)?;
    let offsets = compute_offsets(&selection, &resolved, topology, &states)?;

    let record = CpinRecord {
        system_name: config.system_name.clone(),
        residues: selection
            .residues()
            .iter()
            .map(|r| ResidueLabel::new(&r.name, r.number))
            .collect(),
        charges: resolved.charges(),
        proton_counts: resolved.proton_counts(),
        energies: resolved.energies(),
        offsets,
        initial_states: states,
    };

    info!(
        "Assembled cpin record: {} residues, {} states, {} charges.",
        record.residue_count(),
        record.state_count(),
        record.charges.len()
    );
    Ok(record)
}

/// Compares the topology's radius set against the one the reference energies
/// were computed with.
pub fn check_radius_set(topology: &Topology, ignore_warnings: bool) -> Result<(), EngineError> {
    let found = topology.radius_set();
    if found == Some(EXPECTED_RADIUS_SET) {
        return Ok(());
    }

    if ignore_warnings {
        warn!(
            "Topology radius set is {:?}, expected '{}'. Continuing because warnings are ignored.",
            found, EXPECTED_RADIUS_SET
        );
        Ok(())
    } else {
        Err(EngineError::RadiusSetMismatch {
            found: found.map(str::to_string),
            expected: EXPECTED_RADIUS_SET,
        })
    }
}
