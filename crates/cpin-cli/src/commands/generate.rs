use crate::cli::Cli;
use crate::config::{AppConfig, PartialCpinConfig};
use crate::error::{CliError, Result};
use cpinkit::{
    core::io::{cpin::CpinFile, prmtop::PrmtopFile, traits::RecordFile},
    core::reference::library::ReferenceLibrary,
    engine::error::EngineError,
    workflows,
};
use std::io::{self, Write};
use tracing::info;

pub fn run(args: &Cli) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialCpinConfig::from_file(path)?,
        None => PartialCpinConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_with_cli(args)?;

    execute(&config)
}

/// Reads the inputs named by `config`, runs the workflow and writes the
/// record. Nothing is written when any step fails.
pub fn execute(config: &AppConfig) -> Result<()> {
    info!("Loading topology from {:?}", &config.prmtop_path);
    let topology =
        PrmtopFile::read_from_path(&config.prmtop_path).map_err(|e| CliError::FileParsing {
            path: config.prmtop_path.clone(),
            source: e.into(),
        })?;

    info!("Loading reference library from {:?}", &config.reference_path);
    let library = ReferenceLibrary::load(&config.reference_path).map_err(EngineError::from)?;

    let record = workflows::generate::run(&topology, &config.core_config, &library)?;

    match &config.output_path {
        Some(path) => {
            info!("Writing cpin file to {:?}", path);
            CpinFile::write_to_path(&record, path).map_err(|e| CliError::FileParsing {
                path: path.clone(),
                source: e.into(),
            })?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            CpinFile::write_to(&record, &mut stdout).map_err(|e| CliError::Other(e.into()))?;
            stdout.flush()?;
        }
    }

    Ok(())
}
