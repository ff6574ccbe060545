use crate::cli::Cli;
use crate::error::{CliError, Result};
use cpinkit::engine::config as core_config;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const DEFAULT_IGB: u8 = 5;
const DEFAULT_SYSTEM_NAME: &str = "Unknown";
const DEFAULT_MIN_PKA: f64 = -100.0;
const DEFAULT_MAX_PKA: f64 = 100.0;

/// Settings read from a `--config` TOML file. Every key is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PartialCpinConfig {
    reference: Option<PathBuf>,
    igb: Option<u8>,
    system: Option<String>,
    min_pka: Option<f64>,
    max_pka: Option<f64>,
    ignore_warnings: Option<bool>,
    resname: Option<Vec<String>>,
    notresname: Option<Vec<String>>,
    resnum: Option<Vec<usize>>,
    notresnum: Option<Vec<usize>>,
    states: Option<Vec<usize>>,
}

/// Everything a run needs, after merging the command line, the config file
/// and the defaults.
#[derive(Debug)]
pub struct AppConfig {
    pub prmtop_path: PathBuf,
    pub reference_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub core_config: core_config::CpinConfig,
}

impl PartialCpinConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Command-line values win over file values; defaults fill the rest.
    pub fn merge_with_cli(self, args: &Cli) -> Result<AppConfig> {
        let reference_path = args.reference.clone().or(self.reference).ok_or_else(|| {
            CliError::Config(
                "A reference library is required either in the config file or via --reference."
                    .to_string(),
            )
        })?;

        let ignore_warnings = args.ignore_warnings || self.ignore_warnings.unwrap_or(false);

        let igb = match args.igb.or(self.igb) {
            Some(igb) => igb,
            None => {
                if !ignore_warnings {
                    warn!("igb = {} used as default", DEFAULT_IGB);
                }
                DEFAULT_IGB
            }
        };

        let pka_range = core_config::PkaRange::new(
            args.min_pka.or(self.min_pka).unwrap_or(DEFAULT_MIN_PKA),
            args.max_pka.or(self.max_pka).unwrap_or(DEFAULT_MAX_PKA),
        )
        .map_err(|e| CliError::Config(e.to_string()))?;

        let names = merge_filter(
            pick(&args.resname, self.resname),
            pick(&args.notresname, self.notresname),
            ("resname", "notresname"),
        )?
        .map_or(core_config::NameFilter::Default, |filter| match filter {
            Filter::Include(names) => core_config::NameFilter::Include(names),
            Filter::Exclude(names) => core_config::NameFilter::Exclude(names),
        });

        let numbers = merge_filter(
            pick(&args.resnum, self.resnum),
            pick(&args.notresnum, self.notresnum),
            ("resnum", "notresnum"),
        )?
        .map_or(core_config::NumberFilter::All, |filter| match filter {
            Filter::Include(numbers) => core_config::NumberFilter::Include(numbers),
            Filter::Exclude(numbers) => core_config::NumberFilter::Exclude(numbers),
        });

        let selection = core_config::SelectionCriteria {
            names,
            numbers,
            pka_range,
            initial_states: pick(&args.states, self.states),
        };
        debug!("Merged selection criteria: {:?}", selection);

        let core_config = core_config::CpinConfigBuilder::new()
            .igb(igb)
            .system_name(
                args.system
                    .clone()
                    .or(self.system)
                    .unwrap_or_else(|| DEFAULT_SYSTEM_NAME.to_string()),
            )
            .selection(selection)
            .ignore_warnings(ignore_warnings)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        Ok(AppConfig {
            prmtop_path: args.prmtop.clone(),
            reference_path,
            output_path: args.output.clone(),
            core_config,
        })
    }
}

enum Filter<T> {
    Include(Vec<T>),
    Exclude(Vec<T>),
}

/// A non-empty command-line list replaces the file's list.
fn pick<T: Clone>(cli_values: &[T], file_values: Option<Vec<T>>) -> Option<Vec<T>> {
    if cli_values.is_empty() {
        file_values.filter(|values| !values.is_empty())
    } else {
        Some(cli_values.to_vec())
    }
}

fn merge_filter<T>(
    include: Option<Vec<T>>,
    exclude: Option<Vec<T>>,
    (include_key, exclude_key): (&str, &str),
) -> Result<Option<Filter<T>>> {
    match (include, exclude) {
        (Some(_), Some(_)) => Err(CliError::Argument(format!(
            "'{}' and '{}' cannot be used together",
            include_key, exclude_key
        ))),
        (Some(values), None) => Ok(Some(Filter::Include(values))),
        (None, Some(values)) => Ok(Some(Filter::Exclude(values))),
        (None, None) => Ok(None),
    }
}
