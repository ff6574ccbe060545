use clap::Parser;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "cpinutil - Generates the constant-pH input (cpin) file for AMBER molecular dynamics from a topology and tabulated protonation states.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    // --- Inputs and Outputs ---
    /// Path to the AMBER topology (prmtop) file of the system.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub prmtop: PathBuf,

    /// Path to the TOML library of reference protonation states.
    #[arg(short, long, value_name = "PATH")]
    pub reference: Option<PathBuf>,

    /// Write the cpin file here instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Record Options ---
    /// Generalized Born model whose reference energies are used (default: 5).
    #[arg(long, value_name = "INT")]
    pub igb: Option<u8>,

    /// Name of the system written into the RESNAME list (default: Unknown).
    #[arg(long, value_name = "NAME")]
    pub system: Option<String>,

    /// Ignore built-in residues whose reference pKa is below this value.
    #[arg(long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub min_pka: Option<f64>,

    /// Ignore built-in residues whose reference pKa is above this value.
    #[arg(long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub max_pka: Option<f64>,

    /// Continue with a warning when the topology was not built with the expected radius set.
    #[arg(long)]
    pub ignore_warnings: bool,

    // --- Residue Selection ---
    /// Titrate only residues with these names.
    #[arg(long, value_name = "NAME", num_args = 1.., value_delimiter = ',', conflicts_with = "notresname")]
    pub resname: Vec<String>,

    /// Do not titrate residues with these names.
    #[arg(long, value_name = "NAME", num_args = 1.., value_delimiter = ',')]
    pub notresname: Vec<String>,

    /// Titrate only these residue numbers.
    #[arg(long, value_name = "NUM", num_args = 1.., value_delimiter = ',', conflicts_with = "notresnum")]
    pub resnum: Vec<usize>,

    /// Do not titrate these residue numbers.
    #[arg(long, value_name = "NUM", num_args = 1.., value_delimiter = ',')]
    pub notresnum: Vec<usize>,

    /// Initial protonation state of each titrated residue, in selection order.
    #[arg(long, value_name = "STATE", num_args = 1.., value_delimiter = ',')]
    pub states: Vec<usize>,

    // --- Logging ---
    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("cpinutil").chain(args.iter().copied()))
    }

    #[test]
    fn list_options_accept_commas_and_repeated_values() {
        let cli = parse(&[
            "-p", "sys.prmtop", "--resname", "AS4,GL4", "--resname", "HIP", "--resnum", "3", "7",
            "--states", "0,1,2",
        ])
        .unwrap();
        assert_eq!(cli.resname, vec!["AS4", "GL4", "HIP"]);
        assert_eq!(cli.resnum, vec![3, 7]);
        assert_eq!(cli.states, vec![0, 1, 2]);
        assert!(cli.notresname.is_empty());
    }

    #[test]
    fn include_and_exclude_names_conflict() {
        let err = parse(&["-p", "sys.prmtop", "--resname", "AS4", "--notresname", "TYR"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn include_and_exclude_numbers_conflict() {
        let err = parse(&["-p", "sys.prmtop", "--resnum", "1", "--notresnum", "2"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn prmtop_is_required() {
        let err = parse(&["-r", "ref.toml"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn pka_bounds_accept_negative_values() {
        let cli = parse(&["-p", "sys.prmtop", "--min-pka", "-3.5", "--max-pka", "9"]).unwrap();
        assert_eq!(cli.min_pka, Some(-3.5));
        assert_eq!(cli.max_pka, Some(9.0));
        assert_eq!(cli.verbose, 0);
    }
}
