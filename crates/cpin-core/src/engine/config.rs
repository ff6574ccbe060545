use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid pKa range: minimum {min} is greater than maximum {max}")]
    InvalidPkaRange { min: f64, max: f64 },
}

/// Which residue names are eligible for titration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NameFilter {
    /// The built-in titratable residues, narrowed by the pKa range.
    #[default]
    Default,
    /// Exactly these names; the pKa range does not apply.
    Include(Vec<String>),
    /// The built-in titratable residues minus these names.
    Exclude(Vec<String>),
}

/// Which residue numbers are titrated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NumberFilter {
    /// Every residue whose name is in the active name set.
    #[default]
    All,
    /// Exactly these residues, in this order. Each must carry an active name.
    Include(Vec<usize>),
    /// Every matching residue except these.
    Exclude(Vec<usize>),
}

/// Inclusive bounds on the reference pKa of built-in titratable residues.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PkaRange {
    min: f64,
    max: f64,
}

impl PkaRange {
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidPkaRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, pka: f64) -> bool {
        pka >= self.min && pka <= self.max
    }
}

impl Default for PkaRange {
    fn default() -> Self {
        Self {
            min: -100.0,
            max: 100.0,
        }
    }
}

/// Describes which residues to titrate and how to start them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionCriteria {
    pub names: NameFilter,
    pub numbers: NumberFilter,
    pub pka_range: PkaRange,
    /// One initial state per selected residue, in selection order.
    pub initial_states: Option<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CpinConfig {
    /// Generalized Born model whose reference energies are used.
    pub igb: u8,
    /// Label written as the first `RESNAME` entry.
    pub system_name: String,
    pub selection: SelectionCriteria,
    /// Downgrades the radius-set check from an error to a logged warning.
    pub ignore_warnings: bool,
}

#[derive(Default)]
pub struct CpinConfigBuilder {
    igb: Option<u8>,
    system_name: Option<String>,
    selection: Option<SelectionCriteria>,
    ignore_warnings: bool,
}

impl CpinConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn igb(mut self, igb: u8) -> Self {
        self.igb = Some(igb);
        self
    }
    pub fn system_name(mut self, name: impl Into<String>) -> Self {
        self.system_name = Some(name.into());
        self
    }
    pub fn selection(mut self, selection: SelectionCriteria) -> Self {
        self.selection = Some(selection);
        self
    }
    pub fn ignore_warnings(mut self, ignore: bool) -> Self {
        self.ignore_warnings = ignore;
        self
    }

    pub fn build(self) -> Result<CpinConfig, ConfigError> {
        Ok(CpinConfig {
            igb: self.igb.ok_or(ConfigError::MissingParameter("igb"))?,
            system_name: self
                .system_name
                .ok_or(ConfigError::MissingParameter("system_name"))?,
            selection: self.selection.unwrap_or_default(),
            ignore_warnings: self.ignore_warnings,
        })
    }
}
