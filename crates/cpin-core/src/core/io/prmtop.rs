use crate::core::io::traits::RecordFile;
use crate::core::models::topology::{Topology, TopologyResidue};
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;

const RESIDUE_LABEL: &str = "RESIDUE_LABEL";
const RESIDUE_POINTER: &str = "RESIDUE_POINTER";
const RADIUS_SET: &str = "RADIUS_SET";

#[derive(Debug, Error)]
pub enum PrmtopError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PrmtopParseErrorKind,
    },
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PrmtopParseErrorKind {
    #[error("Invalid %FORMAT specifier '{0}'")]
    InvalidFormat(String),
    #[error("Section '{flag}' has data before its %FORMAT line")]
    MissingFormat { flag: String },
    #[error("Invalid integer in section '{flag}' (value: '{value}')")]
    InvalidInt { flag: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Text,
    Integer,
    Real,
}

/// A Fortran edit descriptor such as `20a4`, `10I8` or `5E16.8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FortranFormat {
    per_line: usize,
    kind: FieldKind,
    width: usize,
}

impl FromStr for FortranFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim();
        let kind_pos = spec
            .find(|c: char| c.is_ascii_alphabetic())
            .ok_or(())?;
        let per_line = match &spec[..kind_pos] {
            "" => 1,
            count => count.parse().map_err(|_| ())?,
        };
        let kind = match spec[kind_pos..].chars().next() {
            Some('a' | 'A') => FieldKind::Text,
            Some('i' | 'I') => FieldKind::Integer,
            Some('e' | 'E' | 'f' | 'F' | 'd' | 'D') => FieldKind::Real,
            _ => return Err(()),
        };
        let rest = &spec[kind_pos + 1..];
        let width_str = rest.split('.').next().unwrap_or("");
        let width: usize = width_str.parse().map_err(|_| ())?;
        if width == 0 || per_line == 0 {
            return Err(());
        }
        Ok(Self {
            per_line,
            kind,
            width,
        })
    }
}

#[derive(Debug, Default)]
struct Section {
    format: Option<FortranFormat>,
    fields: Vec<(usize, String)>,
}

fn fixed_width_fields(line: &str, width: usize) -> impl Iterator<Item = &str> {
    (0..line.len())
        .step_by(width)
        .map(move |start| line.get(start..(start + width).min(line.len())).unwrap_or(""))
}

/// Reader and writer for the residue-level sections of an AMBER `prmtop` file.
///
/// Only `RESIDUE_LABEL`, `RESIDUE_POINTER` and `RADIUS_SET` are interpreted;
/// every other section is skipped.
pub struct PrmtopFile;

impl PrmtopFile {
    fn parse_integers(section: &Section, flag: &str) -> Result<Vec<usize>, PrmtopError> {
        section
            .fields
            .iter()
            .map(|(line, value)| {
                value.parse().map_err(|_| PrmtopError::Parse {
                    line: *line,
                    kind: PrmtopParseErrorKind::InvalidInt {
                        flag: flag.to_string(),
                        value: value.clone(),
                    },
                })
            })
            .collect()
    }
}

impl RecordFile for PrmtopFile {
    type Record = Topology;
    type Error = PrmtopError;

    fn read_from(reader: &mut impl BufRead) -> Result<Topology, PrmtopError> {
        let mut sections: HashMap<String, Section> = HashMap::new();
        let mut current_flag: Option<String> = None;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            if let Some(flag) = line.strip_prefix("%FLAG") {
                let flag = flag.trim();
                current_flag = match flag {
                    RESIDUE_LABEL | RESIDUE_POINTER | RADIUS_SET => {
                        sections.insert(flag.to_string(), Section::default());
                        Some(flag.to_string())
                    }
                    _ => None,
                };
                continue;
            }

            let Some(flag) = current_flag.as_deref() else {
                continue;
            };
            let Some(section) = sections.get_mut(flag) else {
                continue;
            };

            if let Some(spec) = line.strip_prefix("%FORMAT") {
                let spec = spec.trim().trim_start_matches('(').trim_end_matches(')');
                let format = spec.parse::<FortranFormat>().map_err(|_| PrmtopError::Parse {
                    line: line_num,
                    kind: PrmtopParseErrorKind::InvalidFormat(spec.to_string()),
                })?;
                section.format = Some(format);
                continue;
            }
            if line.starts_with('%') || line.trim().is_empty() {
                continue;
            }

            let format = section.format.ok_or_else(|| PrmtopError::Parse {
                line: line_num,
                kind: PrmtopParseErrorKind::MissingFormat {
                    flag: flag.to_string(),
                },
            })?;
            let fields = fixed_width_fields(&line, format.width)
                .take(format.per_line)
                .map(str::trim)
                .filter(|field| !field.is_empty())
                .map(|field| (line_num, field.to_string()));
            section.fields.extend(fields);
        }

        let labels = sections
            .get(RESIDUE_LABEL)
            .filter(|s| !s.fields.is_empty())
            .ok_or_else(|| PrmtopError::MissingRecord(RESIDUE_LABEL.into()))?;
        let pointers = sections
            .get(RESIDUE_POINTER)
            .filter(|s| !s.fields.is_empty())
            .ok_or_else(|| PrmtopError::MissingRecord(RESIDUE_POINTER.into()))?;

        if labels.format.map(|f| f.kind) != Some(FieldKind::Text) {
            return Err(PrmtopError::Inconsistency(format!(
                "{} must use a character format",
                RESIDUE_LABEL
            )));
        }
        if pointers.format.map(|f| f.kind) != Some(FieldKind::Integer) {
            return Err(PrmtopError::Inconsistency(format!(
                "{} must use an integer format",
                RESIDUE_POINTER
            )));
        }

        let pointers = Self::parse_integers(pointers, RESIDUE_POINTER)?;
        if labels.fields.len() != pointers.len() {
            return Err(PrmtopError::Inconsistency(format!(
                "{} residue labels but {} residue pointers",
                labels.fields.len(),
                pointers.len()
            )));
        }

        let residues = labels
            .fields
            .iter()
            .zip(pointers)
            .map(|((_, name), first_atom)| TopologyResidue::new(name, first_atom))
            .collect();
        let radius_set = sections.get(RADIUS_SET).and_then(|section| {
            let text: Vec<&str> = section.fields.iter().map(|(_, f)| f.as_str()).collect();
            (!text.is_empty()).then(|| text.join(" "))
        });

        Ok(Topology::new(residues, radius_set))
    }

    fn write_to(topology: &Topology, writer: &mut impl Write) -> Result<(), PrmtopError> {
        writeln!(writer, "%VERSION  VERSION_STAMP = V0001.000")?;

        if let Some(radius_set) = topology.radius_set() {
            writeln!(writer, "%FLAG {}", RADIUS_SET)?;
            writeln!(writer, "%FORMAT(1a80)")?;
            writeln!(writer, "{}", radius_set)?;
        }

        writeln!(writer, "%FLAG {}", RESIDUE_LABEL)?;
        writeln!(writer, "%FORMAT(20a4)")?;
        for chunk in topology.residues().chunks(20) {
            for residue in chunk {
                write!(writer, "{:<4}", residue.name)?;
            }
            writeln!(writer)?;
        }

        writeln!(writer, "%FLAG {}", RESIDUE_POINTER)?;
        writeln!(writer, "%FORMAT(10I8)")?;
        for chunk in topology.residues().chunks(10) {
            for residue in chunk {
                write!(writer, "{:>8}", residue.first_atom)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}
