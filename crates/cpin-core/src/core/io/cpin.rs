use super::namelist::{format_real, quote, split_assignment, split_items, unquote, wrap_tokens};
use crate::core::io::traits::RecordFile;
use crate::core::models::record::{CpinRecord, OffsetEntry, ResidueLabel};
use std::collections::BTreeMap;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

const NAMELIST_HEADER: &str = "&CNSTPH";
const NAMELIST_TERMINATOR: &str = "/";
const SYSTEM_PREFIX: &str = "System: ";
const RESIDUE_PREFIX: &str = "Residue: ";

#[derive(Debug, Error)]
pub enum CpinError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Missing '&CNSTPH' namelist header")]
    MissingHeader,
    #[error("Namelist is not terminated by '/'")]
    Unterminated,
    #[error("Value '{0}' does not belong to any field")]
    DanglingValue(String),
    #[error("Invalid value '{value}' for field {field}")]
    InvalidValue { field: String, value: String },
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("Inconsistent data: {0}")]
    Inconsistency(String),
}

/// Serializes a record into the text of a `&CNSTPH` namelist.
///
/// Every field except `TRESCNT` is wrapped at 80 columns.
pub fn encode(record: &CpinRecord) -> String {
    let mut lines = vec![NAMELIST_HEADER.to_string()];

    lines.extend(wrap_tokens(
        " CHRGDAT=",
        record.charges.iter().map(|&q| format!("{},", format_real(q))),
    ));
    lines.extend(wrap_tokens(
        " PROTCNT=",
        record.proton_counts.iter().map(|p| format!("{},", p)),
    ));
    lines.extend(wrap_tokens(
        &format!(
            " RESNAME={},",
            quote(&format!("{}{}", SYSTEM_PREFIX, record.system_name))
        ),
        record.residues.iter().map(|r| {
            format!(
                "{},",
                quote(&format!("{}{} {}", RESIDUE_PREFIX, r.name, r.number))
            )
        }),
    ));
    lines.extend(wrap_tokens(
        " RESSTATE=",
        record.initial_states.iter().map(|s| format!("{},", s)),
    ));
    lines.extend(wrap_tokens(
        " ",
        record
            .offsets
            .iter()
            .enumerate()
            .flat_map(|(i, entry)| stateinf_tokens(i, entry)),
    ));
    lines.extend(wrap_tokens(
        " STATENE=",
        record.energies.iter().map(|&e| format!("{},", format_real(e))),
    ));
    lines.push(format!(" TRESCNT={},", record.residue_count()));
    lines.push(NAMELIST_TERMINATOR.to_string());

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn stateinf_tokens(index: usize, entry: &OffsetEntry) -> [String; 5] {
    [
        ("FIRST_ATOM", entry.first_atom),
        ("FIRST_CHARGE", entry.first_charge),
        ("FIRST_STATE", entry.first_state),
        ("NUM_ATOMS", entry.num_atoms),
        ("NUM_STATES", entry.num_states),
    ]
    .map(|(field, value)| format!("STATEINF({})%{}={}, ", index, field, value))
}

/// Field values of a namelist, keyed by upper-cased field name.
type FieldMap = BTreeMap<String, Vec<String>>;

fn namelist_body(text: &str) -> Result<String, CpinError> {
    let mut lines = text.lines();
    let first = lines
        .by_ref()
        .find_map(|line| {
            let trimmed = line.trim_start();
            trimmed
                .get(..NAMELIST_HEADER.len())
                .filter(|head| head.eq_ignore_ascii_case(NAMELIST_HEADER))
                .map(|_| &trimmed[NAMELIST_HEADER.len()..])
        })
        .ok_or(CpinError::MissingHeader)?;

    let mut body = vec![first];
    for line in lines {
        if line.trim() == NAMELIST_TERMINATOR {
            return Ok(body.join("\n"));
        }
        body.push(line);
    }
    Err(CpinError::Unterminated)
}

fn collect_fields(body: &str) -> Result<FieldMap, CpinError> {
    let mut fields = FieldMap::new();
    let mut current: Option<String> = None;
    for item in split_items(body) {
        let value = match split_assignment(item) {
            Some((key, value)) => {
                let key = key.to_ascii_uppercase();
                fields.entry(key.clone()).or_default();
                current = Some(key);
                value
            }
            None => item,
        };
        let key = current
            .as_ref()
            .ok_or_else(|| CpinError::DanglingValue(item.to_string()))?;
        if !value.is_empty() {
            if let Some(values) = fields.get_mut(key) {
                values.push(value.to_string());
            }
        }
    }
    Ok(fields)
}

fn parse_values<T: FromStr>(fields: &FieldMap, field: &str) -> Result<Vec<T>, CpinError> {
    fields
        .get(field)
        .ok_or_else(|| CpinError::MissingField(field.to_string()))?
        .iter()
        .map(|value| {
            value.parse().map_err(|_| CpinError::InvalidValue {
                field: field.to_string(),
                value: value.clone(),
            })
        })
        .collect()
}

fn parse_single<T: FromStr>(fields: &FieldMap, field: &str) -> Result<T, CpinError> {
    let mut values = parse_values(fields, field)?;
    match values.len() {
        1 => Ok(values.remove(0)),
        n => Err(CpinError::Inconsistency(format!(
            "{} expects exactly one value, found {}",
            field, n
        ))),
    }
}

fn parse_residue_label(value: &str) -> Option<ResidueLabel> {
    let label = unquote(value);
    let label = label.strip_prefix(RESIDUE_PREFIX)?;
    let (name, number) = label.trim().rsplit_once(' ')?;
    Some(ResidueLabel::new(name.trim(), number.parse().ok()?))
}

fn parse_resname(fields: &FieldMap) -> Result<(String, Vec<ResidueLabel>), CpinError> {
    let values = fields
        .get("RESNAME")
        .ok_or_else(|| CpinError::MissingField("RESNAME".into()))?;
    let (system, residues) = values
        .split_first()
        .ok_or_else(|| CpinError::MissingField("RESNAME system label".into()))?;
    let system_name = unquote(system)
        .strip_prefix(SYSTEM_PREFIX)
        .ok_or_else(|| CpinError::InvalidValue {
            field: "RESNAME".into(),
            value: system.clone(),
        })?
        .to_string();
    let residues = residues
        .iter()
        .map(|value| {
            parse_residue_label(value).ok_or_else(|| CpinError::InvalidValue {
                field: "RESNAME".into(),
                value: value.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((system_name, residues))
}

fn parse_stateinf(fields: &FieldMap, count: usize) -> Result<Vec<OffsetEntry>, CpinError> {
    (0..count)
        .map(|i| -> Result<OffsetEntry, CpinError> {
            let get = |name: &str| {
                parse_single::<usize>(fields, &format!("STATEINF({})%{}", i, name))
            };
            Ok(OffsetEntry {
                first_atom: get("FIRST_ATOM")?,
                first_charge: get("FIRST_CHARGE")?,
                first_state: get("FIRST_STATE")?,
                num_atoms: get("NUM_ATOMS")?,
                num_states: get("NUM_STATES")?,
            })
        })
        .collect()
}

/// Parses the text of a `&CNSTPH` namelist back into a record.
///
/// Line wrapping is irrelevant to the parser. Fields it does not know are
/// skipped.
pub fn decode(text: &str) -> Result<CpinRecord, CpinError> {
    let body = namelist_body(text)?;
    let fields = collect_fields(&body)?;

    let residue_count: usize = parse_single(&fields, "TRESCNT")?;
    let (system_name, residues) = parse_resname(&fields)?;
    let initial_states: Vec<usize> = parse_values(&fields, "RESSTATE")?;

    if residues.len() != residue_count || initial_states.len() != residue_count {
        return Err(CpinError::Inconsistency(format!(
            "TRESCNT={} but {} residue labels and {} initial states",
            residue_count,
            residues.len(),
            initial_states.len()
        )));
    }
    let stateinf_groups = fields
        .keys()
        .filter(|key| key.starts_with("STATEINF(") && key.ends_with("%FIRST_ATOM"))
        .count();
    if stateinf_groups != residue_count {
        return Err(CpinError::Inconsistency(format!(
            "TRESCNT={} but {} STATEINF groups",
            residue_count, stateinf_groups
        )));
    }

    let record = CpinRecord {
        system_name,
        residues,
        charges: parse_values(&fields, "CHRGDAT")?,
        proton_counts: parse_values(&fields, "PROTCNT")?,
        energies: parse_values(&fields, "STATENE")?,
        offsets: parse_stateinf(&fields, residue_count)?,
        initial_states,
    };

    if record.proton_counts.len() != record.energies.len() {
        return Err(CpinError::Inconsistency(format!(
            "{} proton counts but {} state energies",
            record.proton_counts.len(),
            record.energies.len()
        )));
    }
    debug!(
        residues = record.residue_count(),
        states = record.state_count(),
        "Decoded cpin namelist."
    );
    Ok(record)
}

/// Reader and writer for constant-pH input (cpin) files.
pub struct CpinFile;

impl RecordFile for CpinFile {
    type Record = CpinRecord;
    type Error = CpinError;

    fn read_from(reader: &mut impl BufRead) -> Result<CpinRecord, CpinError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        decode(&text)
    }

    fn write_to(record: &CpinRecord, writer: &mut impl Write) -> Result<(), CpinError> {
        writer.write_all(encode(record).as_bytes())?;
        Ok(())
    }
}
