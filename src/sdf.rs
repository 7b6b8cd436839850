//! MDL V2000 molfiles and SD files.
//!
//! Only the connection table is read: the counts line, the element symbol
//! of each atom line and the first three fields of each bond line.
//! Coordinates, charges and property lines are ignored. Written records
//! carry zero coordinates and leave hydrogens implicit.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::bond::{Bond, BondOrder};
use crate::element::Element;
use crate::formula::mol_formula;
use crate::{Atom, Molecule};

const RECORD_END: &str = "$$$$";
const HEADER_LINES: usize = 3;

/// Errors from reading molfile records. `record` counts from 0, `line`
/// from 1 within the record.
#[derive(Debug, Error)]
pub enum SdfError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("record {record}: missing counts line")]
    MissingCounts { record: usize },
    #[error("record {record}: malformed counts line {text:?}")]
    BadCounts { record: usize, text: String },
    #[error("record {record}: ends before line {line}")]
    Truncated { record: usize, line: usize },
    #[error("record {record}, line {line}: unsupported element {symbol:?}")]
    UnknownElement {
        record: usize,
        line: usize,
        symbol: String,
    },
    #[error("record {record}, line {line}: malformed bond line {text:?}")]
    BadBond {
        record: usize,
        line: usize,
        text: String,
    },
    #[error("record {record}, line {line}: bond type {code} is not single, double or triple")]
    UnsupportedBondType { record: usize, line: usize, code: u8 },
    #[error("record {record}, line {line}: atom {index} out of range")]
    AtomOutOfRange {
        record: usize,
        line: usize,
        index: usize,
    },
    #[error("record {record}, line {line}: bond repeats an existing bond or joins an atom to itself")]
    InvalidBond { record: usize, line: usize },
}

/// Read every record of an SD file.
pub fn parse_sdf(input: &str) -> Result<Vec<Molecule>, SdfError> {
    split_records(input)
        .into_iter()
        .enumerate()
        .map(|(record, lines)| parse_record(record, &lines))
        .collect()
}

/// Read a single molfile.
pub fn parse_molblock(input: &str) -> Result<Molecule, SdfError> {
    let lines: Vec<&str> = input.lines().collect();
    parse_record(0, &lines)
}

pub fn parse_sdf_file(path: impl AsRef<Path>) -> Result<Vec<Molecule>, SdfError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| SdfError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_sdf(&content)
}

fn split_records(input: &str) -> Vec<Vec<&str>> {
    let mut records = Vec::new();
    let mut current = Vec::new();
    for line in input.lines() {
        if line.trim_end() == RECORD_END {
            records.push(std::mem::take(&mut current));
        } else {
            current.push(line);
        }
    }
    if current.iter().any(|line| !line.trim().is_empty()) {
        records.push(current);
    }
    records
}

fn field(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_counts(record: usize, line: &str) -> Result<(usize, usize), SdfError> {
    let fixed = (field(line, 0, 3).parse(), field(line, 3, 6).parse());
    if let (Ok(atoms), Ok(bonds)) = fixed {
        return Ok((atoms, bonds));
    }
    let mut parts = line.split_whitespace().map(str::parse::<usize>);
    match (parts.next(), parts.next()) {
        (Some(Ok(atoms)), Some(Ok(bonds))) => Ok((atoms, bonds)),
        _ => Err(SdfError::BadCounts {
            record,
            text: line.to_string(),
        }),
    }
}

fn parse_record(record: usize, lines: &[&str]) -> Result<Molecule, SdfError> {
    let counts = lines
        .get(HEADER_LINES)
        .ok_or(SdfError::MissingCounts { record })?;
    let (n_atoms, n_bonds) = parse_counts(record, counts)?;

    let line_at = |idx: usize| {
        lines.get(idx).copied().ok_or(SdfError::Truncated {
            record,
            line: idx + 1,
        })
    };

    let mut mol = Molecule::new();
    let atom_start = HEADER_LINES + 1;
    for idx in atom_start..atom_start + n_atoms {
        let line = line_at(idx)?;
        let symbol = field(line, 31, 34);
        let element = Element::from_symbol(symbol).ok_or_else(|| SdfError::UnknownElement {
            record,
            line: idx + 1,
            symbol: symbol.to_string(),
        })?;
        mol.add_atom(Atom::new(element));
    }

    let bond_start = atom_start + n_atoms;
    for idx in bond_start..bond_start + n_bonds {
        let line = line_at(idx)?;
        let bad_bond = || SdfError::BadBond {
            record,
            line: idx + 1,
            text: line.to_string(),
        };
        let a: usize = field(line, 0, 3).parse().map_err(|_| bad_bond())?;
        let b: usize = field(line, 3, 6).parse().map_err(|_| bad_bond())?;
        let code: u8 = field(line, 6, 9).parse().map_err(|_| bad_bond())?;

        let order = BondOrder::from_u8(code).ok_or(SdfError::UnsupportedBondType {
            record,
            line: idx + 1,
            code,
        })?;
        let a = atom_index(record, idx, a, n_atoms)?;
        let b = atom_index(record, idx, b, n_atoms)?;
        if a == b || mol.bond_between(a, b).is_some() {
            return Err(SdfError::InvalidBond {
                record,
                line: idx + 1,
            });
        }
        mol.add_bond(a, b, Bond::new(order));
    }
    Ok(mol)
}

fn atom_index(record: usize, idx: usize, one_based: usize, n_atoms: usize) -> Result<NodeIndex, SdfError> {
    if one_based == 0 || one_based > n_atoms {
        return Err(SdfError::AtomOutOfRange {
            record,
            line: idx + 1,
            index: one_based,
        });
    }
    Ok(NodeIndex::new(one_based - 1))
}

/// One V2000 molfile, terminated by `M  END`. The title line holds the
/// Hill formula.
pub fn to_molblock(mol: &Molecule) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", mol_formula(mol));
    let _ = writeln!(out, "  isogen");
    out.push('\n');
    let _ = writeln!(
        out,
        "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
        mol.atom_count(),
        mol.bond_count()
    );
    for idx in mol.atoms() {
        let _ = writeln!(
            out,
            "{:>10.4}{:>10.4}{:>10.4} {:<3} 0  0  0  0  0  0  0  0  0  0  0  0",
            0.0,
            0.0,
            0.0,
            mol.atom(idx).element.symbol()
        );
    }
    for edge in mol.bonds() {
        let Some((a, b)) = mol.bond_endpoints(edge) else {
            continue;
        };
        let _ = writeln!(
            out,
            "{:>3}{:>3}{:>3}  0",
            a.index() + 1,
            b.index() + 1,
            mol.bond(edge).order.as_u8()
        );
    }
    out.push_str("M  END\n");
    out
}

/// Records for every molecule, each followed by `$$$$`.
pub fn write_sdf(mols: &[Molecule]) -> String {
    let mut out = String::new();
    for mol in mols {
        out.push_str(&to_molblock(mol));
        out.push_str(RECORD_END);
        out.push('\n');
    }
    out
}
