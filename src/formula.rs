//! Molecular formula of a structure with implicit hydrogens.

use std::collections::BTreeMap;

use crate::mol::Mol;
use crate::traits::{HasBondOrder, HasElement};
use crate::valence::implicit_hydrogens;

/// Hydrogens a structure carries: explicit hydrogen atoms plus the implicit
/// hydrogens of its heavy atoms.
pub fn hydrogen_count<A, B>(mol: &Mol<A, B>) -> u32
where
    A: HasElement,
    B: HasBondOrder,
{
    mol.atoms()
        .map(|idx| {
            if mol.atom(idx).element().is_hydrogen() {
                1
            } else {
                u32::from(implicit_hydrogens(mol, idx))
            }
        })
        .sum()
}

/// Compute the molecular formula as a Hill system string.
///
/// C first, then H, then the remaining elements alphabetically. Without
/// carbon every element, hydrogen included, is alphabetical. Counts of one
/// are omitted.
pub fn mol_formula<A, B>(mol: &Mol<A, B>) -> String
where
    A: HasElement,
    B: HasBondOrder,
{
    let mut counts: BTreeMap<&'static str, u32> = BTreeMap::new();
    for idx in mol.atoms() {
        let element = mol.atom(idx).element();
        if !element.is_hydrogen() {
            *counts.entry(element.symbol()).or_default() += 1;
        }
    }
    let hydrogens = hydrogen_count(mol);
    if hydrogens > 0 {
        *counts.entry("H").or_default() += hydrogens;
    }

    let mut result = String::new();
    if let Some(c) = counts.remove("C") {
        append_element(&mut result, "C", c);
        if let Some(h) = counts.remove("H") {
            append_element(&mut result, "H", h);
        }
    }
    for (sym, count) in &counts {
        append_element(&mut result, sym, *count);
    }
    result
}

fn append_element(buf: &mut String, symbol: &str, count: u32) {
    buf.push_str(symbol);
    if count > 1 {
        buf.push_str(&count.to_string());
    }
}
