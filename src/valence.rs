//! Valence bookkeeping and default hydrogen inference.
//!
//! Hydrogens are never explicit during generation. How many a heavy atom
//! carries follows from its element and the bond order it already uses:
//! the atom takes the smallest allowed valence that fits
//! ([`true_valence`]) and the difference is filled with implicit hydrogens.

use petgraph::graph::NodeIndex;
use thiserror::Error;

use crate::element::Element;
use crate::mol::Mol;
use crate::traits::{HasBondOrder, HasElement};

/// A heavy atom bonded beyond its nominal valence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("atom {} ({element}): bond order {used_valence} exceeds valence {nominal_valence}", .atom_idx.index())]
pub struct ValenceError {
    pub atom_idx: NodeIndex,
    pub element: Element,
    pub used_valence: u8,
    pub nominal_valence: u8,
}

/// Sum of the orders of all bonds incident to `atom`.
pub fn used_valence<A, B>(mol: &Mol<A, B>, atom: NodeIndex) -> u8
where
    B: HasBondOrder,
{
    mol.bonds_of(atom)
        .map(|ei| mol.bond(ei).bond_order().as_u8())
        .sum()
}

/// Sum of all bond orders in the molecule, each bond counted once.
pub fn total_bond_order<A, B>(mol: &Mol<A, B>) -> u32
where
    B: HasBondOrder,
{
    mol.bonds()
        .map(|ei| u32::from(mol.bond(ei).bond_order().as_u8()))
        .sum()
}

/// Valence the atom settles on under default valence inference.
///
/// This is the smallest allowed valence of the element that can hold the
/// bonds already present. An atom bonded beyond every allowed valence
/// reports its used valence unchanged.
pub fn true_valence<A, B>(mol: &Mol<A, B>, atom: NodeIndex) -> u8
where
    A: HasElement,
    B: HasBondOrder,
{
    let used = used_valence(mol, atom);
    mol.atom(atom)
        .element()
        .default_valences()
        .iter()
        .copied()
        .find(|&v| v >= used)
        .unwrap_or(used)
}

pub fn implicit_hydrogens<A, B>(mol: &Mol<A, B>, atom: NodeIndex) -> u8
where
    A: HasElement,
    B: HasBondOrder,
{
    true_valence(mol, atom) - used_valence(mol, atom)
}

/// Implicit hydrogens summed over every atom, explicit hydrogen atoms
/// included (an unbonded hydrogen atom implies one more).
pub fn implicit_hydrogen_count<A, B>(mol: &Mol<A, B>) -> u32
where
    A: HasElement,
    B: HasBondOrder,
{
    mol.atoms()
        .map(|idx| u32::from(implicit_hydrogens(mol, idx)))
        .sum()
}

/// Every hydrogen the molecule carries: explicit hydrogen atoms plus the
/// implicit ones.
pub fn implied_hydrogen_count<A, B>(mol: &Mol<A, B>) -> u32
where
    A: HasElement,
    B: HasBondOrder,
{
    let explicit = mol
        .atoms()
        .filter(|&idx| mol.atom(idx).element().is_hydrogen())
        .count() as u32;
    explicit + implicit_hydrogen_count(mol)
}

/// Whether the free valence left on the atoms is exactly `hydrogens`.
///
/// Free valence is measured against [`true_valence`], not the nominal
/// table, so an atom that was pushed into a higher valence state is
/// accounted for with the hydrogens that state implies.
pub fn is_saturated<A, B>(mol: &Mol<A, B>, hydrogens: u32) -> bool
where
    A: HasElement,
    B: HasBondOrder,
{
    let vacant: i64 = mol
        .atoms()
        .map(|idx| i64::from(true_valence(mol, idx)) - i64::from(used_valence(mol, idx)))
        .sum();
    vacant == i64::from(hydrogens)
}

/// Whether `atom` uses its full nominal valence. Atoms without a table
/// entry are always saturated.
pub fn is_nominally_saturated<A, B>(mol: &Mol<A, B>, atom: NodeIndex) -> bool
where
    A: HasElement,
    B: HasBondOrder,
{
    match mol.atom(atom).element().nominal_valence() {
        Some(v) => used_valence(mol, atom) >= v,
        None => true,
    }
}

/// Report every heavy atom bonded beyond its nominal valence.
pub fn check_valence<A, B>(mol: &Mol<A, B>) -> Result<(), Vec<ValenceError>>
where
    A: HasElement,
    B: HasBondOrder,
{
    let errors: Vec<ValenceError> = mol
        .atoms()
        .filter_map(|idx| {
            let element = mol.atom(idx).element();
            let nominal = element.nominal_valence()?;
            let used = used_valence(mol, idx);
            if used <= nominal {
                return None;
            }
            Some(ValenceError {
                atom_idx: idx,
                element,
                used_valence: used,
                nominal_valence: nominal,
            })
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
