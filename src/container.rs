//! Initial search state: fixed fragments spliced together with the free
//! atoms of the composition, plus the global bounds of the search.

use petgraph::graph::NodeIndex;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::atom::Atom;
use crate::composition::Composition;
use crate::element::Element;
use crate::graph_ops::bonds_to_string;
use crate::valence::{implicit_hydrogen_count, implied_hydrogen_count};
use crate::Molecule;

/// Limits that hold for a whole generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchBounds {
    /// Total heavy-atom bonding capacity: the nominal valences of all heavy
    /// atoms minus one slot per hydrogen.
    pub max_openings: i64,
    /// Hydrogens every accepted structure must carry.
    pub target_hydrogens: u32,
}

/// Heavy-atom graph the search starts from, together with its bounds.
#[derive(Debug, Clone)]
pub struct Container {
    pub mol: Molecule,
    pub bounds: SearchBounds,
}

/// A fragment uses an atom the composition does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("fragments need more {element} atoms than the composition provides")]
pub struct MissingAtom {
    pub element: Element,
}

/// All atoms of a composition, unbonded, heavy atoms first and hydrogens
/// explicit at the end.
pub fn composition_mol(composition: &Composition) -> Molecule {
    let mut mol = Molecule::new();
    for (element, count) in composition.iter().filter(|(e, _)| !e.is_hydrogen()) {
        add_atoms(&mut mol, element, count);
    }
    add_atoms(&mut mol, Element::H, composition.hydrogens());
    mol
}

fn add_atoms(mol: &mut Molecule, element: Element, count: u32) {
    for _ in 0..count {
        mol.add_atom(Atom::new(element));
    }
}

fn copy_atom(
    fragment: &Molecule,
    idx: NodeIndex,
    index_map: &mut [Option<NodeIndex>],
    mol: &mut Molecule,
    remaining: &mut Composition,
) -> Result<NodeIndex, MissingAtom> {
    if let Some(mapped) = index_map[idx.index()] {
        return Ok(mapped);
    }
    let atom = *fragment.atom(idx);
    if !remaining.claim(atom.element) {
        return Err(MissingAtom {
            element: atom.element,
        });
    }
    let mapped = mol.add_atom(atom);
    index_map[idx.index()] = Some(mapped);
    Ok(mapped)
}

/// Build the initial container for a composition and its fragments.
///
/// Fragment atoms come first, each fragment's bonded atoms in bond order
/// followed by its unbonded ones, each claiming one atom of its element from
/// the composition. The unclaimed heavy atoms follow in atomic-number order.
/// Hydrogens are then counted into the bounds and removed: the returned
/// graph holds heavy atoms only, with the fragment bonds already in place.
pub fn restrict_container(
    composition: &Composition,
    fragments: &[Molecule],
) -> Result<Container, MissingAtom> {
    info!(%composition, "elemental composition");
    let mut remaining = composition.clone();
    let mut mol = Molecule::new();

    for fragment in fragments {
        let mut index_map = vec![None; fragment.atom_count()];
        for edge in fragment.bonds() {
            let Some((s, d)) = fragment.bond_endpoints(edge) else {
                continue;
            };
            let s = copy_atom(fragment, s, &mut index_map, &mut mol, &mut remaining)?;
            let d = copy_atom(fragment, d, &mut index_map, &mut mol, &mut remaining)?;
            mol.add_or_increment_bond(s, d, fragment.bond(edge).order);
        }
        for idx in fragment.atoms() {
            copy_atom(fragment, idx, &mut index_map, &mut mol, &mut remaining)?;
        }
    }

    for (element, count) in remaining.iter().filter(|(e, _)| !e.is_hydrogen()) {
        add_atoms(&mut mol, element, count);
    }

    let full = composition_mol(composition);
    let explicit_hydrogens = implied_hydrogen_count(&full) - implicit_hydrogen_count(&full);
    let claimed_hydrogens = composition.hydrogens() - remaining.hydrogens();
    trace!(explicit_hydrogens, claimed_hydrogens, "hydrogen count");
    add_atoms(
        &mut mol,
        Element::H,
        explicit_hydrogens.saturating_sub(claimed_hydrogens),
    );

    let mut max_openings: i64 = 0;
    let mut target_hydrogens: u32 = 0;
    for idx in mol.atoms() {
        match mol.atom(idx).element.nominal_valence() {
            Some(valence) => max_openings += i64::from(valence),
            None => {
                target_hydrogens += 1;
                max_openings -= 1;
            }
        }
    }
    let mol = mol.filter_atoms(|atom| !atom.element.is_hydrogen());

    let bounds = SearchBounds {
        max_openings,
        target_hydrogens,
    };
    debug!(
        atoms = mol.atom_count(),
        max_openings, target_hydrogens, "container restricted"
    );
    trace!(bonds = %bonds_to_string(&mol), "initial molecule");
    Ok(Container { mol, bounds })
}
