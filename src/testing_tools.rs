use petgraph::graph::NodeIndex;

use crate::bond::{Bond, BondOrder};
use crate::element::Element;
use crate::{Atom, Molecule};

/// Build a molecule from element symbols and `(a, b, order)` bond triples.
pub fn molecule(symbols: &[&str], bonds: &[(usize, usize, u8)]) -> Molecule {
    let mut mol = Molecule::new();
    for sym in symbols {
        let element = Element::from_symbol(sym).unwrap_or_else(|| panic!("bad symbol {sym:?}"));
        mol.add_atom(Atom::new(element));
    }
    for &(a, b, order) in bonds {
        let order = BondOrder::from_u8(order).unwrap_or_else(|| panic!("bad order {order}"));
        mol.add_bond(NodeIndex::new(a), NodeIndex::new(b), Bond::new(order));
    }
    mol
}

/// Copy of `mol` with atoms reordered so that `new_order[new] = old`.
pub fn permuted(mol: &Molecule, new_order: &[usize]) -> Molecule {
    assert_eq!(new_order.len(), mol.atom_count(), "not a permutation");
    let mut old_to_new = vec![usize::MAX; new_order.len()];
    let mut out = Molecule::new();
    for (new, &old) in new_order.iter().enumerate() {
        assert_eq!(old_to_new[old], usize::MAX, "atom {old} listed twice");
        old_to_new[old] = new;
        out.add_atom(*mol.atom(NodeIndex::new(old)));
    }
    for edge in mol.bonds() {
        let (a, b) = mol.bond_endpoints(edge).unwrap();
        out.add_bond(
            NodeIndex::new(old_to_new[a.index()]),
            NodeIndex::new(old_to_new[b.index()]),
            *mol.bond(edge),
        );
    }
    out
}
