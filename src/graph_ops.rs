use std::fmt::Write;

use petgraph::graph::NodeIndex;

use crate::mol::Mol;
use crate::traits::{HasBondOrder, HasElement};

pub fn connected_components<A, B>(mol: &Mol<A, B>) -> Vec<Vec<NodeIndex>> {
    let n = mol.atom_count();
    let mut visited = vec![false; n];
    let mut components = Vec::new();
    for node in mol.atoms() {
        if visited[node.index()] {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if visited[current.index()] {
                continue;
            }
            visited[current.index()] = true;
            component.push(current);
            for neighbor in mol.neighbors(current) {
                if !visited[neighbor.index()] {
                    stack.push(neighbor);
                }
            }
        }
        component.sort();
        components.push(component);
    }
    components
}

pub fn num_components<A, B>(mol: &Mol<A, B>) -> usize {
    connected_components(mol).len()
}

/// Compact bond listing such as `C(0)-O(1)[2]C(0)-C(2)[1]`, for logs.
pub fn bonds_to_string<A, B>(mol: &Mol<A, B>) -> String
where
    A: HasElement,
    B: HasBondOrder,
{
    let mut out = String::new();
    for edge in mol.bonds() {
        let Some((a, b)) = mol.bond_endpoints(edge) else {
            continue;
        };
        let _ = write!(
            out,
            "{}({})-{}({})[{}]",
            mol.atom(a).element(),
            a.index(),
            mol.atom(b).element(),
            b.index(),
            mol.bond(edge).bond_order().as_u8(),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_tools::molecule;

    #[test]
    fn single_component() {
        let mol = molecule(&["C", "C", "O"], &[(0, 1, 1), (1, 2, 1)]);
        assert_eq!(num_components(&mol), 1);
    }

    #[test]
    fn isolated_atoms_are_components() {
        let mol = molecule(&["C", "C", "O"], &[(0, 1, 1)]);
        let comps = connected_components(&mol);
        assert_eq!(comps.len(), 2);
        assert_eq!(comps[0], vec![NodeIndex::new(0), NodeIndex::new(1)]);
        assert_eq!(comps[1], vec![NodeIndex::new(2)]);
    }

    #[test]
    fn empty_mol_has_no_components() {
        let mol = molecule(&[], &[]);
        assert_eq!(num_components(&mol), 0);
    }

    #[test]
    fn bond_listing() {
        let mol = molecule(&["C", "O", "C"], &[(0, 1, 2), (0, 2, 1)]);
        assert_eq!(bonds_to_string(&mol), "C(0)-O(1)[2]C(0)-C(2)[1]");
    }
}
