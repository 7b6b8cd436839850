use petgraph::graph::NodeIndex;

use crate::mol::Mol;
use crate::traits::{HasBondOrder, HasElement};
use crate::valence::is_nominally_saturated;

/// Atom pairs that can take one more unit of bond order.
///
/// Every pair `(i, j)` with `i < j` where neither atom has used up its
/// nominal valence, lowest pair first. Pairs already joined by a bond are
/// included; raising their order is one of the extensions.
pub fn extension_candidates<A, B>(mol: &Mol<A, B>) -> Vec<(NodeIndex, NodeIndex)>
where
    A: HasElement,
    B: HasBondOrder,
{
    let open: Vec<NodeIndex> = mol
        .atoms()
        .filter(|&idx| !is_nominally_saturated(mol, idx))
        .collect();

    let mut pairs = Vec::with_capacity(open.len() * open.len().saturating_sub(1) / 2);
    for (i, &s) in open.iter().enumerate() {
        for &d in &open[i + 1..] {
            pairs.push((s, d));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_tools::molecule;

    fn pairs(mol: &crate::Molecule) -> Vec<(usize, usize)> {
        extension_candidates(mol)
            .into_iter()
            .map(|(s, d)| (s.index(), d.index()))
            .collect()
    }

    #[test]
    fn all_pairs_of_free_atoms() {
        let mol = molecule(&["C", "C", "O"], &[]);
        assert_eq!(pairs(&mol), vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn saturated_atoms_are_skipped() {
        // The carbonyl oxygen is full; the carbon still has two slots.
        let mol = molecule(&["C", "O", "C"], &[(0, 1, 2)]);
        assert_eq!(pairs(&mol), vec![(0, 2)]);
    }

    #[test]
    fn bonded_pairs_stay_candidates() {
        let mol = molecule(&["C", "C"], &[(0, 1, 1)]);
        assert_eq!(pairs(&mol), vec![(0, 1)]);
    }

    #[test]
    fn single_atom_has_no_candidates() {
        let mol = molecule(&["C"], &[]);
        assert!(pairs(&mol).is_empty());
    }

    #[test]
    fn fully_saturated_molecule() {
        let mol = molecule(&["C", "C"], &[(0, 1, 3)]);
        assert_eq!(pairs(&mol), vec![(0, 1)]);
        let co2 = molecule(&["O", "C", "O"], &[(0, 1, 2), (1, 2, 2)]);
        assert!(pairs(&co2).is_empty());
    }

    #[test]
    fn graph_is_not_modified() {
        let mol = molecule(&["C", "N"], &[(0, 1, 1)]);
        let before = mol.clone();
        let _ = extension_candidates(&mol);
        assert_eq!(mol, before);
    }
}
