use petgraph::graph::NodeIndex;

use crate::mol::Mol;
use crate::traits::{HasBondOrder, HasElement};
use crate::Molecule;

/// Whether `query` maps into `target` atom by atom with equal elements and
/// equal bond orders on every query bond. The target may carry extra bonds.
pub fn has_substruct_match<A, B>(target: &Mol<A, B>, query: &Mol<A, B>) -> bool
where
    A: HasElement,
    B: HasBondOrder,
{
    Vf2::new(target, query).search(0)
}

/// Whether a generated structure contains `fragment` with its bond orders
/// unchanged.
///
/// Hydrogen atoms of the fragment are ignored, since generated structures
/// carry their hydrogens implicitly.
pub fn contains_fragment(target: &Molecule, fragment: &Molecule) -> bool {
    let heavy = fragment.filter_atoms(|atom| !atom.element.is_hydrogen());
    has_substruct_match(target, &heavy)
}

struct Vf2<'a, A, B> {
    target: &'a Mol<A, B>,
    query: &'a Mol<A, B>,
    query_order: Vec<NodeIndex>,
    query_map: Vec<Option<NodeIndex>>,
    target_used: Vec<bool>,
}

impl<'a, A: HasElement, B: HasBondOrder> Vf2<'a, A, B> {
    fn new(target: &'a Mol<A, B>, query: &'a Mol<A, B>) -> Self {
        let mut query_order: Vec<NodeIndex> = query.atoms().collect();
        query_order.sort_by(|&a, &b| {
            query.neighbors(b).count().cmp(&query.neighbors(a).count())
        });
        Self {
            target,
            query,
            query_order,
            query_map: vec![None; query.atom_count()],
            target_used: vec![false; target.atom_count()],
        }
    }

    fn search(&mut self, depth: usize) -> bool {
        let Some(&query_node) = self.query_order.get(depth) else {
            return true;
        };

        for t_idx in 0..self.target_used.len() {
            if self.target_used[t_idx] {
                continue;
            }
            let target_node = NodeIndex::new(t_idx);
            if !self.is_feasible(query_node, target_node) {
                continue;
            }

            self.query_map[query_node.index()] = Some(target_node);
            self.target_used[t_idx] = true;
            let found = self.search(depth + 1);
            self.query_map[query_node.index()] = None;
            self.target_used[t_idx] = false;

            if found {
                return true;
            }
        }
        false
    }

    fn is_feasible(&self, query_node: NodeIndex, target_node: NodeIndex) -> bool {
        if self.target.atom(target_node).element() != self.query.atom(query_node).element() {
            return false;
        }

        for q_neighbor in self.query.neighbors(query_node) {
            let Some(t_mapped) = self.query_map[q_neighbor.index()] else {
                continue;
            };
            let Some(q_bond) = self.query.bond_between(query_node, q_neighbor) else {
                continue;
            };
            match self.target.bond_between(target_node, t_mapped) {
                Some(t_bond) => {
                    if self.target.bond(t_bond).bond_order()
                        != self.query.bond(q_bond).bond_order()
                    {
                        return false;
                    }
                }
                None => return false,
            }
        }

        true
    }
}
