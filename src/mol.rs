use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

use crate::bond::BondOrder;
use crate::traits::HasBondOrderMut;

/// Molecular graph: atoms are nodes, bonds are edges.
///
/// Atom indices are dense (`0..atom_count()`) and stable as long as no atom
/// is removed; the only way to drop atoms is [`Mol::filter_atoms`], which
/// builds a fresh graph. At most one edge joins any pair of atoms, its
/// payload carrying the accumulated bond order.
pub struct Mol<A, B> {
    graph: UnGraph<A, B>,
}

impl<A, B> Mol<A, B> {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::default(),
        }
    }

    pub fn graph(&self) -> &UnGraph<A, B> {
        &self.graph
    }

    pub fn atom(&self, idx: NodeIndex) -> &A {
        &self.graph[idx]
    }

    pub fn atom_mut(&mut self, idx: NodeIndex) -> &mut A {
        &mut self.graph[idx]
    }

    pub fn bond(&self, idx: EdgeIndex) -> &B {
        &self.graph[idx]
    }

    pub fn bond_mut(&mut self, idx: EdgeIndex) -> &mut B {
        &mut self.graph[idx]
    }

    pub fn add_atom(&mut self, atom: A) -> NodeIndex {
        self.graph.add_node(atom)
    }

    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: B) -> EdgeIndex {
        debug_assert_ne!(a, b, "self-bond on atom {}", a.index());
        debug_assert!(self.bond_between(a, b).is_none(), "duplicate bond");
        self.graph.add_edge(a, b, bond)
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    pub fn bonds_of(&self, idx: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edges(idx).map(|e| e.id())
    }

    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn bonds(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    pub fn bond_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    /// Copy of this molecule keeping only the atoms `keep` accepts.
    ///
    /// Surviving atoms keep their relative order and are renumbered
    /// densely; bonds touching a dropped atom are dropped with it.
    pub fn filter_atoms(&self, keep: impl Fn(&A) -> bool) -> Mol<A, B>
    where
        A: Clone,
        B: Clone,
    {
        let mut result = Mol::new();
        let mut index_map: Vec<Option<NodeIndex>> = vec![None; self.atom_count()];
        for idx in self.atoms() {
            let atom = self.atom(idx);
            if keep(atom) {
                index_map[idx.index()] = Some(result.add_atom(atom.clone()));
            }
        }
        for edge in self.bonds() {
            let Some((a, b)) = self.bond_endpoints(edge) else {
                continue;
            };
            if let (Some(na), Some(nb)) = (index_map[a.index()], index_map[b.index()]) {
                result.add_bond(na, nb, self.bond(edge).clone());
            }
        }
        result
    }
}

impl<A, B: HasBondOrderMut + Default> Mol<A, B> {
    /// Add `order` units of bond order between `a` and `b`.
    ///
    /// Creates the bond if the pair is unbonded, otherwise raises the
    /// existing order. The result never exceeds a triple bond.
    pub fn add_or_increment_bond(&mut self, a: NodeIndex, b: NodeIndex, order: BondOrder) {
        match self.bond_between(a, b) {
            Some(edge) => {
                let current = self.bond(edge).bond_order().as_u8();
                let summed = (current + order.as_u8()).min(3);
                if let Some(new_order) = BondOrder::from_u8(summed) {
                    *self.bond_mut(edge).bond_order_mut() = new_order;
                }
            }
            None => {
                let mut bond = B::default();
                *bond.bond_order_mut() = order;
                self.add_bond(a, b, bond);
            }
        }
    }

    /// One more unit of bond order between `a` and `b`.
    ///
    /// Returns `false` when the pair already carries a triple bond, in
    /// which case the molecule is left unchanged.
    pub fn increment_bond(&mut self, a: NodeIndex, b: NodeIndex) -> bool {
        match self.bond_between(a, b) {
            Some(edge) => match self.bond(edge).bond_order().increment() {
                Some(next) => {
                    *self.bond_mut(edge).bond_order_mut() = next;
                    true
                }
                None => false,
            },
            None => {
                self.add_bond(a, b, B::default());
                true
            }
        }
    }
}

impl<A: Clone, B: Clone> Clone for Mol<A, B> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
        }
    }
}

impl<A, B> Default for Mol<A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: PartialEq, B: PartialEq> PartialEq for Mol<A, B> {
    fn eq(&self, other: &Self) -> bool {
        if self.atom_count() != other.atom_count() || self.bond_count() != other.bond_count() {
            return false;
        }
        for idx in self.atoms() {
            if self.atom(idx) != other.atom(idx) {
                return false;
            }
        }
        for idx in self.bonds() {
            if self.bond(idx) != other.bond(idx) {
                return false;
            }
            if self.bond_endpoints(idx) != other.bond_endpoints(idx) {
                return false;
            }
        }
        true
    }
}

impl<A: std::fmt::Debug, B: std::fmt::Debug> std::fmt::Debug for Mol<A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mol")
            .field("atom_count", &self.atom_count())
            .field("bond_count", &self.bond_count())
            .finish()
    }
}
