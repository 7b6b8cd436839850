//! Canonical labelling of molecular graphs.
//!
//! Atoms are ranked by local invariants and the ranks are refined by
//! neighbourhood until stable. Ties left after refinement are broken by
//! individualizing each tied atom in turn and refining again; every branch
//! of that search is explored and the labelling whose graph encoding is
//! lexicographically smallest wins. Two molecules therefore get the same
//! [`canonical_form`] exactly when they are isomorphic, elements and bond
//! orders included.
//!
//! The only pruning is between twin atoms: two tied atoms with identical
//! bonds to every other atom can be swapped by an automorphism, so only one
//! of them needs to be individualized. This keeps molecules with many
//! unbonded atoms of one element linear instead of factorial.

use std::fmt::Write;
use std::hash::{Hash, Hasher};

use petgraph::graph::NodeIndex;

use crate::mol::Mol;
use crate::traits::{HasBondOrder, HasElement};
use crate::valence::{implicit_hydrogens, used_valence};

struct Fnv1aHasher(u64);

impl Fnv1aHasher {
    fn new() -> Self {
        Self(0xcbf29ce484222325)
    }
}

impl Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(0x100000001b3);
        }
    }
}

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct AtomInvariant {
    atomic_num: u8,
    degree: u8,
    used_valence: u8,
    hydrogen_count: u8,
    singles: u8,
    doubles: u8,
    triples: u8,
}

fn atom_invariant<A, B>(mol: &Mol<A, B>, idx: NodeIndex) -> AtomInvariant
where
    A: HasElement,
    B: HasBondOrder,
{
    let mut orders = [0u8; 3];
    for edge in mol.bonds_of(idx) {
        orders[usize::from(mol.bond(edge).bond_order().as_u8() - 1)] += 1;
    }
    AtomInvariant {
        atomic_num: mol.atom(idx).element().atomic_num(),
        degree: mol.neighbors(idx).count() as u8,
        used_valence: used_valence(mol, idx),
        hydrogen_count: implicit_hydrogens(mol, idx),
        singles: orders[0],
        doubles: orders[1],
        triples: orders[2],
    }
}

fn hash_invariant(inv: &AtomInvariant) -> u64 {
    let mut h = Fnv1aHasher::new();
    inv.hash(&mut h);
    h.finish()
}

fn ranks_from_values(values: &[u64]) -> Vec<usize> {
    let n = values.len();
    let mut indices: Vec<usize> = (0..n).collect();
    indices.sort_by_key(|&i| values[i]);
    let mut ranks = vec![0usize; n];
    if n == 0 {
        return ranks;
    }
    ranks[indices[0]] = 0;
    for i in 1..n {
        ranks[indices[i]] = if values[indices[i]] == values[indices[i - 1]] {
            ranks[indices[i - 1]]
        } else {
            i
        };
    }
    ranks
}

fn count_distinct(ranks: &[usize]) -> usize {
    let mut sorted: Vec<usize> = ranks.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    sorted.len()
}

/// Bond order to every neighbour, per atom. Built once per molecule so
/// refinement does not walk the edge list repeatedly.
fn neighbor_table<A, B>(mol: &Mol<A, B>) -> Vec<Vec<(usize, u8)>>
where
    B: HasBondOrder,
{
    let mut table = vec![Vec::new(); mol.atom_count()];
    for edge in mol.bonds() {
        if let Some((a, b)) = mol.bond_endpoints(edge) {
            let order = mol.bond(edge).bond_order().as_u8();
            table[a.index()].push((b.index(), order));
            table[b.index()].push((a.index(), order));
        }
    }
    table
}

fn morgan_refine(neighbors: &[Vec<(usize, u8)>], ranks: &mut Vec<usize>) {
    let n = neighbors.len();
    let mut prev_distinct = count_distinct(ranks);

    loop {
        let mut new_values = vec![0u64; n];
        for (i, adjacent) in neighbors.iter().enumerate() {
            let mut neighbor_ranks: Vec<(usize, u8)> = adjacent
                .iter()
                .map(|&(nb, order)| (ranks[nb], order))
                .collect();
            neighbor_ranks.sort_unstable();

            let mut h = Fnv1aHasher::new();
            ranks[i].hash(&mut h);
            neighbor_ranks.hash(&mut h);
            new_values[i] = h.finish();
        }
        let new_ranks = ranks_from_values(&new_values);
        let distinct = count_distinct(&new_ranks);
        if distinct <= prev_distinct {
            return;
        }
        *ranks = new_ranks;
        prev_distinct = distinct;
    }
}

/// Smallest rank shared by more than one atom.
fn first_tied_rank(ranks: &[usize]) -> Option<usize> {
    let mut sorted = ranks.to_vec();
    sorted.sort_unstable();
    sorted.windows(2).find(|w| w[0] == w[1]).map(|w| w[0])
}

fn bond_order_to(neighbors: &[Vec<(usize, u8)>], from: usize, to: usize) -> u8 {
    neighbors[from]
        .iter()
        .find(|&&(nb, _)| nb == to)
        .map_or(0, |&(_, order)| order)
}

/// Whether swapping `u` and `v` maps the molecule onto itself.
fn are_twins(atomic_nums: &[u8], neighbors: &[Vec<(usize, u8)>], u: usize, v: usize) -> bool {
    if atomic_nums[u] != atomic_nums[v] || neighbors[u].len() != neighbors[v].len() {
        return false;
    }
    neighbors[u]
        .iter()
        .filter(|&&(w, _)| w != v)
        .all(|&(w, order)| bond_order_to(neighbors, v, w) == order)
}

struct LeafSearch<'a> {
    atomic_nums: Vec<u8>,
    neighbors: &'a [Vec<(usize, u8)>],
    best: Option<(Vec<u32>, Vec<usize>)>,
}

impl LeafSearch<'_> {
    fn search(&mut self, mut ranks: Vec<usize>) {
        morgan_refine(self.neighbors, &mut ranks);

        let Some(tied) = first_tied_rank(&ranks) else {
            let (key, order) = self.encode(&ranks);
            if self.best.as_ref().map_or(true, |(best, _)| key < *best) {
                self.best = Some((key, order));
            }
            return;
        };

        // TODO: prune with automorphisms found at leaves with equal keys;
        // several identical disconnected pieces still branch factorially.
        let max_rank = ranks.iter().copied().max().unwrap_or(0);
        let cell: Vec<usize> = (0..ranks.len()).filter(|&i| ranks[i] == tied).collect();
        let mut tried: Vec<usize> = Vec::new();
        for &candidate in &cell {
            if tried
                .iter()
                .any(|&t| are_twins(&self.atomic_nums, self.neighbors, t, candidate))
            {
                continue;
            }
            tried.push(candidate);
            let mut trial = ranks.clone();
            trial[candidate] = max_rank + 1;
            self.search(trial);
        }
    }

    /// Encode the molecule under a discrete ranking: atom count, elements
    /// in rank order, then sorted `(lo, hi, order)` bond triples.
    fn encode(&self, ranks: &[usize]) -> (Vec<u32>, Vec<usize>) {
        let n = ranks.len();
        let mut by_rank: Vec<usize> = (0..n).collect();
        by_rank.sort_by_key(|&i| ranks[i]);
        let mut position = vec![0usize; n];
        for (pos, &atom) in by_rank.iter().enumerate() {
            position[atom] = pos;
        }

        let mut key: Vec<u32> = Vec::with_capacity(1 + n + 3 * n);
        key.push(n as u32);
        key.extend(by_rank.iter().map(|&atom| u32::from(self.atomic_nums[atom])));

        let mut bonds: Vec<(u32, u32, u32)> = Vec::new();
        for (a, adjacent) in self.neighbors.iter().enumerate() {
            for &(b, order) in adjacent {
                let (pa, pb) = (position[a], position[b]);
                if pa < pb {
                    bonds.push((pa as u32, pb as u32, u32::from(order)));
                }
            }
        }
        bonds.sort_unstable();
        for (lo, hi, order) in bonds {
            key.extend([lo, hi, order]);
        }
        (key, position)
    }
}

fn best_labelling<A, B>(mol: &Mol<A, B>) -> Option<(Vec<u32>, Vec<usize>)>
where
    A: HasElement,
    B: HasBondOrder,
{
    let n = mol.atom_count();
    if n == 0 {
        return None;
    }
    let neighbors = neighbor_table(mol);
    let initial_values: Vec<u64> = (0..n)
        .map(|i| hash_invariant(&atom_invariant(mol, NodeIndex::new(i))))
        .collect();

    let mut search = LeafSearch {
        atomic_nums: mol.atoms().map(|i| mol.atom(i).element().atomic_num()).collect(),
        neighbors: &neighbors,
        best: None,
    };
    search.search(ranks_from_values(&initial_values));
    search.best
}

/// Canonical position of every atom: `result[atom] = position`.
///
/// The positions form a permutation of `0..atom_count()`; isomorphic
/// molecules place corresponding atoms at the same positions, up to
/// automorphism.
pub fn canonical_ordering<A, B>(mol: &Mol<A, B>) -> Vec<usize>
where
    A: HasElement,
    B: HasBondOrder,
{
    best_labelling(mol).map(|(_, order)| order).unwrap_or_default()
}

/// Isomorphism-invariant string for a molecule.
///
/// The string lists the element symbols in canonical order, then each bond
/// as `lo-hi:order` over canonical positions, e.g. `C,C,O|0-2:1,1-2:2`.
pub fn canonical_form<A, B>(mol: &Mol<A, B>) -> String
where
    A: HasElement,
    B: HasBondOrder,
{
    let Some((_, position)) = best_labelling(mol) else {
        return String::from("|");
    };
    let n = position.len();
    let mut by_position = vec![0usize; n];
    for (atom, &pos) in position.iter().enumerate() {
        by_position[pos] = atom;
    }

    let symbols: Vec<&str> = by_position
        .iter()
        .map(|&atom| mol.atom(NodeIndex::new(atom)).element().symbol())
        .collect();

    let mut bonds: Vec<(usize, usize, u8)> = mol
        .bonds()
        .filter_map(|edge| {
            let (a, b) = mol.bond_endpoints(edge)?;
            let (pa, pb) = (position[a.index()], position[b.index()]);
            Some((pa.min(pb), pa.max(pb), mol.bond(edge).bond_order().as_u8()))
        })
        .collect();
    bonds.sort_unstable();

    let mut out = symbols.join(",");
    out.push('|');
    for (i, (lo, hi, order)) in bonds.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{lo}-{hi}:{order}");
    }
    out
}
