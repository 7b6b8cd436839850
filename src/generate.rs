//! Exhaustive structure generation.
//!
//! The search starts from the heavy-atom container and adds one unit of
//! bond order at a time. Every intermediate graph is reduced to its
//! canonical form and expanded only the first time that form is seen, so
//! isomorphic states reached along different paths are explored once. A
//! graph whose free valence matches the hydrogen count of the composition
//! is complete; complete graphs that are connected are the results.

use std::collections::HashSet;

use tracing::{debug, info, trace, warn};

use crate::canonical::canonical_form;
use crate::composition::{parse_composition, Composition};
use crate::container::{restrict_container, Container, SearchBounds};
use crate::error::GenerateError;
use crate::extend::extension_candidates;
use crate::formula::mol_formula;
use crate::fragments::check_non_overlapping;
use crate::graph_ops::{bonds_to_string, num_components};
use crate::valence::{implied_hydrogen_count, is_saturated, total_bond_order};
use crate::Molecule;

/// Outcome of one generation call.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    /// Accepted structures in discovery order, pairwise non-isomorphic.
    pub molecules: Vec<Molecule>,
    /// Search states visited, the root included.
    pub nodes_visited: usize,
    /// Set when the node limit stopped the search early; `molecules` is
    /// then a subset of the full answer.
    pub truncated: bool,
}

/// Configurable entry point. [`generate`] is the unconfigured shorthand.
///
/// ```
/// use isogen::Generator;
///
/// let generation = Generator::new().run("C3H6", &[]).unwrap();
/// assert_eq!(generation.molecules.len(), 2);
/// assert!(!generation.truncated);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Generator {
    node_limit: Option<usize>,
}

impl Generator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop after visiting this many search states. `None` searches
    /// exhaustively.
    pub fn node_limit(mut self, limit: Option<usize>) -> Self {
        self.node_limit = limit;
        self
    }

    pub fn run(&self, composition: &str, fragments: &[Molecule]) -> Result<Generation, GenerateError> {
        let composition = parse_composition(composition)?;
        self.run_composition(&composition, fragments)
    }

    pub fn run_composition(
        &self,
        composition: &Composition,
        fragments: &[Molecule],
    ) -> Result<Generation, GenerateError> {
        check_non_overlapping(fragments)?;

        let Container { mol, bounds } = match restrict_container(composition, fragments) {
            Ok(container) => container,
            Err(missing) => {
                warn!(%composition, %missing, "fragments cannot be embedded");
                return Ok(Generation::default());
            }
        };
        info!(
            max_openings = bounds.max_openings,
            target_hydrogens = bounds.target_hydrogens,
            "search bounds"
        );

        let mut search = Search {
            bounds,
            node_limit: self.node_limit,
            accepted: Vec::new(),
            nodes_visited: 0,
            truncated: false,
        };
        let mut memo = HashSet::new();
        search.visit(&mol, false, &mut memo);

        if search.truncated {
            warn!(
                limit = self.node_limit,
                found = search.accepted.len(),
                "node limit reached, result is incomplete"
            );
        }
        info!(
            %composition,
            molecules = search.accepted.len(),
            nodes = search.nodes_visited,
            canonical_forms = memo.len(),
            "generation finished"
        );
        Ok(Generation {
            molecules: search.accepted,
            nodes_visited: search.nodes_visited,
            truncated: search.truncated,
        })
    }
}

/// Every structure with the given composition that contains all
/// `fragments`.
///
/// Fragments must not share an element type. The result holds one molecule
/// per isomorphism class, hydrogens implicit.
///
/// ```
/// let propenes = isogen::generate("C3H6", &[]).unwrap();
/// assert_eq!(propenes.len(), 2);
/// ```
pub fn generate(composition: &str, fragments: &[Molecule]) -> Result<Vec<Molecule>, GenerateError> {
    Generator::new()
        .run(composition, fragments)
        .map(|generation| generation.molecules)
}

struct Search {
    bounds: SearchBounds,
    node_limit: Option<usize>,
    accepted: Vec<Molecule>,
    nodes_visited: usize,
    truncated: bool,
}

impl Search {
    fn visit(&mut self, mol: &Molecule, extra_atoms: bool, memo: &mut HashSet<String>) {
        if self.node_limit.is_some_and(|limit| self.nodes_visited >= limit) {
            self.truncated = true;
            return;
        }
        self.nodes_visited += 1;
        trace!(extra_atoms, bonds = %bonds_to_string(mol), "visit");

        let implied = implied_hydrogen_count(mol);
        let complete = implied == self.bounds.target_hydrogens && is_saturated(mol, implied);

        if complete && !extra_atoms {
            if num_components(mol) == 1 {
                debug!(
                    formula = %mol_formula(mol),
                    bonds = %bonds_to_string(mol),
                    "accepted"
                );
                self.accepted.push(mol.clone());
            }
            let used_capacity = 2 * i64::from(total_bond_order(mol));
            if self.bounds.max_openings > used_capacity {
                self.visit(mol, true, memo);
            }
            return;
        }

        for (s, d) in extension_candidates(mol) {
            let mut extension = mol.clone();
            extension.increment_bond(s, d);
            if memo.insert(canonical_form(&extension)) {
                self.visit(&extension, false, memo);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;
    use crate::error::CompositionError;
    use crate::testing_tools::molecule;
    use crate::valence::true_valence;

    #[test]
    fn propene_and_cyclopropane() {
        let mols = generate("C3H6", &[]).unwrap();
        assert_eq!(mols.len(), 2);
        let rings = mols.iter().filter(|m| m.bond_count() == 3).count();
        assert_eq!(rings, 1);
    }

    #[test]
    fn methane() {
        let mols = generate("C1H4", &[]).unwrap();
        assert_eq!(mols.len(), 1);
        assert_eq!(mols[0].atom_count(), 1);
    }

    #[test]
    fn lone_carbon_without_hydrogen() {
        assert!(generate("C1", &[]).unwrap().is_empty());
    }

    #[test]
    fn odd_valence_sum_without_hydrogen() {
        assert!(generate("C1N1", &[]).unwrap().is_empty());
        assert!(generate("C2N1", &[]).unwrap().is_empty());
    }

    #[test]
    fn hydrogen_cyanide() {
        let mols = generate("C1H1N1", &[]).unwrap();
        assert_eq!(mols.len(), 1);
        let e = mols[0].bonds().next().unwrap();
        assert_eq!(mols[0].bond(e).order.as_u8(), 3);
    }

    #[test]
    fn ethanol_and_dimethyl_ether() {
        assert_eq!(generate("C2H6O1", &[]).unwrap().len(), 2);
    }

    #[test]
    fn butane_isomers() {
        assert_eq!(generate("C4H10", &[]).unwrap().len(), 2);
    }

    #[test]
    fn butene_skeletons() {
        // but-1-ene, but-2-ene, isobutene, cyclobutane, methylcyclopropane
        assert_eq!(generate("C4H8", &[]).unwrap().len(), 5);
    }

    fn sulfur_valences(mols: &[Molecule]) -> Vec<u8> {
        mols.iter()
            .flat_map(|mol| {
                mol.atoms()
                    .filter(|&idx| mol.atom(idx).element == Element::S)
                    .map(|idx| true_valence(mol, idx))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    #[test]
    fn hypervalent_sulfur_reached_after_acceptance() {
        // Ethanethiol and dimethyl sulfide are complete with bonding
        // capacity left over; the search goes on from them and finds the
        // structure with tetravalent sulfur.
        let mols = generate("C2H6S1", &[]).unwrap();
        assert_eq!(mols.len(), 3);
        let mut valences = sulfur_valences(&mols);
        valences.sort_unstable();
        assert_eq!(valences, vec![2, 2, 4]);
        for mol in &mols {
            assert_eq!(mol_formula(mol), "C2H6S");
        }
    }

    #[test]
    fn propyl_sulfur_isomers() {
        let mols = generate("C3H8S1", &[]).unwrap();
        assert_eq!(mols.len(), 9);
        let hypervalent = sulfur_valences(&mols).iter().filter(|&&v| v > 2).count();
        assert_eq!(hypervalent, 6);
    }

    #[test]
    fn malformed_composition() {
        assert_eq!(
            generate("C6H", &[]).unwrap_err(),
            GenerateError::MalformedComposition(CompositionError::CountMismatch {
                symbols: 2,
                counts: 1
            })
        );
    }

    #[test]
    fn overlapping_fragments_rejected_before_search() {
        let a = molecule(&["C", "O"], &[(0, 1, 2)]);
        let b = molecule(&["C", "N"], &[(0, 1, 1)]);
        assert!(matches!(
            generate("C2H5N1O1", &[a, b]),
            Err(GenerateError::FragmentsOverlap { .. })
        ));
    }

    #[test]
    fn infeasible_fragment_gives_nothing() {
        let nitrile = molecule(&["C", "N"], &[(0, 1, 3)]);
        let generation = Generator::new().run("C2H6O1", &[nitrile]).unwrap();
        assert!(generation.molecules.is_empty());
        assert_eq!(generation.nodes_visited, 0);
    }

    #[test]
    fn node_limit_truncates() {
        let full = Generator::new().run("C4H8", &[]).unwrap();
        assert!(!full.truncated);
        let partial = Generator::new()
            .node_limit(Some(3))
            .run("C4H8", &[])
            .unwrap();
        assert!(partial.truncated);
        assert_eq!(partial.nodes_visited, 3);
        assert!(partial.molecules.len() < full.molecules.len());
    }

    #[test]
    fn deterministic() {
        let a: Vec<String> = generate("C3H4O1", &[])
            .unwrap()
            .iter()
            .map(canonical_form)
            .collect();
        let b: Vec<String> = generate("C3H4O1", &[])
            .unwrap()
            .iter()
            .map(canonical_form)
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn fragment_bonds_survive() {
        let carbonyl = molecule(&["C", "O"], &[(0, 1, 2)]);
        let mols = generate("C2H4O1", &[carbonyl]).unwrap();
        // acetaldehyde and ethenol have C=O only in the former; oxirane none.
        assert_eq!(mols.len(), 1);
        assert_eq!(mol_formula(&mols[0]), "C2H4O");
    }
}
