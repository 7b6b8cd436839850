//! Screening of the fixed substructures before they are merged.
//!
//! The test is deliberately coarse: it looks at element types, not atoms.
//! Two fragments that each contain a carbon are rejected even though their
//! carbons are different atoms.

use std::collections::BTreeSet;

use crate::element::Element;
use crate::error::GenerateError;
use crate::mol::Mol;
use crate::traits::HasElement;

fn element_set<A: HasElement, B>(fragment: &Mol<A, B>) -> BTreeSet<Element> {
    fragment
        .atoms()
        .map(|idx| fragment.atom(idx).element())
        .collect()
}

/// `true` when no element appears in more than one fragment.
///
/// The per-fragment element sets must add up to exactly the size of their
/// union. An empty fragment list passes.
pub fn are_non_overlapping<A: HasElement, B>(fragments: &[Mol<A, B>]) -> bool {
    shared_elements(fragments).is_empty()
}

/// Elements that occur in two or more fragments, in atomic-number order.
pub fn shared_elements<A: HasElement, B>(fragments: &[Mol<A, B>]) -> Vec<Element> {
    let mut seen = BTreeSet::new();
    let mut shared = BTreeSet::new();
    for fragment in fragments {
        for element in element_set(fragment) {
            if !seen.insert(element) {
                shared.insert(element);
            }
        }
    }
    shared.into_iter().collect()
}

/// [`are_non_overlapping`] as a `Result`, naming the offending elements.
pub fn check_non_overlapping<A: HasElement, B>(
    fragments: &[Mol<A, B>],
) -> Result<(), GenerateError> {
    let shared = shared_elements(fragments);
    if shared.is_empty() {
        Ok(())
    } else {
        Err(GenerateError::FragmentsOverlap { shared })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_tools::molecule;
    use crate::Molecule;

    #[test]
    fn no_fragments_pass() {
        let none: [Molecule; 0] = [];
        assert!(are_non_overlapping(&none));
        assert!(check_non_overlapping(&none).is_ok());
    }

    #[test]
    fn single_fragment_passes() {
        let co2 = molecule(&["C", "O", "O"], &[(0, 1, 2), (0, 2, 1)]);
        assert!(are_non_overlapping(&[co2]));
    }

    #[test]
    fn disjoint_elements_pass() {
        let carbonyl = molecule(&["C", "O"], &[(0, 1, 2)]);
        let amine = molecule(&["N"], &[]);
        let chloride = molecule(&["Cl"], &[]);
        assert!(are_non_overlapping(&[carbonyl, amine, chloride]));
    }

    #[test]
    fn distinct_carbon_atoms_still_overlap() {
        let ethyl = molecule(&["C", "C"], &[(0, 1, 1)]);
        let methoxy = molecule(&["C", "O"], &[(0, 1, 1)]);
        assert!(!are_non_overlapping(&[ethyl.clone(), methoxy.clone()]));
        assert_eq!(
            check_non_overlapping(&[ethyl, methoxy]),
            Err(GenerateError::FragmentsOverlap {
                shared: vec![Element::C]
            })
        );
    }

    #[test]
    fn shared_elements_listed_once() {
        let a = molecule(&["C", "O"], &[(0, 1, 1)]);
        let b = molecule(&["C", "O", "N"], &[(0, 1, 1), (0, 2, 1)]);
        let c = molecule(&["O"], &[]);
        assert_eq!(shared_elements(&[a, b, c]), vec![Element::C, Element::O]);
    }
}
