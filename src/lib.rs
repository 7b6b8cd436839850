pub mod atom;
pub mod bond;
pub mod canonical;
pub mod composition;
pub mod container;
pub mod element;
pub mod error;
pub mod extend;
pub mod formula;
pub mod fragments;
pub mod generate;
pub mod graph_ops;
pub mod mol;
pub mod sdf;
pub mod substruct;
pub mod traits;
pub mod valence;

pub use atom::Atom;
pub use bond::{Bond, BondOrder};
pub use canonical::{canonical_form, canonical_ordering};
pub use composition::{parse_composition, Composition};
pub use element::Element;
pub use error::{CompositionError, GenerateError};
pub use formula::mol_formula;
pub use fragments::are_non_overlapping;
pub use generate::{generate, Generation, Generator};
pub use mol::Mol;
pub use sdf::{parse_sdf, parse_sdf_file, write_sdf, SdfError};
pub use substruct::{contains_fragment, has_substruct_match};
pub use traits::{HasBondOrder, HasBondOrderMut, HasElement};

/// The graph the generator works on: heavy atoms with implicit hydrogens.
pub type Molecule = Mol<Atom, Bond>;

#[cfg(test)]
mod testing_tools;
