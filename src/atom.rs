use crate::element::Element;

/// Default atom type for a molecular graph node.
///
/// Only the element is stored. Hydrogen counts are derived from the bonds
/// (see [`valence`](crate::valence)).
///
/// # Examples
///
/// ```
/// use isogen::{Atom, Element};
///
/// let carbon = Atom::new(Element::C);
/// assert_eq!(carbon.element, Element::C);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Atom {
    pub element: Element,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self { element }
    }
}

impl crate::traits::HasElement for Atom {
    fn element(&self) -> Element {
        self.element
    }
}
