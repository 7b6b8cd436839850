/// Elements the generator knows how to place.
///
/// Variants are declared in atomic-number order, so the derived `Ord`
/// sorts by atomic number. That order is also the order in which free
/// atoms are appended to the initial container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Element {
    H = 1,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    P = 15,
    S = 16,
    Cl = 17,
    Br = 35,
    I = 53,
}

const ALL: [Element; 10] = [
    Element::H,
    Element::C,
    Element::N,
    Element::O,
    Element::F,
    Element::P,
    Element::S,
    Element::Cl,
    Element::Br,
    Element::I,
];

impl Element {
    pub fn all() -> &'static [Element] {
        &ALL
    }

    pub fn from_atomic_num(n: u8) -> Option<Element> {
        ALL.iter().copied().find(|e| e.atomic_num() == n)
    }

    /// Case-sensitive lookup: `"Cl"` is chlorine, `"CL"` is nothing.
    pub fn from_symbol(s: &str) -> Option<Element> {
        ALL.iter().copied().find(|e| e.symbol() == s)
    }

    pub fn atomic_num(self) -> u8 {
        self as u8
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Element::H => "H",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::Br => "Br",
            Element::I => "I",
        }
    }

    /// Maximum total bond order a heavy atom may carry during the search.
    ///
    /// Hydrogen has no entry: hydrogens are never placed as atoms while
    /// bonds are being enumerated, they are only counted.
    pub fn nominal_valence(self) -> Option<u8> {
        match self {
            Element::H => None,
            Element::C => Some(4),
            Element::N => Some(3),
            Element::O => Some(2),
            Element::S => Some(6),
            Element::P => Some(5),
            Element::F | Element::I | Element::Cl | Element::Br => Some(1),
        }
    }

    /// Allowed valences for implicit hydrogen inference, lowest first.
    pub fn default_valences(self) -> &'static [u8] {
        match self {
            Element::H => &[1],
            Element::C => &[4],
            Element::N => &[3, 5],
            Element::O => &[2],
            Element::F | Element::Cl | Element::Br => &[1],
            Element::P => &[3, 5],
            Element::S => &[2, 4, 6],
            Element::I => &[1, 3, 5, 7],
        }
    }

    pub fn is_hydrogen(self) -> bool {
        self == Element::H
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}
