//! Elemental composition strings such as `"C6H6"` or `"C2H5N1O2"`.
//!
//! Every element symbol must be followed by an explicit count; `"CH4"` is
//! read as the unknown symbol `CH` followed by `4`, not as methane.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::element::Element;
use crate::error::CompositionError;

/// Multiset of atoms, keyed by element in atomic-number order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composition {
    counts: BTreeMap<Element, u32>,
}

impl Composition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, element: Element) -> u32 {
        self.counts.get(&element).copied().unwrap_or(0)
    }

    pub fn add(&mut self, element: Element, count: u32) {
        *self.counts.entry(element).or_default() += count;
    }

    /// Take one atom of `element` out of the multiset.
    ///
    /// Returns `false`, leaving the multiset untouched, when no atom of that
    /// element is left.
    pub fn claim(&mut self, element: Element) -> bool {
        match self.counts.get_mut(&element) {
            Some(count) if *count > 0 => {
                *count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn hydrogens(&self) -> u32 {
        self.count(Element::H)
    }

    /// Elements with a positive count, in atomic-number order.
    pub fn iter(&self) -> impl Iterator<Item = (Element, u32)> + '_ {
        self.counts
            .iter()
            .filter(|(_, &count)| count > 0)
            .map(|(&e, &count)| (e, count))
    }

    /// Sum of nominal valences over all heavy atoms.
    pub fn heavy_valence(&self) -> u32 {
        self.iter()
            .filter_map(|(e, count)| e.nominal_valence().map(|v| u32::from(v) * count))
            .sum()
    }

    pub fn atom_count(&self) -> u32 {
        self.iter().map(|(_, count)| count).sum()
    }
}

impl FromStr for Composition {
    type Err = CompositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_composition(s)
    }
}

/// Hill-order rendering with explicit counts, e.g. `C2H5N1O2`.
///
/// The output parses back to the same composition.
impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let has_carbon = self.count(Element::C) > 0;
        let mut write = |e: Element, count: u32| write!(f, "{}{}", e.symbol(), count);
        if has_carbon {
            write(Element::C, self.count(Element::C))?;
            if self.hydrogens() > 0 {
                write(Element::H, self.hydrogens())?;
            }
        }
        let mut rest: Vec<(Element, u32)> = self
            .iter()
            .filter(|(e, _)| !has_carbon || !matches!(e, Element::C | Element::H))
            .collect();
        rest.sort_by_key(|(e, _)| e.symbol());
        for (e, count) in rest {
            write(e, count)?;
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Symbol(&'a str),
    Count { pos: usize, text: &'a str },
}

fn tokenize(s: &str) -> Result<Vec<Token<'_>>, CompositionError> {
    let bytes = s.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < bytes.len() {
        let start = pos;
        let b = bytes[pos];
        if b.is_ascii_alphabetic() {
            while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
                pos += 1;
            }
            tokens.push(Token::Symbol(&s[start..pos]));
        } else if b.is_ascii_digit() {
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            tokens.push(Token::Count {
                pos: start,
                text: &s[start..pos],
            });
        } else {
            let ch = s[start..].chars().next().unwrap_or('\u{fffd}');
            return Err(CompositionError::UnexpectedChar { pos: start, ch });
        }
    }
    Ok(tokens)
}

/// Parse an elemental composition string into an atom multiset.
///
/// Surrounding whitespace is ignored. Repeated symbols accumulate.
pub fn parse_composition(s: &str) -> Result<Composition, CompositionError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(CompositionError::EmptyInput);
    }
    let tokens = tokenize(trimmed)?;
    if let Some(Token::Count { pos, .. }) = tokens.first() {
        return Err(CompositionError::LeadingCount { pos: *pos });
    }

    let symbols = tokens
        .iter()
        .filter(|t| matches!(t, Token::Symbol(_)))
        .count();
    let counts = tokens.len() - symbols;
    if symbols != counts {
        return Err(CompositionError::CountMismatch { symbols, counts });
    }

    let mut composition = Composition::new();
    for pair in tokens.chunks(2) {
        let [Token::Symbol(symbol), Token::Count { pos, text }] = pair else {
            return Err(CompositionError::CountMismatch { symbols, counts });
        };
        let element = Element::from_symbol(symbol).ok_or_else(|| {
            CompositionError::UnknownElement {
                symbol: (*symbol).to_string(),
            }
        })?;
        let count: u32 = text.parse().map_err(|_| CompositionError::CountOverflow {
            pos: *pos,
            text: (*text).to_string(),
        })?;
        composition.add(element, count);
    }
    Ok(composition)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn benzene() {
        let c = parse_composition("C6H6").unwrap();
        assert_eq!(c.count(Element::C), 6);
        assert_eq!(c.hydrogens(), 6);
        assert_eq!(c.atom_count(), 12);
    }

    #[test]
    fn glycine_any_order() {
        let a = parse_composition("C2H5N1O2").unwrap();
        let b = parse_composition("N1H5C2O2").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.count(Element::N), 1);
        assert_eq!(a.count(Element::O), 2);
    }

    #[test]
    fn two_letter_symbols() {
        let c = parse_composition("C2H4Cl1Br1").unwrap();
        assert_eq!(c.count(Element::Cl), 1);
        assert_eq!(c.count(Element::Br), 1);
    }

    #[test]
    fn multi_digit_counts() {
        let c = parse_composition("C12H22O11").unwrap();
        assert_eq!(c.count(Element::C), 12);
        assert_eq!(c.hydrogens(), 22);
        assert_eq!(c.count(Element::O), 11);
    }

    #[test]
    fn repeated_symbols_accumulate() {
        let c = parse_composition("C1H2C3").unwrap();
        assert_eq!(c.count(Element::C), 4);
    }

    #[test]
    fn zero_hydrogens() {
        let c = parse_composition("C1").unwrap();
        assert_eq!(c.hydrogens(), 0);
        assert_eq!(c.heavy_valence(), 4);
    }

    #[test]
    fn missing_trailing_count() {
        assert_eq!(
            parse_composition("C6H"),
            Err(CompositionError::CountMismatch {
                symbols: 2,
                counts: 1
            })
        );
    }

    #[test]
    fn implicit_one_is_not_allowed() {
        assert_eq!(
            parse_composition("CH4"),
            Err(CompositionError::UnknownElement {
                symbol: "CH".to_string()
            })
        );
    }

    #[test]
    fn unknown_element() {
        assert_eq!(
            parse_composition("C2Fe1"),
            Err(CompositionError::UnknownElement {
                symbol: "Fe".to_string()
            })
        );
    }

    #[test]
    fn empty_and_whitespace() {
        assert_eq!(parse_composition(""), Err(CompositionError::EmptyInput));
        assert_eq!(parse_composition("   "), Err(CompositionError::EmptyInput));
        assert!(parse_composition(" C2H6 ").is_ok());
    }

    #[test]
    fn leading_count() {
        assert_eq!(
            parse_composition("6C"),
            Err(CompositionError::LeadingCount { pos: 0 })
        );
    }

    #[test]
    fn unexpected_character() {
        assert_eq!(
            parse_composition("C2 H6"),
            Err(CompositionError::UnexpectedChar { pos: 2, ch: ' ' })
        );
        assert_eq!(
            parse_composition("C2-H6"),
            Err(CompositionError::UnexpectedChar { pos: 2, ch: '-' })
        );
    }

    #[test]
    fn count_overflow() {
        assert!(matches!(
            parse_composition("C99999999999"),
            Err(CompositionError::CountOverflow { pos: 1, .. })
        ));
    }

    #[test]
    fn claim_decrements_until_empty() {
        let mut c = parse_composition("C1O2").unwrap();
        assert!(c.claim(Element::O));
        assert!(c.claim(Element::O));
        assert!(!c.claim(Element::O));
        assert!(!c.claim(Element::N));
        assert_eq!(c.count(Element::O), 0);
        assert_eq!(c.iter().collect::<Vec<_>>(), vec![(Element::C, 1)]);
    }

    #[test]
    fn display_is_hill_order() {
        let c = parse_composition("O2N1H5C2").unwrap();
        assert_eq!(c.to_string(), "C2H5N1O2");
        let inorganic = parse_composition("O1H2").unwrap();
        assert_eq!(inorganic.to_string(), "H2O1");
        assert_eq!(inorganic.to_string().parse::<Composition>().unwrap(), inorganic);
    }
}
