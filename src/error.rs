use thiserror::Error;

use crate::element::Element;

/// Reasons an elemental composition string is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    #[error("empty elemental composition")]
    EmptyInput,
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { pos: usize, ch: char },
    #[error("composition starts with a count at position {pos}; expected an element symbol")]
    LeadingCount { pos: usize },
    #[error("each element quantity must be specified: {symbols} symbol(s) but {counts} count(s)")]
    CountMismatch { symbols: usize, counts: usize },
    #[error("unknown element '{symbol}'")]
    UnknownElement { symbol: String },
    #[error("count '{text}' at position {pos} is out of range")]
    CountOverflow { pos: usize, text: String },
}

/// Errors returned by [`generate`](crate::generate).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("malformed elemental composition: {0}")]
    MalformedComposition(#[from] CompositionError),
    #[error("fragments overlap: element(s) {} appear in more than one fragment", format_elements(.shared))]
    FragmentsOverlap { shared: Vec<Element> },
}

fn format_elements(elements: &[Element]) -> String {
    elements
        .iter()
        .map(|e| e.symbol())
        .collect::<Vec<_>>()
        .join(", ")
}
