//! Display normalization for free-text fields

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::sheet::Cell;

/// A word starts at an ASCII word character and runs until the next whitespace.
/// Whitespace is the ECMAScript set, which adds U+FEFF and leaves out U+0085.
static WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"[A-Za-z0-9_][^\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}]*",
    )
    .expect("valid word regex")
});

/// Capitalize the first character of every word and lowercase the rest.
///
/// Anything that is not non-empty text is returned unchanged.
pub fn to_proper_case(cell: &Cell) -> Cell {
    match cell {
        Cell::Text(s) if !s.is_empty() => Cell::Text(proper_case_str(s)),
        other => other.clone(),
    }
}

pub fn proper_case_str(input: &str) -> String {
    WORD.replace_all(input, |caps: &Captures| {
        let word = &caps[0];
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => {
                let mut out = String::with_capacity(word.len());
                out.extend(first.to_uppercase());
                out.push_str(&chars.as_str().to_lowercase());
                out
            }
            None => String::new(),
        }
    })
    .into_owned()
}

/// Upper-case the display form of a cell
pub fn to_upper_case(cell: &Cell) -> String {
    cell.to_string().to_uppercase()
}
