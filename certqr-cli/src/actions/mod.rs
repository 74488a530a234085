//! User-confirmed sheet operations

pub mod clear;
pub mod export;

pub use clear::clear_qr_codes;
pub use export::export_pdf;

/// Result of an operation gated by a confirmation prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Done(T),
    /// The user declined at the prompt; nothing was changed
    Canceled,
}
