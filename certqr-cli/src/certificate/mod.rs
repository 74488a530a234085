//! Certificate verification QR codes
//!
//! Formats each student row, builds the verification message and turns it into a QR
//! image reference written next to the row.

pub mod date;
pub mod generator;
pub mod message;
pub mod qr;
pub mod text;

pub use generator::{GenerateReport, generate_all};
pub use qr::QrEndpoint;
