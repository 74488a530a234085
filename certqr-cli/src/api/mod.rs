//! Google API access
//!
//! Thin request/response plumbing for Sheets, Drive and the spreadsheet export endpoint.
//! No retries: any failure is returned to the caller as-is.

pub mod client;

pub use client::{Endpoints, GoogleClient};
