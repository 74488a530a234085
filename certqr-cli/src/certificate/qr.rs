//! QR image references for verification messages

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

/// Bytes `encodeURIComponent` escapes: everything except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub const DEFAULT_QR_ENDPOINT: &str = "https://quickchart.io/qr";
pub const DEFAULT_QR_SIZE: u32 = 400;

/// Percent-encode a string for use as a URI query component
pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// QR-rendering endpoint template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrEndpoint {
    pub base: String,
    pub size: u32,
}

impl Default for QrEndpoint {
    fn default() -> Self {
        Self {
            base: DEFAULT_QR_ENDPOINT.to_string(),
            size: DEFAULT_QR_SIZE,
        }
    }
}

impl QrEndpoint {
    pub fn new(base: impl Into<String>, size: u32) -> Self {
        Self {
            base: base.into(),
            size,
        }
    }

    /// URL that renders `message` as a QR image
    pub fn url_for(&self, message: &str) -> String {
        format!(
            "{}?text={}&size={}",
            self.base,
            encode_uri_component(message),
            self.size
        )
    }

    pub fn reference(&self, row: u32, column: u32, message: &str) -> QrReference {
        QrReference {
            row,
            column,
            url: self.url_for(message),
        }
    }
}

/// Where a QR image goes and which URL renders it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrReference {
    /// 1-based sheet row
    pub row: u32,
    /// 1-based sheet column
    pub column: u32,
    pub url: String,
}
