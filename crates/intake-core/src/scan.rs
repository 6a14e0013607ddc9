//! Barcode scanner line classification.
//!
//! TME labels encode one part per line:
//!
//! ```text
//! QTY:3 PN:HA50151V4 MFR:SUNON MPN:HA50151V4-000U-999 PO:5094268/9 https://www.tme.eu/details/HA50151V4
//! ```
//!
//! | field | name | use                          |
//! |-------|------|------------------------------|
//! | 0     | QTY  | quantity                     |
//! | 1     | PN   | distributor part number      |
//! | 2     | MFR  | manufacturer (unused)        |
//! | 3     | MPN  | manufacturer part (unused)   |
//! | 4     | PO   | purchase order               |
//! | 5     | URL  | product page (unused)        |

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::Part;

static TME_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^QTY:\d+ PN:\S+ .*tme\.eu").unwrap());

const QTY_FIELD: usize = 0;
const PN_FIELD: usize = 1;
const PO_FIELD: usize = 4;

/// Result of classifying one line of scanner input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanLine {
    /// A TME label, decoded into a not yet enriched part.
    DistributorScan(Part),
    /// Blank line or closed stream.
    Empty,
    /// Anything else, carrying the offending line.
    Unrecognized(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unrecognized raw data format: {line:?}")]
pub struct InputFormatError {
    pub line: String,
}

impl ScanLine {
    /// Decoded part, `None` for the end of input, or the format error.
    pub fn into_part(self) -> Result<Option<Part>, InputFormatError> {
        match self {
            ScanLine::DistributorScan(part) => Ok(Some(part)),
            ScanLine::Empty => Ok(None),
            ScanLine::Unrecognized(line) => Err(InputFormatError { line }),
        }
    }
}

pub fn classify(line: &str) -> ScanLine {
    let line = line.trim();
    if line.is_empty() {
        return ScanLine::Empty;
    }
    if !TME_LINE.is_match(line) {
        return ScanLine::Unrecognized(line.to_string());
    }

    match parse_tme(line) {
        Some(part) => ScanLine::DistributorScan(part),
        None => ScanLine::Unrecognized(line.to_string()),
    }
}

fn parse_tme(line: &str) -> Option<Part> {
    let fields: Vec<&str> = line.split(' ').collect();
    if fields.len() <= PO_FIELD {
        return None;
    }

    let quantity: u32 = fields[QTY_FIELD].strip_prefix("QTY:")?.parse().ok()?;
    if quantity == 0 {
        return None;
    }
    let pn = fields[PN_FIELD]
        .strip_prefix("PN:")
        .filter(|pn| !pn.is_empty())?;
    let po = fields[PO_FIELD].strip_prefix("PO:")?;

    Some(Part::scanned(pn, quantity, po))
}
