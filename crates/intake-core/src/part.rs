use std::collections::BTreeSet;
use std::fmt;

/// A scanned part on its way into the inventory.
///
/// `pn`, `quantity` and `po` come from the scanner line. The remaining fields are
/// empty until the catalog lookup fills them in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Distributor part number, the lookup key in both APIs.
    pub pn: String,
    pub quantity: u32,
    /// Purchase order reference, only used as the stock change comment.
    pub po: String,
    pub description: String,
    /// Package/footprint name, `None` when the catalog reports none.
    pub case: Option<String>,
    /// Datasheet URLs (PDF only).
    pub files: BTreeSet<String>,
}

impl Part {
    pub fn scanned(pn: impl Into<String>, quantity: u32, po: impl Into<String>) -> Self {
        Self {
            pn: pn.into(),
            quantity,
            po: po.into(),
            description: String::new(),
            case: None,
            files: BTreeSet::new(),
        }
    }

    /// Footprint name to resolve in the inventory, skipping blank values.
    pub fn footprint(&self) -> Option<&str> {
        self.case
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{} (PO {})", self.pn, self.quantity, self.po)
    }
}
