use std::collections::BTreeSet;

use intake_core::Part;

use crate::LookupError;
use crate::types::{Document, Product, ProductFiles, ProductParameters};

/// TME parameter ids that carry the package name ("Case" and "Case - mm").
pub const FOOTPRINT_PARAMETER_IDS: [&str; 2] = ["35", "2932"];

const DATASHEET_EXTENSION: &str = "pdf";

/// The three product lookups used to enrich a scanned part.
pub trait Catalog {
    fn products(&self, symbol: &str) -> Result<Vec<Product>, LookupError>;

    fn parameters(&self, symbol: &str) -> Result<Vec<ProductParameters>, LookupError>;

    fn files(&self, symbol: &str) -> Result<Vec<ProductFiles>, LookupError>;

    /// Fill in description, case and datasheets of a scanned part.
    ///
    /// Fails without a partial result if any lookup fails or the part is unknown.
    fn enrich(&self, mut part: Part) -> Result<Part, LookupError> {
        let product = self
            .products(&part.pn)?
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::NotFound {
                symbol: part.pn.clone(),
            })?;
        part.description = product.description;

        let parameters = self.parameters(&part.pn)?;
        part.case = footprint_name(parameters.first());

        let files = self.files(&part.pn)?;
        part.files = files
            .first()
            .map(|product| datasheet_urls(&product.files.document_list))
            .unwrap_or_default();

        log::debug!(
            "{}: case={:?}, {} datasheet(s)",
            part.pn,
            part.case,
            part.files.len()
        );
        Ok(part)
    }
}

fn footprint_name(product: Option<&ProductParameters>) -> Option<String> {
    product?
        .parameter_list
        .iter()
        .rev()
        .filter(|p| FOOTPRINT_PARAMETER_IDS.contains(&p.parameter_id.as_str()))
        .map(|p| p.parameter_value.trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn datasheet_urls(documents: &[Document]) -> BTreeSet<String> {
    documents
        .iter()
        .map(|d| d.document_url.trim())
        .filter(|url| is_pdf(url))
        .map(absolute_url)
        .collect()
}

fn is_pdf(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit_once('.')
        .is_some_and(|(_, ext)| ext.eq_ignore_ascii_case(DATASHEET_EXTENSION))
}

// TME hands out scheme-relative links ("//www.tme.eu/Document/...").
fn absolute_url(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{url}")
    } else {
        url.to_string()
    }
}
