use chrono::Utc;
use intake_core::Part;

use crate::InventoryApiError;
use crate::client::PARTS;
use crate::inventory::{Inventory, Reference};
use crate::template::PartTemplate;

/// What [`Reconciler::reconcile`] did with a part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    /// The part was on record; its stock grew by this many units.
    StockIncreased(u32),
    /// A new part record was created.
    Created,
}

/// Decides between adding stock and creating a part, then performs that write.
pub struct Reconciler<I> {
    inventory: I,
    template: PartTemplate,
}

impl<I: Inventory> Reconciler<I> {
    pub fn new(inventory: I, template: PartTemplate) -> Self {
        Self {
            inventory,
            template,
        }
    }

    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    pub fn reconcile(&self, part: &Part) -> Result<Reconciliation, InventoryApiError> {
        let existing = self.inventory.find_parts(&part.pn)?;

        // Several parts may share a name; the first one gets the stock.
        if let Some(first) = existing.first() {
            if existing.len() > 1 {
                log::warn!(
                    "{} parts named {}, adding stock to the first",
                    existing.len(),
                    part.pn
                );
            }
            let iri = first.iri().ok_or_else(|| InventoryApiError::Malformed {
                endpoint: PARTS.to_string(),
                reason: format!("part {} has no \"@id\"", part.pn),
            })?;
            log::debug!(
                "{} exists as {iri}, adding {} units",
                part.pn,
                part.quantity
            );
            self.inventory.add_stock(iri, part.quantity, &part.po)?;
            return Ok(Reconciliation::StockIncreased(part.quantity));
        }

        let footprint = self.resolve_footprint(part)?;
        let attachments = self.upload_attachments(part)?;
        let document = self
            .template
            .render(part, footprint, attachments, Utc::now());

        let created = self.inventory.create_part(&document)?;
        log::info!(
            "created {} as {}",
            part.pn,
            created.iri().unwrap_or("<unknown>")
        );
        Ok(Reconciliation::Created)
    }

    fn resolve_footprint(&self, part: &Part) -> Result<Option<Reference>, InventoryApiError> {
        let Some(name) = part.footprint() else {
            return Ok(None);
        };

        let footprint = self.inventory.find_footprints(name)?.into_iter().next();
        if footprint.is_none() {
            log::debug!(
                "no footprint named {name:?}, creating {} without one",
                part.pn
            );
        }
        Ok(footprint)
    }

    fn upload_attachments(&self, part: &Part) -> Result<Vec<Reference>, InventoryApiError> {
        part.files
            .iter()
            .map(|url| {
                log::debug!("uploading {url}");
                self.inventory.upload_temp_file(url)
            })
            .collect()
    }
}
