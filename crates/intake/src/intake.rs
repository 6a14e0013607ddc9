//! The scan loop: read a line, look the part up at TME, book it into PartKeepr.
//!
//! ```text
//! Reading ──TME label──▶ Enriching ──▶ Reconciling ──▶ Reading
//!    ├──empty line / EOF──▶ done (exit 0)
//!    └──anything else─────▶ InputFormatError (exit 1)
//! ```
//!
//! Every error ends the loop: a failed item has to be rescanned once the cause is fixed.

use std::io::{self, BufRead, Write};

use colored::Colorize;
use intake_core::{InputFormatError, Part, classify};
use intake_partkeepr::{Inventory, InventoryApiError, Reconciler, Reconciliation};
use intake_tme::{Catalog, LookupError};
use thiserror::Error;

use crate::cue::Cue;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error(transparent)]
    InputFormat(#[from] InputFormatError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Inventory(#[from] InventoryApiError),

    #[error("scanner I/O failed")]
    Io(#[from] io::Error),
}

pub struct Intake<C, I> {
    catalog: C,
    reconciler: Reconciler<I>,
    cue: Box<dyn Cue>,
}

impl<C: Catalog, I: Inventory> Intake<C, I> {
    pub fn new(catalog: C, reconciler: Reconciler<I>, cue: Box<dyn Cue>) -> Self {
        Self {
            catalog,
            reconciler,
            cue,
        }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn reconciler(&self) -> &Reconciler<I> {
        &self.reconciler
    }

    /// Process lines from `input` until it ends, returning the number of parts booked.
    pub fn run<R: BufRead, W: Write>(
        &self,
        mut input: R,
        out: &mut W,
    ) -> Result<usize, IntakeError> {
        let mut booked = 0;
        let mut line = String::new();

        loop {
            line.clear();
            input.read_line(&mut line)?;

            match classify(&line).into_part()? {
                Some(part) => {
                    self.process(part, out)?;
                    booked += 1;
                }
                None => {
                    writeln!(out, "bye !")?;
                    return Ok(booked);
                }
            }
        }
    }

    /// Enrich and reconcile one scanned part.
    pub fn process<W: Write>(
        &self,
        part: Part,
        out: &mut W,
    ) -> Result<Reconciliation, IntakeError> {
        self.cue.play();
        let label = "Looking for part:".dimmed();
        writeln!(out, "{label} {}", part.pn.bold())?;
        log::debug!("scanned {part}");

        let part = self.catalog.enrich(part)?;
        let outcome = self.reconciler.reconcile(&part)?;

        let pn = &part.pn;
        let quantity = part.quantity;
        let message = match outcome {
            Reconciliation::StockIncreased(n) => format!("{pn} - Increased stock in {n} units"),
            Reconciliation::Created => {
                format!("Part {pn} ({quantity} new units) loaded to PartKeepr")
            }
        };
        writeln!(out, "{} {message}", "✓".green())?;
        Ok(outcome)
    }
}
