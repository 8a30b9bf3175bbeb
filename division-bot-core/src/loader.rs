//! Unpublished-division loader.
//!
//! Walks a chamber's newest-first feed page by page until it reaches the
//! cursor, and returns what it found oldest-first so reports are published in
//! the order the votes happened.
//!
//! The scan itself is [`UnpublishedScan`], a small state machine fed one page
//! at a time; [`load_unpublished`] drives it against a [`DivisionSource`].

use tracing::{debug, info};

use crate::contract::{ClientError, Division, DivisionSource};

/// Divisions requested per page.
pub const PAGE_SIZE: usize = 20;

/// Scanning stops once more than this many divisions have been collected.
pub const BATCH_CEILING: usize = 100;

/// Why a scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStop {
    /// A division at or below the cursor was seen.
    CursorReached,
    /// More than [`BATCH_CEILING`] divisions were collected.
    CeilingReached,
    /// The feed returned an empty page.
    Exhausted,
}

/// Result of feeding one page into the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStep {
    /// Fetch the next page at this offset.
    Continue { skip: usize },
    Stop(ScanStop),
}

/// Accumulates divisions newer than a cursor from newest-first pages.
#[derive(Debug)]
pub struct UnpublishedScan {
    cursor: i64,
    ceiling: usize,
    found: Vec<Division>,
}

impl UnpublishedScan {
    pub fn new(cursor: i64) -> Self {
        Self::with_ceiling(cursor, BATCH_CEILING)
    }

    pub fn with_ceiling(cursor: i64, ceiling: usize) -> Self {
        Self {
            cursor,
            ceiling,
            found: Vec::new(),
        }
    }

    /// Number of divisions collected so far.
    pub fn len(&self) -> usize {
        self.found.len()
    }

    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }

    /// Consume one page. The next offset is the number collected so far, so
    /// overlapping pages never double count.
    pub fn absorb(&mut self, page: Vec<Division>) -> ScanStep {
        if page.is_empty() {
            return ScanStep::Stop(ScanStop::Exhausted);
        }

        for division in page {
            if division.id <= self.cursor {
                return ScanStep::Stop(ScanStop::CursorReached);
            }
            self.found.push(division);
            if self.found.len() > self.ceiling {
                return ScanStep::Stop(ScanStop::CeilingReached);
            }
        }

        ScanStep::Continue {
            skip: self.found.len(),
        }
    }

    /// Collected divisions, oldest first.
    pub fn into_oldest_first(mut self) -> Vec<Division> {
        self.found.reverse();
        self.found
    }
}

/// Every division newer than `cursor`, oldest first, up to the batch ceiling.
pub async fn load_unpublished<S>(source: &S, cursor: i64) -> Result<Vec<Division>, ClientError>
where
    S: DivisionSource + ?Sized,
{
    let chamber = source.chamber();
    let mut scan = UnpublishedScan::new(cursor);
    let mut skip = 0;

    let stop = loop {
        let page = source.division_page(PAGE_SIZE, skip).await?;
        debug!(%chamber, skip, page_len = page.len(), "Scanning division page");
        match scan.absorb(page) {
            ScanStep::Continue { skip: next } => skip = next,
            ScanStep::Stop(stop) => break stop,
        }
    };

    info!(%chamber, cursor, found = scan.len(), ?stop, "Collected unpublished divisions");
    Ok(scan.into_oldest_first())
}
