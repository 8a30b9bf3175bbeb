//! Best-effort guess at the bill a division is about.
//!
//! A title containing `" Bill"` probably names a bill; everything before the
//! first occurrence is used as a title search term. Not finding one is a
//! normal outcome. Transport errors from the bill source still propagate.

use tracing::{debug, info};

use crate::contract::{Bill, BillSource, ClientError};

const BILL_MARKER: &str = " Bill";

/// Search term for a division title, if the title looks like it names a bill.
pub fn candidate_term(title: &str) -> Option<&str> {
    let index = title.find(BILL_MARKER)?;
    let term = &title[..index];
    if term.is_empty() {
        None
    } else {
        Some(term)
    }
}

/// Find the bill a division title most likely refers to, fetching its full record.
pub async fn find_bill_for<B>(bills: &B, title: &str) -> Result<Option<Bill>, ClientError>
where
    B: BillSource + ?Sized,
{
    let Some(term) = candidate_term(title) else {
        debug!(title, "Division title does not mention a bill");
        return Ok(None);
    };

    info!(term, "Division potentially about a bill, searching");
    let hits = bills.search(term, 1).await?;
    let Some(hit) = hits.into_iter().next() else {
        debug!(term, "No bill matched search term");
        return Ok(None);
    };

    let bill = bills.get(hit.bill_id).await?;
    Ok(Some(bill))
}
