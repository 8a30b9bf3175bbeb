//! High-level pipeline: orchestrates load → compile → publish → advance cursor, per chamber.
//!
//! Each chamber run is a three-step state machine executed once per invocation:
//!   - LOAD: read the chamber's cursor and collect every newer division (see [`crate::loader`])
//!   - BUILD_AND_PUBLISH_ONE: compile a report for the oldest unpublished division and publish it
//!   - ADVANCE_CURSOR: persist that division's id as the new cursor
//!
//! Only one division is published per chamber per run. The rest stay behind the
//! cursor and are picked up by the next scheduled run.
//!
//! # Error Handling
//! Nothing is retried. Any collaborator failure stops the chamber run with a
//! [`SyncError`] naming the stage, and [`synchronise`] stops at the first failed
//! chamber. The cursor is only written after a successful publish, so a failed
//! run is retried by the next invocation. A failed cursor write after a
//! successful publish means the same division is published again next time.
//!
//! # Navigation
//! - Per chamber: [`synchronise_chamber`]
//! - All chambers in order: [`synchronise`]

use thiserror::Error;
use tracing::{error, info};

use crate::chamber::Chamber;
use crate::contract::{BillSource, ClientError, CursorStore, DivisionSource, Publisher};
use crate::loader::load_unpublished;
use crate::report::compile_report;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to read {chamber} cursor: {source}")]
    CursorRead {
        chamber: Chamber,
        #[source]
        source: ClientError,
    },

    #[error("failed to load unpublished {chamber} divisions: {source}")]
    Load {
        chamber: Chamber,
        #[source]
        source: ClientError,
    },

    #[error("failed to fetch {chamber} member total: {source}")]
    MemberTotal {
        chamber: Chamber,
        #[source]
        source: ClientError,
    },

    #[error("failed to compile report for {chamber} division {division_id}: {source}")]
    Compile {
        chamber: Chamber,
        division_id: i64,
        #[source]
        source: ClientError,
    },

    #[error("failed to publish {chamber} division {division_id}: {source}")]
    Publish {
        chamber: Chamber,
        division_id: i64,
        #[source]
        source: ClientError,
    },

    #[error("published {chamber} division {division_id} but failed to save cursor: {source}")]
    CursorWrite {
        chamber: Chamber,
        division_id: i64,
        #[source]
        source: ClientError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChamberOutcome {
    /// Nothing newer than the cursor.
    UpToDate,
    Published {
        division_id: i64,
        post_id: String,
        /// Unpublished divisions left for later runs.
        remaining: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChamberReport {
    pub chamber: Chamber,
    pub cursor_before: i64,
    pub outcome: ChamberOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynchroniseReport {
    pub chambers: Vec<ChamberReport>,
}

/// Publish the oldest unpublished division of one chamber and advance its cursor.
pub async fn synchronise_chamber<S, B, P, C>(
    source: &S,
    bills: &B,
    publisher: &P,
    cursors: &C,
    tags: &[String],
) -> Result<ChamberReport, SyncError>
where
    S: DivisionSource + ?Sized,
    B: BillSource + ?Sized,
    P: Publisher + ?Sized,
    C: CursorStore + ?Sized,
{
    let chamber = source.chamber();

    // --- LOAD ---
    let cursor = cursors.read_cursor(chamber).await.map_err(|e| {
        error!(%chamber, error = ?e, "[SYNC][ERROR] Failed to read cursor");
        SyncError::CursorRead { chamber, source: e }
    })?;
    info!(%chamber, cursor, "[SYNC] Collecting unpublished divisions");

    let divisions = load_unpublished(source, cursor).await.map_err(|e| {
        error!(%chamber, error = ?e, "[SYNC][ERROR] Loading divisions failed");
        SyncError::Load { chamber, source: e }
    })?;

    let Some(division) = divisions.first() else {
        info!(%chamber, cursor, "[SYNC] No unpublished divisions");
        return Ok(ChamberReport {
            chamber,
            cursor_before: cursor,
            outcome: ChamberOutcome::UpToDate,
        });
    };
    let division_id = division.id;

    // --- BUILD_AND_PUBLISH_ONE ---
    let members_total = source.total_members().await.map_err(|e| {
        error!(%chamber, error = ?e, "[SYNC][ERROR] Fetching member total failed");
        SyncError::MemberTotal { chamber, source: e }
    })?;

    info!(%chamber, division_id, "[SYNC] Preparing content for division");
    let report = compile_report(source, bills, division, members_total)
        .await
        .map_err(|e| {
            error!(%chamber, division_id, error = ?e, "[SYNC][ERROR] Compiling report failed");
            SyncError::Compile {
                chamber,
                division_id,
                source: e,
            }
        })?;

    let post = report.into_post(tags.to_vec());
    info!(%chamber, division_id, blocks = post.content.len(), "[SYNC][PUBLISH] Creating post for division");
    let post_id = publisher.create_post(&post).await.map_err(|e| {
        error!(%chamber, division_id, error = ?e, "[SYNC][ERROR][PUBLISH] create_post failed");
        SyncError::Publish {
            chamber,
            division_id,
            source: e,
        }
    })?;
    info!(%chamber, division_id, post_id = %post_id, "[SYNC][PUBLISH] create_post succeeded");

    // --- ADVANCE_CURSOR ---
    cursors
        .write_cursor(chamber, division_id)
        .await
        .map_err(|e| {
            error!(%chamber, division_id, error = ?e, "[SYNC][ERROR] Saving cursor failed after publish");
            SyncError::CursorWrite {
                chamber,
                division_id,
                source: e,
            }
        })?;
    info!(%chamber, cursor = division_id, "[SYNC] Cursor advanced");

    Ok(ChamberReport {
        chamber,
        cursor_before: cursor,
        outcome: ChamberOutcome::Published {
            division_id,
            post_id,
            remaining: divisions.len() - 1,
        },
    })
}

/// Run [`synchronise_chamber`] for each source in order, stopping at the first failure.
pub async fn synchronise(
    sources: &[&dyn DivisionSource],
    bills: &dyn BillSource,
    publisher: &dyn Publisher,
    cursors: &dyn CursorStore,
    tags: &[String],
) -> Result<SynchroniseReport, SyncError> {
    info!(chambers = sources.len(), "[SYNC] Starting synchronisation");
    let mut chambers = Vec::with_capacity(sources.len());

    for source in sources {
        info!(chamber = %source.chamber(), "[SYNC] ====> chamber");
        let report = synchronise_chamber(*source, bills, publisher, cursors, tags).await?;
        chambers.push(report);
    }

    Ok(SynchroniseReport { chambers })
}
