use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::assemble::assemble;
use crate::model::{ParseBatch, RawRow, RowDiagnostic};

/// Parse up to `limit` rows, stamped with the current UTC time.
pub fn collect_batch(rows: &[RawRow], limit: usize) -> ParseBatch {
    collect_batch_at(rows, limit, Utc::now())
}

/// Parse up to `limit` rows in page order.
///
/// Rank is the row's position on the page plus one and is kept when earlier
/// rows fail, so a dropped row leaves a gap rather than shifting the ranks
/// below it. Failed rows are logged and listed in `diagnostics`; the batch
/// itself never fails.
pub fn collect_batch_at(rows: &[RawRow], limit: usize, captured_at: DateTime<Utc>) -> ParseBatch {
    let mut batch = ParseBatch::empty(captured_at);

    for (i, row) in rows.iter().take(limit).enumerate() {
        let rank = i + 1;
        match assemble(rank, row, captured_at) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                warn!("failed to parse row {}: {}", rank, e);
                batch.diagnostics.push(RowDiagnostic {
                    rank,
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        parsed = batch.records.len(),
        failed = batch.diagnostics.len(),
        "collected batch of {} rows",
        rows.len().min(limit)
    );
    batch
}
