use tracing::debug;

use crate::model::ParseBatch;

/// Leading numeric value of a scraped price string.
///
/// Drops `$` and thousands separators, then parses the first
/// whitespace-separated token: `"$61,234.50"` -> `61234.5`,
/// `"$0.50 USD"` -> `0.5`. Empty or non-numeric input gives `None`.
pub fn parse_price(price: &str) -> Option<f64> {
    let cleaned = price.replace(['$', ','], "");
    cleaned.split_whitespace().next()?.parse::<f64>().ok()
}

/// Keep records whose price parses to at least `min`. Ranks are left as they
/// were, so the output can have gaps.
pub fn filter_min_price(batch: ParseBatch, min: f64) -> ParseBatch {
    let before = batch.records.len();
    let records: Vec<_> = batch
        .records
        .into_iter()
        .filter(|r| parse_price(&r.price).is_some_and(|p| p >= min))
        .collect();
    debug!(kept = records.len(), dropped = before - records.len(), min, "price filter");

    ParseBatch { records, ..batch }
}
