use chrono::{DateTime, Utc};
use tracing::debug;

use super::classify::classify;
use super::normalize::normalize_row;
use crate::error::RowError;
use crate::model::PriceRecord;

/// Build the record for the row at `rank` from its raw cells.
///
/// Fails only when a cell carries a NUL, the mark of a broken text extraction.
/// Any row width and any other character is accepted; missing fields come
/// back as empty strings.
pub fn assemble(
    rank: usize,
    cells: &[String],
    captured_at: DateTime<Utc>,
) -> Result<PriceRecord, RowError> {
    validate(cells)?;

    let tokens = normalize_row(cells);
    let classification = classify(&tokens);
    if let Some(diag) = classification.diagnostic() {
        debug!(rank, cells = cells.len(), "partial row: {}", diag);
    }
    let fields = classification.into_fields();

    Ok(PriceRecord {
        rank,
        name: fields.name,
        price: single_line(&fields.price),
        change_24h: single_line(&fields.change_24h),
        market_cap: single_line(&fields.market_cap),
        captured_at,
    })
}

fn validate(cells: &[String]) -> Result<(), RowError> {
    match cells.iter().position(|c| c.contains('\0')) {
        Some(cell) => Err(RowError::NulByte { cell }),
        None => Ok(()),
    }
}

fn single_line(s: &str) -> String {
    s.replace(['\n', '\r'], " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap()
    }

    fn cells(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn live_style_row() {
        let row = cells(&[
            "",
            "1",
            "Bitcoin\nBTC\nBuy",
            "$61,234.50",
            "0.12%",
            "1.45%",
            "3.21%",
            "$1.2T$1,207,345,678,901",
            "$35,123,456,789\n573,123 BTC",
            "19,700,000 BTC",
            "",
        ]);
        let rec = assemble(1, &row, ts()).unwrap();
        assert_eq!(rec.rank, 1);
        assert_eq!(rec.name, "Bitcoin");
        assert_eq!(rec.price, "$61,234.50");
        assert_eq!(rec.change_24h, "0.12%");
        assert_eq!(rec.market_cap, "$1.2T$1,207,345,678,901");
        assert_eq!(rec.captured_at, ts());
    }

    #[test]
    fn multiline_cells_keep_first_line() {
        let row = cells(&["3", "  Tether\nUSDT ", "$1.00\n0.0003 ETH", "0.01%", "x", "x", "$112.4B\n112B USDT"]);
        let rec = assemble(3, &row, ts()).unwrap();
        assert_eq!(rec.name, "Tether");
        assert_eq!(rec.price, "$1.00");
        assert_eq!(rec.market_cap, "$112.4B");
        for v in [&rec.name, &rec.price, &rec.change_24h, &rec.market_cap] {
            assert!(!v.contains('\n'));
        }
    }

    #[test]
    fn short_empty_row_is_not_an_error() {
        let rec = assemble(4, &cells(&["", ""]), ts()).unwrap();
        assert_eq!(rec.name, "");
        assert_eq!(rec.price, "");
        assert_eq!(rec.change_24h, "");
        assert_eq!(rec.market_cap, "");

        let rec = assemble(5, &[], ts()).unwrap();
        assert_eq!(rec.name, "");
    }

    #[test]
    fn nul_rejects_row() {
        let row = cells(&["2", "Eth\u{0}ereum", "$3,012.77", "0.4%"]);
        let err = assemble(2, &row, ts()).unwrap_err();
        assert_eq!(err, RowError::NulByte { cell: 1 });
    }

    #[test]
    fn tabs_and_breaks_are_fine() {
        let row = cells(&["2", "Ethereum\tETH", "$3,012.77\r\n", "0.4%"]);
        assert!(assemble(2, &row, ts()).is_ok());
    }

    #[test]
    fn other_control_characters_normalize_through() {
        // form feed, vertical tab and NEL are whitespace to trim()
        for price in ["$3,012.77\u{c}", "\u{b}$3,012.77", "$3,012.77\u{85}"] {
            let row = cells(&["2", "Ethereum", price, "0.4%"]);
            let rec = assemble(2, &row, ts()).unwrap();
            assert_eq!(rec.name, "Ethereum");
            assert_eq!(rec.price, "$3,012.77");
            assert_eq!(rec.change_24h, "0.4%");
        }

        let row = cells(&["2", "Ether\u{1b}eum", "$3,012.77", "0.4%"]);
        assert_eq!(assemble(2, &row, ts()).unwrap().name, "Ether\u{1b}eum");
    }

    #[test]
    fn wide_row_is_accepted() {
        let mut row = cells(&["", "1", "Bitcoin\nBTC", "$61,234.50", "0.12%", "1.45%", "3.21%", "$1.21T"]);
        row.resize(67, "x".to_string());
        let rec = assemble(1, &row, ts()).unwrap();
        assert_eq!(rec.name, "Bitcoin");
        assert_eq!(rec.price, "$61,234.50");
        assert_eq!(rec.market_cap, "$1.21T");
    }

    #[test]
    fn single_line_collapses_breaks() {
        assert_eq!(single_line("$1.2B\n"), "$1.2B");
        assert_eq!(single_line("a\nb"), "a b");
    }
}
