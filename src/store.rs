use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

use crate::error::StoreError;
use crate::model::{ParseBatch, PriceRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Nothing to write; the file was not touched.
    Empty,
    Appended { rows: usize, header: bool },
}

#[derive(Serialize)]
struct CsvRow<'a> {
    rank: usize,
    name: &'a str,
    price: &'a str,
    #[serde(rename = "24h_change")]
    change_24h: &'a str,
    market_cap: &'a str,
    scrape_utc: &'a str,
}

impl<'a> CsvRow<'a> {
    fn new(r: &'a PriceRecord, scrape_utc: &'a str) -> Self {
        CsvRow {
            rank: r.rank,
            name: &r.name,
            price: &r.price,
            change_24h: &r.change_24h,
            market_cap: &r.market_cap,
            scrape_utc,
        }
    }
}

/// Append a batch to the CSV at `path`, creating it if needed. The header is
/// written only when the file is new or empty.
pub fn append_batch(path: &Path, batch: &ParseBatch) -> Result<WriteOutcome, StoreError> {
    if batch.is_empty() {
        return Ok(WriteOutcome::Empty);
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| StoreError::Open {
            path: path.display().to_string(),
            source,
        })?;
    // Checked on the open handle: another writer may create the file first.
    let header = file.metadata()?.len() == 0;

    let rows = write_batch(file, batch, header)?;
    debug!(
        "Appended {} rows to {} (UTC {})",
        rows,
        path.display(),
        batch.timestamp()
    );
    Ok(WriteOutcome::Appended { rows, header })
}

/// Write the batch as CSV to any writer.
pub fn write_batch<W: Write>(w: W, batch: &ParseBatch, header: bool) -> Result<usize, StoreError> {
    let stamp = batch.timestamp();
    let mut wtr = WriterBuilder::new().has_headers(header).from_writer(w);
    for record in &batch.records {
        wtr.serialize(CsvRow::new(record, &stamp))?;
    }
    wtr.flush()?;
    Ok(batch.records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn batch() -> ParseBatch {
        let ts = Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 5).unwrap();
        let mut b = ParseBatch::empty(ts);
        b.records.push(PriceRecord {
            rank: 1,
            name: "Bitcoin".into(),
            price: "$61,234.50".into(),
            change_24h: "2.51%".into(),
            market_cap: "$1.21T".into(),
            captured_at: ts,
        });
        b.records.push(PriceRecord {
            rank: 3,
            name: "Tether".into(),
            price: "$1.00".into(),
            change_24h: String::new(),
            market_cap: String::new(),
            captured_at: ts,
        });
        b
    }

    fn temp_path(tag: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("crypto_tracker_{}_{}.csv", tag, std::process::id()));
        let _ = std::fs::remove_file(&p);
        p
    }

    #[test]
    fn writes_header_and_quotes() {
        let mut buf = Vec::new();
        let n = write_batch(&mut buf, &batch(), true).unwrap();
        assert_eq!(n, 2);
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "rank,name,price,24h_change,market_cap,scrape_utc");
        assert_eq!(lines[1], "1,Bitcoin,\"$61,234.50\",2.51%,$1.21T,2026-10-17 09:30:05");
        assert_eq!(lines[2], "3,Tether,$1.00,,,2026-10-17 09:30:05");
    }

    #[test]
    fn no_header_when_appending() {
        let mut buf = Vec::new();
        write_batch(&mut buf, &batch(), false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("1,Bitcoin,"));
    }

    #[test]
    fn append_writes_header_once() {
        let path = temp_path("append");
        let first = append_batch(&path, &batch()).unwrap();
        assert_eq!(first, WriteOutcome::Appended { rows: 2, header: true });
        let second = append_batch(&path, &batch()).unwrap();
        assert_eq!(second, WriteOutcome::Appended { rows: 2, header: false });

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 5);
        assert_eq!(text.matches("rank,name").count(), 1);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn existing_empty_file_gets_header() {
        let path = temp_path("empty_file");
        std::fs::write(&path, "").unwrap();
        let out = append_batch(&path, &batch()).unwrap();
        assert_eq!(out, WriteOutcome::Appended { rows: 2, header: true });
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn file_filled_by_another_writer_gets_no_header() {
        let path = temp_path("other_writer");
        let other = OpenOptions::new().create(true).append(true).open(&path).unwrap();
        write_batch(other, &batch(), true).unwrap();

        let out = append_batch(&path, &batch()).unwrap();
        assert_eq!(out, WriteOutcome::Appended { rows: 2, header: false });
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("rank,name").count(), 1);
        assert_eq!(text.lines().count(), 5);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn empty_batch_does_not_create_file() {
        let path = temp_path("none");
        let ts = Utc.with_ymd_and_hms(2026, 10, 17, 9, 30, 5).unwrap();
        let out = append_batch(&path, &ParseBatch::empty(ts)).unwrap();
        assert_eq!(out, WriteOutcome::Empty);
        assert!(!path.exists());
    }
}
