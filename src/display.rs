use std::io::{self, Write};

use crate::model::ParseBatch;

const HEADER: [&str; 5] = ["Rank", "Name", "Price", "24h Change", "Market Cap"];

/// Print the table to stdout. Errors (a closed pipe, say) go back to the caller.
pub fn print_batch(batch: &ParseBatch) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_batch(&mut out, batch)?;
    out.flush()
}

/// Fixed-width table, one line per record.
pub fn render_batch<W: Write>(w: &mut W, batch: &ParseBatch) -> io::Result<()> {
    if batch.is_empty() {
        writeln!(w, "No coins to show.")?;
        return Ok(());
    }

    writeln!(
        w,
        "{:>4} | {:<20} | {:>14} | {:>10} | {:<24}",
        HEADER[0], HEADER[1], HEADER[2], HEADER[3], HEADER[4]
    )?;
    writeln!(w, "{}", "-".repeat(84))?;

    for r in &batch.records {
        writeln!(
            w,
            "{:>4} | {:<20} | {:>14} | {:>10} | {:<24}",
            r.rank,
            truncate(&r.name, 20),
            truncate(&r.price, 14),
            truncate(&r.change_24h, 10),
            truncate(&r.market_cap, 24),
        )?;
    }

    writeln!(w, "\n{} coins | captured {} UTC", batch.len(), batch.timestamp())?;
    if !batch.diagnostics.is_empty() {
        writeln!(w, "{} rows skipped:", batch.diagnostics.len())?;
        for d in &batch.diagnostics {
            writeln!(w, "  row {}: {}", d.rank, d.message)?;
        }
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
