/// Trim a raw cell and keep only its first line.
///
/// Scraped cells often stack content ("Bitcoin\nBTC", "$61,234.50\n0.98 ETH");
/// the first line is the one the row fields care about. The kept line is
/// trimmed again so the result is a fixed point of this function.
pub fn normalize(raw: &str) -> String {
    raw.trim()
        .split(['\n', '\r'])
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

pub fn normalize_row(cells: &[String]) -> Vec<String> {
    cells.iter().map(|c| normalize(c)).collect()
}
