use chrono::{DateTime, Utc};
use serde::Serialize;

/// Raw cell texts of one table row, in page order.
pub type RawRow = Vec<String>;

/// Semantic role a token can play in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Price,
    Change24h,
    MarketCap,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Price, Field::Change24h, Field::MarketCap];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Price => "price",
            Field::Change24h => "change24h",
            Field::MarketCap => "market_cap",
        }
    }
}

/// Classifier output. An empty string means "not determined".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedFields {
    pub name: String,
    pub price: String,
    pub change_24h: String,
    pub market_cap: String,
}

impl ClassifiedFields {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Price => &self.price,
            Field::Change24h => &self.change_24h,
            Field::MarketCap => &self.market_cap,
        }
    }

    pub fn set(&mut self, field: Field, value: &str) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Price => &mut self.price,
            Field::Change24h => &mut self.change_24h,
            Field::MarketCap => &mut self.market_cap,
        };
        *slot = value.to_string();
    }

    /// Fields still empty, in declaration order.
    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceRecord {
    /// 1-based position of the source row on the page.
    pub rank: usize,
    pub name: String,
    pub price: String,
    pub change_24h: String,
    pub market_cap: String,
    pub captured_at: DateTime<Utc>,
}

/// A row that was dropped, tagged with the rank it would have had.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDiagnostic {
    pub rank: usize,
    pub message: String,
}

/// Records from one collection run. Records are in rank order and all share
/// `captured_at`.
#[derive(Debug, Clone)]
pub struct ParseBatch {
    pub captured_at: DateTime<Utc>,
    pub records: Vec<PriceRecord>,
    pub diagnostics: Vec<RowDiagnostic>,
}

impl ParseBatch {
    pub fn empty(captured_at: DateTime<Utc>) -> Self {
        ParseBatch {
            captured_at,
            records: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Capture time in the `YYYY-MM-DD HH:MM:SS` form written to CSV.
    pub fn timestamp(&self) -> String {
        self.captured_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
