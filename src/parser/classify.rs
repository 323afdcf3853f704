use crate::model::{ClassifiedFields, Field};

/// Rows shorter than this skip the positional pass entirely.
const MIN_POSITIONAL_TOKENS: usize = 4;
/// Fallback price candidates must be shorter than this (chars).
const MAX_PRICE_CHARS: usize = 20;
/// Fallback market-cap candidates must be longer than this (chars).
const MIN_CAP_CHARS: usize = 5;

/// One positional rule: try `positions` in order, first token accepted wins.
struct Rule {
    field: Field,
    positions: [usize; 3],
    accepts: fn(&str) -> bool,
}

static POSITIONAL_RULES: [Rule; 4] = [
    Rule { field: Field::Name, positions: [1, 2, 0], accepts: is_name },
    Rule { field: Field::Price, positions: [2, 3, 4], accepts: is_price },
    Rule { field: Field::Change24h, positions: [3, 4, 5], accepts: is_change },
    Rule { field: Field::MarketCap, positions: [6, 7, 5], accepts: is_market_cap },
];

fn is_name(t: &str) -> bool {
    !t.is_empty() && t.chars().any(char::is_alphabetic)
}

fn is_price(t: &str) -> bool {
    t.contains('$')
}

fn is_change(t: &str) -> bool {
    t.contains('%')
}

fn is_market_cap(t: &str) -> bool {
    t.contains(['$', 'M', 'B'])
}

/// Classifier result. Both variants carry usable fields; `Partial` also says
/// which roles could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Complete(ClassifiedFields),
    Partial {
        fields: ClassifiedFields,
        diagnostic: String,
    },
}

impl Classification {
    pub fn fields(&self) -> &ClassifiedFields {
        match self {
            Classification::Complete(fields) => fields,
            Classification::Partial { fields, .. } => fields,
        }
    }

    pub fn into_fields(self) -> ClassifiedFields {
        match self {
            Classification::Complete(fields) => fields,
            Classification::Partial { fields, .. } => fields,
        }
    }

    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Classification::Complete(_) => None,
            Classification::Partial { diagnostic, .. } => Some(diagnostic),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Classification::Complete(_))
    }
}

/// Assign name / price / 24h change / market cap from a row of normalized
/// tokens.
///
/// Two tiers: positions first (only for rows of 4+ tokens), then a content
/// scan that replaces any field the positional pass left weak. The name falls
/// back to the first token. Never fails; worst case every field is empty.
pub fn classify(tokens: &[String]) -> Classification {
    let mut fields = ClassifiedFields::default();

    if tokens.len() >= MIN_POSITIONAL_TOKENS {
        positional_pass(tokens, &mut fields);
    }
    fallback_pass(tokens, &mut fields);

    if fields.name.is_empty() {
        if let Some(first) = tokens.first() {
            fields.name = first.clone();
        }
    }

    let missing = fields.missing();
    if missing.is_empty() {
        Classification::Complete(fields)
    } else {
        let labels: Vec<&str> = missing.iter().map(|f| f.label()).collect();
        Classification::Partial {
            fields,
            diagnostic: format!("unresolved: {}", labels.join(", ")),
        }
    }
}

fn positional_pass(tokens: &[String], fields: &mut ClassifiedFields) {
    for rule in &POSITIONAL_RULES {
        let hit = rule
            .positions
            .iter()
            .filter_map(|&idx| tokens.get(idx))
            .find(|t| (rule.accepts)(t.as_str()));
        if let Some(token) = hit {
            fields.set(rule.field, token);
        }
    }
}

fn fallback_pass(tokens: &[String], fields: &mut ClassifiedFields) {
    if !is_price(&fields.price) {
        if let Some(t) = tokens
            .iter()
            .find(|t| t.contains('$') && t.chars().count() < MAX_PRICE_CHARS)
        {
            fields.price = t.clone();
        }
    }

    // Exactly one '%' rules out ranges like "1.2% - 3.4%".
    if !is_change(&fields.change_24h) {
        if let Some(t) = tokens.iter().find(|t| t.matches('%').count() == 1) {
            fields.change_24h = t.clone();
        }
    }

    // Rightmost large dollar figure; price was taken scanning from the left.
    if !is_market_cap(&fields.market_cap) {
        if let Some(t) = tokens
            .iter()
            .rev()
            .find(|t| t.contains('$') && t.chars().count() > MIN_CAP_CHARS)
        {
            fields.market_cap = t.clone();
        }
    }
}
