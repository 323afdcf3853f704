use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

use crate::model::RawRow;

static SELECTOR_BODY_ROW: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tbody tr").expect("Invalid tbody tr selector"));
static SELECTOR_TR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("Invalid tr selector"));
static SELECTOR_TD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("Invalid td selector"));

/// Elements whose text never shows on the page.
const HIDDEN: &[&str] = &["script", "style", "noscript", "template"];
/// Elements that start a new visual line.
const BLOCKS: &[&str] = &[
    "p", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "table", "section",
];

/// Pull body rows out of an HTML document, one `RawRow` of cell texts each.
///
/// Rows come from `tbody`, or from every `tr` when the table has none.
/// Rows without `<td>` cells (header rows) are skipped.
pub fn extract_rows(html: &str) -> Vec<RawRow> {
    let document = Html::parse_document(html);

    let mut rows: Vec<ElementRef> = document.select(&SELECTOR_BODY_ROW).collect();
    if rows.is_empty() {
        rows = document.select(&SELECTOR_TR).collect();
    }

    rows.into_iter()
        .filter_map(|tr| {
            let cells: RawRow = tr.select(&SELECTOR_TD).map(cell_text).collect();
            (!cells.is_empty()).then_some(cells)
        })
        .collect()
}

/// Approximate the rendered text of a cell: block elements and `<br>` break
/// lines, whitespace collapses within a line, blank lines are dropped.
pub fn cell_text(cell: ElementRef) -> String {
    let mut raw = String::new();
    push_text(cell, &mut raw);

    raw.lines()
        .map(|l| l.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_text(el: ElementRef, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = child_el.value().name();
                if HIDDEN.contains(&name) {
                    continue;
                }
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                let block = BLOCKS.contains(&name);
                if block {
                    out.push('\n');
                }
                push_text(child_el, out);
                if block {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}
