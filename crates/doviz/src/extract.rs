//! Quote extraction from the canlidoviz.com market page.
//!
//! Two independent passes run over one parsed document:
//!
//! - **others**: every table carrying `dt="amount"` and `dt="change"` marker
//!   spans is treated as a quote table; each non-blank row becomes a quote.
//! - **prime**: the table under the "Piyasa Özeti" heading; every
//!   `tr.table-row` becomes a quote.
//!
//! The rules follow the page's current markup and are not meant to
//! generalize. A pass that finds nothing yields an empty map; a miss in
//! the prime pass never affects the others pass.

use std::borrow::Cow;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractionMiss;
use crate::types::{Quote, QuoteMap};

/// Heading text that anchors the prime pass.
pub const PRIME_SECTION_TITLE: &str = "Piyasa Özeti";

/// Ordered list of selectors; the first one that yields non-empty text wins.
pub struct MatcherChain {
    selectors: Vec<Selector>,
}

impl MatcherChain {
    pub fn new(selectors: Vec<Selector>) -> Self {
        Self { selectors }
    }

    /// Try each selector in priority order. Within one selector, elements
    /// are visited in document order and the first non-empty trimmed text
    /// is returned.
    pub fn first_text(&self, scope: ElementRef<'_>) -> Option<String> {
        self.selectors.iter().find_map(|sel| {
            scope
                .select(sel)
                .map(element_text)
                .find(|text| !text.is_empty())
        })
    }
}

struct Selectors {
    table: Selector,
    amount: Selector,
    change: Selector,
    other_row: Selector,
    code: MatcherChain,
    title: Selector,
    prime_table: Selector,
    prime_row: Selector,
    prime_name: Selector,
    prime_price: Selector,
    prime_change: Selector,
}

fn css(selector: &str) -> Selector {
    Selector::parse(selector).expect("static selector must parse")
}

static SELECTORS: LazyLock<Selectors> = LazyLock::new(|| Selectors {
    table: css("table"),
    amount: css(r#"span[dt="amount"]"#),
    change: css(r#"span[dt="change"]"#),
    other_row: css("tbody tr, tr.table-row-md, tr.table-row"),
    code: MatcherChain::new(vec![
        css(".table-code"),
        css(".table-name"),
        css("span.items-center"),
    ]),
    title: css("span.table-title"),
    prime_table: css("table.w-full.flex.flex-col"),
    prime_row: css("tr.table-row"),
    prime_name: css("span.table-name"),
    prime_price: css("span.table-price"),
    prime_change: css("span.table-change"),
});

/// Output of both passes over one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub others: QuoteMap,
    pub prime: Result<QuoteMap, ExtractionMiss>,
}

impl Extraction {
    /// Result of a run over nothing: both maps empty, no miss recorded.
    pub fn empty() -> Self {
        Self {
            others: QuoteMap::new(),
            prime: Ok(QuoteMap::new()),
        }
    }
}

/// Decode a fetched body into a document.
///
/// Invalid UTF-8 sequences are replaced with U+FFFD so one bad byte does
/// not cost the rest of the page. The HTML parser accepts any markup.
pub fn parse_document(body: &[u8]) -> Html {
    let text = String::from_utf8_lossy(body);
    if let Cow::Owned(_) = text {
        tracing::warn!("upstream body is not valid UTF-8; invalid bytes replaced");
    }
    Html::parse_document(&text)
}

/// Run both passes.
pub fn extract(document: &Html) -> Extraction {
    Extraction {
        others: extract_others(document),
        prime: extract_prime(document),
    }
}

/// Quotes from every table that carries both amount and change markers.
pub fn extract_others(document: &Html) -> QuoteMap {
    let sel = &*SELECTORS;
    let mut quotes = QuoteMap::new();

    for table in document.select(&sel.table) {
        if !is_quote_table(table) {
            continue;
        }
        for row in table.select(&sel.other_row) {
            let code = sel.code.first_text(row).unwrap_or_default();
            let amount = joined_text(row, &sel.amount);
            let change = joined_text(row, &sel.change);

            let quote = Quote::new(code, amount, change);
            if quote.is_blank() {
                continue;
            }
            quotes.insert(quote.name.clone(), quote);
        }
    }

    quotes
}

fn is_quote_table(table: ElementRef<'_>) -> bool {
    let sel = &*SELECTORS;
    table.select(&sel.amount).next().is_some() && table.select(&sel.change).next().is_some()
}

/// Quotes from the table next to the "Piyasa Özeti" heading.
pub fn extract_prime(document: &Html) -> Result<QuoteMap, ExtractionMiss> {
    let sel = &*SELECTORS;

    let title = document
        .select(&sel.title)
        .find(|span| element_text(*span).contains(PRIME_SECTION_TITLE))
        .ok_or(ExtractionMiss::TitleNotFound)?;

    let container = title
        .parent()
        .and_then(ElementRef::wrap)
        .ok_or(ExtractionMiss::TableNotFound)?;

    let mut tables = container.select(&sel.prime_table).peekable();
    if tables.peek().is_none() {
        return Err(ExtractionMiss::TableNotFound);
    }

    let mut quotes = QuoteMap::new();
    for table in tables {
        for row in table.select(&sel.prime_row) {
            let quote = Quote::new(
                joined_text(row, &sel.prime_name),
                joined_text(row, &sel.prime_price),
                joined_text(row, &sel.prime_change),
            );
            quotes.insert(quote.name.clone(), quote);
        }
    }

    Ok(quotes)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Text of every match under `scope`, concatenated, then trimmed.
fn joined_text(scope: ElementRef<'_>, selector: &Selector) -> String {
    scope
        .select(selector)
        .flat_map(|el| el.text())
        .collect::<String>()
        .trim()
        .to_string()
}
