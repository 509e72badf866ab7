//! Table lookups over scraped HTML.
//!
//! Every structural assumption about upstream markup goes through here so that a
//! markup change shows up as a single [`FetchError::MalformedSource`].

use crate::sources::error::FetchError;
use scraper::{ElementRef, Html, Selector};

/// Cell texts of one table, split into the header row and body rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn selector(url: &str, css: &str) -> Result<Selector, FetchError> {
    Selector::parse(css).map_err(|e| FetchError::malformed(url, format!("bad selector '{css}': {e}")))
}

/// Concatenated, whitespace-collapsed text of an element.
fn cell_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn row_cells(row: ElementRef<'_>, cell: &Selector) -> Vec<String> {
    row.select(cell).map(cell_text).collect()
}

/// The first `<table>` of the document with its `thead` header cells and
/// `tbody` data cells. Body rows without any `td` are dropped.
pub fn first_table(url: &str, html: &str) -> Result<ParsedTable, FetchError> {
    let document = Html::parse_document(html);
    let table = document
        .select(&selector(url, "table")?)
        .next()
        .ok_or_else(|| FetchError::malformed(url, "no <table> element found"))?;

    let thead = table
        .select(&selector(url, "thead")?)
        .next()
        .ok_or_else(|| FetchError::malformed(url, "table has no <thead>"))?;
    let th = selector(url, "th")?;
    let headers: Vec<String> = thead.select(&th).map(cell_text).collect();
    if headers.is_empty() {
        return Err(FetchError::malformed(url, "table header has no <th> cells"));
    }

    let tbody = table
        .select(&selector(url, "tbody")?)
        .next()
        .ok_or_else(|| FetchError::malformed(url, "table has no <tbody>"))?;
    let tr = selector(url, "tr")?;
    let td = selector(url, "td")?;
    let rows = tbody
        .select(&tr)
        .map(|row| row_cells(row, &td))
        .filter(|cells| !cells.is_empty())
        .collect();

    Ok(ParsedTable { headers, rows })
}

/// Data rows (`td` cells only) of the table whose `id` attribute is `table_id`.
pub fn table_rows_by_id(url: &str, html: &str, table_id: &str) -> Result<Vec<Vec<String>>, FetchError> {
    let document = Html::parse_document(html);
    let table_selector = selector(url, "table")?;
    let table = document
        .select(&table_selector)
        .find(|t| t.value().id() == Some(table_id))
        .ok_or_else(|| FetchError::malformed(url, format!("no table with id '{table_id}'")))?;

    let tr = selector(url, "tr")?;
    let td = selector(url, "td")?;
    Ok(table.select(&tr).map(|row| row_cells(row, &td)).collect())
}
