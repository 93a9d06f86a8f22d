//! HTML table extraction for index-membership pages.
//!
//! Tables count in document order, nested tables included. Three kinds are
//! skipped and take no index: tables hidden by an inline `display:none` (on
//! the table or an ancestor), tables with no visible text, and tables that end
//! with neither a header nor a data row.
//!
//! Rows belong to their nearest enclosing table. The header row is the first
//! row made only of `<th>` cells; data rows are the rows after it that hold
//! at least one `<td>`. Cell positions count `<th>` and `<td>` alike, so a
//! row-header cell does not shift the columns.

use super::provider::ListingError;
use scraper::{ElementRef, Html, Selector};

/// One parsed table: header labels and cell text per data row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl HtmlTable {
    /// Position of a header label (exact match on trimmed text).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Non-empty values of a column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<String>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .filter_map(|row| row.get(idx))
                .filter(|v| !v.is_empty())
                .cloned()
                .collect(),
        )
    }
}

fn selector(css: &str) -> Result<Selector, ListingError> {
    Selector::parse(css)
        .map_err(|e| ListingError::SourceUnavailable(format!("bad selector {css}: {e:?}")))
}

/// Parse every displayed, non-empty table in the document.
pub fn parse_tables(html: &str) -> Result<Vec<HtmlTable>, ListingError> {
    let document = Html::parse_document(html);
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;

    let tables = document
        .select(&table_sel)
        .filter(|table| !is_hidden(*table) && has_text(*table))
        .map(|table| parse_table(table, &row_sel))
        .filter(|parsed| !parsed.headers.is_empty() || !parsed.rows.is_empty())
        .collect();
    Ok(tables)
}

fn is_hidden(el: ElementRef<'_>) -> bool {
    std::iter::once(el)
        .chain(el.ancestors().filter_map(ElementRef::wrap))
        .any(|e| e.value().attr("style").is_some_and(hides))
}

fn hides(style: &str) -> bool {
    let compact: String = style
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    compact.split(';').any(|decl| decl == "display:none")
}

fn has_text(table: ElementRef<'_>) -> bool {
    table.text().any(|t| !t.trim().is_empty())
}

fn parse_table(table: ElementRef<'_>, row_sel: &Selector) -> HtmlTable {
    let mut parsed = HtmlTable::default();
    let mut have_header = false;

    for row in table.select(row_sel) {
        if nearest_table(row).map(|t| t.id()) != Some(table.id()) {
            continue;
        }

        let cells: Vec<ElementRef<'_>> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|c| matches!(c.value().name(), "th" | "td"))
            .collect();
        if cells.is_empty() {
            continue;
        }

        let any_td = cells.iter().any(|c| c.value().name() == "td");
        if !have_header {
            if !any_td {
                parsed.headers = cells.iter().map(|c| cell_text(*c)).collect();
                have_header = true;
            }
            continue;
        }
        if any_td {
            parsed.rows.push(cells.iter().map(|c| cell_text(*c)).collect());
        }
    }

    parsed
}

fn nearest_table(el: ElementRef<'_>) -> Option<ElementRef<'_>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "table")
}

fn cell_text(cell: ElementRef<'_>) -> String {
    let raw: String = cell.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pull one column out of the `table_index`-th table of a page.
pub fn extract_column(
    html: &str,
    table_index: usize,
    column: &str,
) -> Result<Vec<String>, ListingError> {
    let tables = parse_tables(html)?;
    let count = tables.len();
    let table = tables.into_iter().nth(table_index).ok_or_else(|| {
        ListingError::SourceUnavailable(format!(
            "table {table_index} not found (page has {count} tables)"
        ))
    })?;

    table.column(column).ok_or_else(|| {
        ListingError::SourceUnavailable(format!(
            "column '{column}' not found in table {table_index} (headers: {})",
            table.headers.join(", ")
        ))
    })
}
