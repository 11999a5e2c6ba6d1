//! Language table scraping
//!
//! The wiki page layout is the most fragile input of the pipeline, so the
//! "find the table, read the code column" step sits behind the
//! [`LanguageTable`] trait. [`WikiLanguageTable`] knows the current layout of
//! the Minecraft Wiki "Language" page:
//!
//! ```text
//! <table data-description="Current language list">
//!   <tr><th>#</th> ... </tr>                       header, skipped
//!   <tr><td>1</td> ... <td>af_za</td> ... </tr>    code in the fifth cell
//! </table>
//! ```
//!
//! Rows with fewer than six cells, or whose first cell is not a plain
//! integer, are header/footer rows and are skipped.

use crate::error::{SleepError, SleepResult};
use crate::language_code::LanguageCode;
use crate::source::HttpSource;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info};

/// Locates the language table in a page and returns the raw code cells
pub trait LanguageTable: Send + Sync {
    /// Raw text of the code cell of every data row, in page order
    ///
    /// Fails with `SleepError::Parse` if the table is not present.
    fn raw_codes(&self, html: &str) -> SleepResult<Vec<String>>;
}

/// Strategy for the Minecraft Wiki "Language" page
#[derive(Debug, Clone)]
pub struct WikiLanguageTable {
    /// CSS selector for the table element
    pub table_selector: String,
    /// Zero-based index of the `td` holding the in-game code
    pub code_column: usize,
    /// Rows with fewer `td` cells than this are not data rows
    pub min_cells: usize,
}

impl Default for WikiLanguageTable {
    fn default() -> Self {
        Self {
            table_selector: r#"table[data-description="Current language list"]"#.to_string(),
            code_column: 4,
            min_cells: 6,
        }
    }
}

impl LanguageTable for WikiLanguageTable {
    fn raw_codes(&self, html: &str) -> SleepResult<Vec<String>> {
        let table_selector = parse_selector(&self.table_selector)?;
        let row_selector = parse_selector("tr")?;
        let cell_selector = parse_selector("td")?;

        let document = Html::parse_document(html);
        let table = document.select(&table_selector).next().ok_or_else(|| {
            SleepError::Parse(format!(
                "Could not find the language table ({}) on the page",
                self.table_selector
            ))
        })?;

        let mut codes = Vec::new();
        for row in table.select(&row_selector) {
            let cells: Vec<String> = row.select(&cell_selector).map(cell_text).collect();

            if cells.len() < self.min_cells.max(self.code_column + 1) {
                continue;
            }
            if !is_row_index(&cells[0]) {
                continue;
            }

            codes.push(cells[self.code_column].clone());
        }

        Ok(codes)
    }
}

fn parse_selector(selector: &str) -> SleepResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| SleepError::Parse(format!("Invalid selector '{}': {}", selector, e)))
}

/// Text nodes of a cell, each trimmed, joined without separator
fn cell_text(cell: ElementRef<'_>) -> String {
    cell.text().map(str::trim).collect()
}

fn is_row_index(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}

/// Turn raw cells into validated codes, dropping invalid ones and duplicates
pub fn codes_from_cells<I, S>(cells: I) -> Vec<LanguageCode>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut codes = Vec::new();
    for raw in cells {
        match LanguageCode::from_cell(raw.as_ref()) {
            Some(code) => {
                if seen.insert(code.clone()) {
                    codes.push(code);
                }
            }
            None => debug!("Skipping language cell '{}'", raw.as_ref()),
        }
    }
    codes
}

/// Fetch the wiki page and extract the supported language codes
///
/// # Returns
///
/// * `Ok(Vec<LanguageCode>)` - Codes in page order, without duplicates
/// * `Err(SleepError)` - If the page cannot be fetched or has no language table
pub async fn extract_language_codes(
    source: &dyn HttpSource,
    page_url: &str,
    table: &dyn LanguageTable,
) -> SleepResult<Vec<LanguageCode>> {
    info!("Fetching language list from {} via {}", page_url, source.source_name());
    let html = source.get_text(page_url).await?;

    let raw = table.raw_codes(&html)?;
    let codes = codes_from_cells(&raw);
    info!(
        "Extracted {} language codes from {} table rows",
        codes.len(),
        raw.len()
    );
    Ok(codes)
}
