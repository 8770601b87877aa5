//! Column schema of the table that directly follows a section header.
//!
//! Accepted layout, with at most one blank line between header and table:
//!
//! ```text
//! ## Resources
//!
//! | Name | Type |
//! |------|------|
//! | aws_s3_bucket.this | resource |
//! ```

use crate::config::TableRequirement;
use crate::core::Finding;
use crate::document::Document;
use crate::rules::Rule;

/// A pipe-delimited table block with trimmed cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock {
    pub header: Vec<String>,
    pub separator: bool,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableLookupError {
    HeaderNotFound,
    NoTable,
}

/// Locate the table after the first line equal to `header`.
pub fn find_table(document: &Document, header: &str) -> Result<TableBlock, TableLookupError> {
    let header = header.trim_end();
    let mut lines = document.lines().skip_while(|line| *line != header);
    if lines.next().is_none() {
        return Err(TableLookupError::HeaderNotFound);
    }

    let mut first = lines.next();
    if matches!(first, Some(line) if line.trim().is_empty()) {
        first = lines.next();
    }
    let header_cells = first.and_then(parse_row).ok_or(TableLookupError::NoTable)?;

    let mut block = TableBlock {
        header: header_cells,
        separator: false,
        rows: Vec::new(),
    };
    for line in lines {
        let Some(cells) = parse_row(line) else {
            break;
        };
        if !block.separator && block.rows.is_empty() && is_separator(&cells) {
            block.separator = true;
            continue;
        }
        block.rows.push(cells);
    }
    Ok(block)
}

fn parse_row(line: &str) -> Option<Vec<String>> {
    let line = line.trim();
    if line.len() < 2 || !line.starts_with('|') || !line.ends_with('|') {
        return None;
    }
    Some(split_cells(&line[1..line.len() - 1]))
}

/// Split on unescaped pipes; `\|` stays inside the cell as `|`.
fn split_cells(inner: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => {
                cells.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

fn is_separator(cells: &[String]) -> bool {
    cells.iter().all(|cell| {
        cell.contains('-') && cell.chars().all(|c| c == '-' || c == ':')
    })
}

/// First difference between expected and actual columns, as a message.
fn column_mismatch(expected: &[String], found: &[String]) -> Option<String> {
    let index = (0..expected.len().max(found.len()))
        .find(|&i| expected.get(i) != found.get(i))?;

    let message = match (expected.get(index), found.get(index)) {
        (Some(want), Some(got)) if expected.contains(got) => format!(
            "column order mismatch at index {}: expected '{}', found '{}'",
            index, want, got
        ),
        (Some(want), Some(got)) => format!(
            "column name mismatch at index {}: expected '{}', found '{}'",
            index, want, got
        ),
        (Some(want), None) => format!(
            "column count mismatch: expected {} columns, found {}; missing '{}' at index {}",
            expected.len(),
            found.len(),
            want,
            index
        ),
        (None, Some(got)) => format!(
            "column count mismatch: expected {} columns, found {}; unexpected '{}' at index {}",
            expected.len(),
            found.len(),
            got,
            index
        ),
        (None, None) => return None,
    };
    Some(message)
}

pub struct TableRule {
    requirement: TableRequirement,
}

impl TableRule {
    pub fn new(requirement: TableRequirement) -> Self {
        Self { requirement }
    }
}

impl Rule for TableRule {
    fn id(&self) -> &str {
        "table_schema"
    }

    fn name(&self) -> &str {
        "Table column schema"
    }

    fn check(&self, document: &Document) -> Finding {
        let header = self.requirement.header_line();
        let block = match find_table(document, &header) {
            Ok(block) => block,
            Err(TableLookupError::HeaderNotFound) => {
                return Finding::fail(
                    self.id(),
                    &header,
                    format!("header '{}' not found", header),
                );
            }
            Err(TableLookupError::NoTable) => {
                return Finding::fail(
                    self.id(),
                    &header,
                    format!("no table found after header '{}'", header),
                );
            }
        };

        match column_mismatch(&self.requirement.columns, &block.header) {
            Some(message) => Finding::fail(self.id(), &header, message),
            None => Finding::pass(
                self.id(),
                &header,
                format!(
                    "table after '{}' has columns [{}] ({} data rows)",
                    header,
                    block.header.join(", "),
                    block.rows.len()
                ),
            ),
        }
    }
}
