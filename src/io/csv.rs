use csv::{ReaderBuilder, StringRecord};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::fs;
use std::path::Path;

use crate::config::TableSchema;
use crate::core::records::TableKind;
use crate::error::{Error, Result};

const BOM: char = '\u{feff}';

/// Strip one layer of enclosing quotes from a raw CSV line
///
/// Surrounding whitespace is always removed, then one leading and one
/// trailing quote. When every quote left inside is a doubled `""` the line
/// was a single escaped field, and those pairs are unescaped.
pub fn strip_wrapping_quotes(line: &str) -> Cow<'_, str> {
    let trimmed = line.trim().trim_start_matches(BOM);

    let inner = match trimmed.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(inner) => inner,
        None => return Cow::Borrowed(trimmed),
    };

    if inner.contains("\"\"") && only_escaped_quotes(inner) {
        Cow::Owned(inner.replace("\"\"", "\""))
    } else {
        Cow::Borrowed(inner)
    }
}

fn only_escaped_quotes(text: &str) -> bool {
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '"' && chars.next() != Some('"') {
            return false;
        }
    }
    true
}

/// Field count of a well-formed CSV line, `None` when its quoting is broken
///
/// Well-formed means a quote only opens a field, closes it right before a
/// delimiter or the end of the line, or is doubled inside a quoted field.
fn field_count(line: &str) -> Option<usize> {
    let mut fields = 1;
    let mut at_field_start = true;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ',' => {
                fields += 1;
                at_field_start = true;
                continue;
            }
            '"' if at_field_start => {
                loop {
                    match chars.next() {
                        Some('"') if chars.peek() == Some(&'"') => {
                            chars.next();
                        }
                        Some('"') => break,
                        Some(_) => {}
                        None => return None,
                    }
                }
                if !matches!(chars.peek(), None | Some(',')) {
                    return None;
                }
            }
            '"' => return None,
            _ => {}
        }
        at_field_start = false;
    }

    Some(fields)
}

/// Strip the wrapping layer from every line of a quote-wrapped table,
/// dropping blank lines
///
/// A line keeps its outer quotes only when it already is a well-formed row
/// of the header's width and the unwrapped text is not. The header itself is
/// unwrapped unless it already has several well-formed fields.
pub fn clean_quoted_lines(content: &str) -> String {
    let mut cleaned = String::with_capacity(content.len());
    let mut width: Option<usize> = None;

    for line in content.lines() {
        let raw = line.trim().trim_start_matches(BOM);
        let unwrapped = strip_wrapping_quotes(raw);

        let keep_raw = match width {
            None => field_count(raw).map_or(false, |n| n > 1),
            Some(width) => field_count(raw) == Some(width) && field_count(&unwrapped) != Some(width),
        };
        let line = if keep_raw { Cow::Borrowed(raw) } else { unwrapped };
        if line.is_empty() {
            continue;
        }

        if width.is_none() {
            width = field_count(&line);
        }
        cleaned.push_str(&line);
        cleaned.push('\n');
    }
    cleaned
}

/// Read one table from disk
///
/// The whole file is read first so quote-wrapped tables can be cleaned
/// before structured parsing.
pub fn read_table<T, P>(path: P, table: TableKind, schema: &TableSchema, quote_wrapped: bool) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let content = fs::read_to_string(path.as_ref()).map_err(Error::Io)?;
    let content = content.trim_start_matches(BOM);

    if quote_wrapped {
        parse_table(&clean_quoted_lines(content), table, schema)
    } else {
        parse_table(content, table, schema)
    }
}

/// Parse CSV text into typed rows, checking the header against `schema`
///
/// Required columns must be present. Absent optional columns are appended to
/// the header and every record carries the configured default for them.
/// Any row that fails to parse aborts the whole table.
pub fn parse_table<T>(content: &str, table: TableKind, schema: &TableSchema) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut headers = rdr
        .headers()
        .map_err(|e| malformed(table, 1, e))?
        .clone();

    for column in &schema.required {
        if !headers.iter().any(|h| h == column) {
            return Err(Error::MissingColumn {
                table,
                column: column.clone(),
            });
        }
    }

    // Defaults for optional columns the file does not have
    let mut injected: Vec<&str> = Vec::new();
    for (column, default) in &schema.optional {
        if !headers.iter().any(|h| h == column) {
            log::debug!("{}: column '{}' absent, using default {:?}", table, column, default);
            headers.push_field(column);
            injected.push(default);
        }
    }

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    loop {
        let has_row = rdr
            .read_record(&mut record)
            .map_err(|e| {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                malformed(table, line, e)
            })?;
        if !has_row {
            break;
        }

        let line = record.position().map(|p| p.line()).unwrap_or(0);
        for default in &injected {
            record.push_field(default);
        }

        let row: T = record
            .deserialize(Some(&headers))
            .map_err(|e| malformed(table, line, e))?;
        rows.push(row);
    }

    Ok(rows)
}

fn malformed(table: TableKind, line: u64, err: csv::Error) -> Error {
    Error::MalformedRow {
        table,
        line,
        message: err.to_string(),
    }
}
