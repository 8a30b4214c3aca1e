use anyhow::{Result, bail};
use memchr::{memchr, memchr_iter, memchr3};
use tracing::debug;

use crate::error::{BasketError, ErrorCode};
use crate::models::transaction::Transaction;

/// Separator between item tokens inside the items field.
pub const ITEM_SEPARATOR: &str = ", ";

/// Default name of the CSV column holding the items.
pub const DEFAULT_ITEMS_COLUMN: &str = "Items";

/// Ordered, immutable sequence of transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
}

impl TransactionStore {
    /// Build a store from raw item fields, one per transaction.
    pub fn from_rows<I, S>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let transactions = rows
            .into_iter()
            .enumerate()
            .map(|(row, field)| split_items(row, field.as_ref()).map(Transaction::new))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { transactions })
    }

    /// Build a store from transactions that are already split into items.
    pub fn from_item_lists(lists: Vec<Vec<String>>) -> Result<Self> {
        let transactions = lists
            .into_iter()
            .enumerate()
            .map(|(row, items)| {
                if items.is_empty() {
                    bail!(BasketError::data_format(row, "transaction has no items"));
                }
                let items = items
                    .into_iter()
                    .enumerate()
                    .map(|(pos, item)| {
                        let trimmed = item.trim();
                        if trimmed.is_empty() {
                            bail!(BasketError::data_format(
                                row,
                                format!("empty item at position {pos}"),
                            ));
                        }
                        Ok(trimmed.to_string())
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Transaction::new(items))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { transactions })
    }

    /// Read a CSV document with a header row and take the items from
    /// the column named `items_column`.
    ///
    /// Row numbers in errors count physical lines after the header, blank
    /// lines included, starting at 0.
    pub fn from_csv(content: &str, items_column: &str) -> Result<Self> {
        let mut records = parse_records(content)?.into_iter();

        let header = records.next().ok_or_else(|| {
            BasketError::new(ErrorCode::DataFormat, "Dataset is empty: missing header row")
        })?;
        let column = header
            .fields
            .iter()
            .position(|name| name.trim().trim_start_matches('\u{feff}') == items_column)
            .ok_or_else(|| {
                BasketError::new(
                    ErrorCode::DataFormat,
                    format!("Column \"{items_column}\" not found in header"),
                )
            })?;

        let mut transactions = Vec::new();
        for record in records {
            let row = record.line - header.line - 1;
            let field = record.fields.into_iter().nth(column).ok_or_else(|| {
                BasketError::data_format(row, format!("missing \"{items_column}\" column"))
            })?;
            transactions.push(Transaction::new(split_items(row, &field)?));
        }

        let store = Self { transactions };
        debug!(
            transactions = store.len(),
            column = items_column,
            "transactions loaded from csv"
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }
}

/// Split one items field into its tokens.
pub fn split_items(row: usize, field: &str) -> Result<Vec<String>> {
    if field.trim().is_empty() {
        bail!(BasketError::data_format(row, "empty item field"));
    }

    field
        .split(ITEM_SEPARATOR)
        .enumerate()
        .map(|(pos, token)| {
            let token = token.trim();
            if token.is_empty() {
                bail!(BasketError::data_format(
                    row,
                    format!("empty item at position {pos}"),
                ));
            }
            Ok(token.to_string())
        })
        .collect()
}

/// One CSV record and the 0-based physical line it starts on.
#[derive(Debug, PartialEq)]
struct Record {
    line: usize,
    fields: Vec<String>,
}

/// Parse CSV text into records of fields.
///
/// Handles double-quoted fields (with `""` escapes and embedded newlines)
/// and CRLF line endings. Blank lines are dropped but still advance the
/// line count.
fn parse_records(content: &str) -> Result<Vec<Record>> {
    let bytes = content.as_bytes();
    let mut records: Vec<Record> = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut pos = 0;
    let mut line = 0;
    let mut start = 0;

    while pos < bytes.len() {
        if in_quotes {
            let Some(off) = memchr(b'"', &bytes[pos..]) else {
                break;
            };
            line += memchr_iter(b'\n', &bytes[pos..pos + off]).count();
            field.push_str(&content[pos..pos + off]);
            pos += off + 1;
            if bytes.get(pos) == Some(&b'"') {
                field.push('"');
                pos += 1;
            } else {
                in_quotes = false;
            }
            continue;
        }

        match memchr3(b',', b'"', b'\n', &bytes[pos..]) {
            None => {
                field.push_str(&content[pos..]);
                pos = bytes.len();
            }
            Some(off) => {
                field.push_str(&content[pos..pos + off]);
                let delim = bytes[pos + off];
                pos += off + 1;
                match delim {
                    b',' => fields.push(std::mem::take(&mut field)),
                    b'"' => in_quotes = true,
                    _ => {
                        end_record(&mut records, start, &mut fields, &mut field);
                        line += 1;
                        start = line;
                    }
                }
            }
        }
    }

    if in_quotes {
        let row = match records.first() {
            Some(header) => start - header.line - 1,
            None => 0,
        };
        bail!(BasketError::data_format(row, "unterminated quoted field"));
    }
    if !field.is_empty() || !fields.is_empty() {
        end_record(&mut records, start, &mut fields, &mut field);
    }

    Ok(records)
}

fn end_record(records: &mut Vec<Record>, line: usize, fields: &mut Vec<String>, field: &mut String) {
    if field.ends_with('\r') {
        field.pop();
    }
    fields.push(std::mem::take(field));
    let done = std::mem::take(fields);
    let blank = done.len() == 1 && done[0].trim().is_empty();
    if !blank {
        records.push(Record { line, fields: done });
    }
}
