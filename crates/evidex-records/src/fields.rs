//! Lenient field readers shared by the provider modules.
//!
//! Provider payloads disagree on types (years as numbers or strings, ids as
//! numbers, authors as strings or objects) and occasionally send garbage.
//! These helpers read what they can and return `None` for the rest; none of
//! them fail.

use std::sync::LazyLock;

use evidex_core::DataTable;
use regex::Regex;
use serde_json::Value;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</?[A-Za-z][^<>]*>").expect("valid tag pattern"));

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\D)(\d{4})(?:\D|$)").expect("valid year pattern"));

const MIN_YEAR: i32 = 1800;
const MAX_YEAR: i32 = 2100;

/// Strip markup, collapse whitespace; blank input becomes `None`.
pub(crate) fn clean_text(raw: &str) -> Option<String> {
    let stripped = HTML_TAG.replace_all(raw, " ");
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

/// Read a string or number as cleaned text.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => clean_text(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First key present in `object` that reads as text.
pub(crate) fn text_field(object: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| object.get(key))
        .find_map(scalar_text)
}

/// Publication year from a number or a date-like string.
///
/// Years outside 1800..=2100 are rejected rather than guessed.
pub(crate) fn parse_year(value: &Value) -> Option<i32> {
    let year = match value {
        Value::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
        Value::String(s) => YEAR
            .captures(s)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok()),
        _ => None,
    }?;
    (MIN_YEAR..=MAX_YEAR).contains(&year).then_some(year)
}

/// First key present in `object` that parses as a year.
pub(crate) fn year_field(object: &Value, keys: &[&str]) -> Option<i32> {
    keys.iter()
        .filter_map(|key| object.get(key))
        .find_map(parse_year)
}

/// Author names from an array (strings or `{name}` objects) or a delimited
/// string. Empty names are dropped, never replaced by a placeholder.
pub(crate) fn author_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item {
                Value::Object(_) => text_field(item, &["name", "full_name", "fullName"]),
                other => scalar_text(other),
            })
            .collect(),
        Value::String(s) => split_authors(s),
        _ => Vec::new(),
    }
}

fn split_authors(raw: &str) -> Vec<String> {
    let trimmed = raw.trim().trim_end_matches('.');
    let delimiter = if trimmed.contains(';') { ';' } else { ',' };
    trimmed.split(delimiter).filter_map(clean_text).collect()
}

/// Boolean from `true`, `"Y"`, `"yes"`, `"true"`, or `1`.
pub(crate) fn flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|v| v != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" | "true" | "1" => Some(true),
            "n" | "no" | "false" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn cell_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(cells) => cells
            .iter()
            .map(|cell| scalar_text(cell).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    }
}

/// Tables attached by the full-text collaborator.
///
/// Each entry is an object with `caption` (or `label`), optional `header`,
/// and `rows`. Without an explicit header, a first row with no digits is
/// taken as the header. Tables with no rows are dropped.
pub(crate) fn parse_tables(value: &Value) -> Vec<DataTable> {
    let Value::Array(items) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let caption = text_field(item, &["caption", "label", "title"]).unwrap_or_default();
            let mut header = item.get("header").map(cell_list).unwrap_or_default();
            let mut rows: Vec<Vec<String>> = match item.get("rows") {
                Some(Value::Array(rows)) => rows
                    .iter()
                    .map(cell_list)
                    .filter(|row| !row.is_empty())
                    .collect(),
                _ => Vec::new(),
            };
            if header.is_empty()
                && rows.len() > 1
                && rows[0]
                    .iter()
                    .all(|cell| !cell.chars().any(|c| c.is_ascii_digit()))
            {
                header = rows.remove(0);
            }
            (!rows.is_empty()).then_some(DataTable {
                caption,
                header,
                rows,
            })
        })
        .collect()
}

/// Full text, tables, and open-access flag attached after retrieval.
///
/// These keys are shared by every provider because the full-text
/// collaborator enriches records regardless of where they came from.
#[derive(Debug, Default)]
pub(crate) struct Enrichment {
    pub full_text: Option<String>,
    pub tables: Vec<DataTable>,
    pub is_open_access: Option<bool>,
}

impl Enrichment {
    pub(crate) fn read(payload: &Value) -> Self {
        Self {
            full_text: ["full_text", "fullText", "body"]
                .iter()
                .filter_map(|key| payload.get(key))
                .find_map(|v| v.as_str().and_then(clean_text)),
            tables: ["tables", "table_data"]
                .iter()
                .filter_map(|key| payload.get(key))
                .map(parse_tables)
                .find(|tables| !tables.is_empty())
                .unwrap_or_default(),
            is_open_access: ["is_open_access", "isOpenAccess", "open_access"]
                .iter()
                .filter_map(|key| payload.get(key))
                .find_map(flag),
        }
    }
}
