use std::path::Path;

use anyhow::{Context, Result};

use super::model::{Attribute, AttributeKind, RawColumn, RawValue, Relation};
use crate::error::ArffError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load an attribute-relation (`.arff`) file from disk.
///
/// A missing or unreadable file is a hard error; nothing is retried.
pub fn load_file(path: &Path) -> Result<Relation> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading ARFF file {}", path.display()))?;
    let relation = parse_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    log::info!(
        "Loaded relation '{}' with {} rows and {} columns",
        relation.name,
        relation.len(),
        relation.columns.len()
    );
    log::debug!("Columns: {:?}", relation.column_names());
    Ok(relation)
}

/// Parse an ARFF document held in memory.
///
/// Layout:
/// ```text
/// % comment
/// @relation name
/// @attribute age numeric
/// @attribute gender {m,f}
/// @data
/// 26,'f'
/// ?,m
/// ```
pub fn parse_str(text: &str) -> Result<Relation, ArffError> {
    let mut relation_name = String::new();
    let mut attributes: Vec<Attribute> = Vec::new();
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));

    // -- Header --
    let mut saw_data = false;
    for (line_no, line) in lines.by_ref() {
        if line.is_empty() || line.starts_with('%') {
            continue;
        }
        let (keyword, rest) = split_keyword(line);
        match keyword.to_ascii_lowercase().as_str() {
            "@relation" => {
                let (name, _) = read_name(rest, line_no, "@relation")?;
                relation_name = name;
            }
            "@attribute" => {
                let attribute = parse_attribute(rest, line_no)?;
                log::debug!("attribute {} {}", attribute.name, attribute.kind);
                attributes.push(attribute);
            }
            "@data" => {
                saw_data = true;
                break;
            }
            _ => {
                return Err(ArffError::Malformed {
                    line: line_no,
                    what: "header line",
                })
            }
        }
    }

    if attributes.is_empty() {
        return Err(ArffError::NoAttributes);
    }
    if !saw_data {
        return Err(ArffError::MissingData);
    }

    // -- Data --
    let mut values: Vec<Vec<RawValue>> = vec![Vec::new(); attributes.len()];
    for (line_no, line) in lines {
        if line.is_empty() || line.starts_with('%') {
            continue;
        }
        if line.starts_with('{') {
            return Err(ArffError::SparseUnsupported { line: line_no });
        }
        let fields = split_fields(line, line_no)?;
        if fields.len() != attributes.len() {
            return Err(ArffError::FieldCount {
                line: line_no,
                expected: attributes.len(),
                found: fields.len(),
            });
        }
        for ((attr, field), column) in attributes.iter().zip(fields).zip(values.iter_mut()) {
            column.push(convert_field(attr, field, line_no)?);
        }
    }

    let columns = attributes
        .into_iter()
        .zip(values)
        .map(|(attribute, values)| RawColumn { attribute, values })
        .collect();
    Ok(Relation::new(relation_name, columns))
}

// ---------------------------------------------------------------------------
// Header helpers
// ---------------------------------------------------------------------------

fn split_keyword(line: &str) -> (&str, &str) {
    match line.find(char::is_whitespace) {
        Some(idx) => (&line[..idx], line[idx..].trim_start()),
        None => (line, ""),
    }
}

/// Read an optionally quoted name and return it with the remaining text.
fn read_name<'a>(
    text: &'a str,
    line: usize,
    what: &'static str,
) -> Result<(String, &'a str), ArffError> {
    let text = text.trim_start();
    match text.chars().next() {
        None => Err(ArffError::Malformed { line, what }),
        Some(q @ ('\'' | '"')) => {
            let (name, consumed) = read_quoted(&text[1..], q, line)?;
            Ok((name, text[1 + consumed..].trim_start()))
        }
        Some(_) => {
            let (name, rest) = split_keyword(text);
            Ok((name.to_string(), rest))
        }
    }
}

fn parse_attribute(rest: &str, line: usize) -> Result<Attribute, ArffError> {
    let (name, kind_text) = read_name(rest, line, "@attribute")?;
    if kind_text.is_empty() {
        return Err(ArffError::Malformed {
            line,
            what: "@attribute",
        });
    }

    let kind = if let Some(inner) = kind_text.strip_prefix('{') {
        let inner = inner.strip_suffix('}').ok_or(ArffError::Malformed {
            line,
            what: "nominal specification",
        })?;
        let labels = split_fields(inner, line)?
            .into_iter()
            .map(|f| f.text)
            .collect();
        AttributeKind::Nominal(labels)
    } else {
        let (type_word, format) = split_keyword(kind_text);
        match type_word.to_ascii_lowercase().as_str() {
            "numeric" | "real" | "integer" => AttributeKind::Numeric,
            "string" => AttributeKind::String,
            "date" if format.is_empty() => AttributeKind::Date(None),
            "date" => {
                let (pattern, _) = read_name(format, line, "date format")?;
                AttributeKind::Date(Some(pattern))
            }
            other => {
                return Err(ArffError::UnknownType {
                    line,
                    kind: other.to_string(),
                })
            }
        }
    };

    Ok(Attribute { name, kind })
}

// ---------------------------------------------------------------------------
// Field splitting
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
struct Field {
    text: String,
    quoted: bool,
}

impl Field {
    fn is_missing(&self) -> bool {
        !self.quoted && self.text == "?"
    }
}

/// Read up to the closing `quote`, resolving backslash escapes.
/// Returns the unescaped text and the number of bytes consumed,
/// closing quote included.
fn read_quoted(text: &str, quote: char, line: usize) -> Result<(String, usize), ArffError> {
    let mut out = String::new();
    let mut chars = text.char_indices();
    while let Some((idx, c)) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 't')) => out.push('\t'),
                Some((_, other)) => out.push(other),
                None => break,
            },
            c if c == quote => return Ok((out, idx + c.len_utf8())),
            c => out.push(c),
        }
    }
    Err(ArffError::UnterminatedQuote { line })
}

/// Split a comma-separated line, honouring single and double quotes.
fn split_fields(line: &str, line_no: usize) -> Result<Vec<Field>, ArffError> {
    let mut fields = Vec::new();
    let mut rest = line;
    loop {
        rest = rest.trim_start();
        let field = match rest.chars().next() {
            Some(q @ ('\'' | '"')) => {
                let (text, consumed) = read_quoted(&rest[1..], q, line_no)?;
                rest = rest[1 + consumed..].trim_start();
                Field { text, quoted: true }
            }
            _ => {
                let end = rest.find(',').unwrap_or(rest.len());
                let text = rest[..end].trim().to_string();
                rest = &rest[end..];
                Field {
                    text,
                    quoted: false,
                }
            }
        };
        fields.push(field);

        match rest.strip_prefix(',') {
            Some(after) => rest = after,
            None if rest.is_empty() => break,
            None => {
                return Err(ArffError::Malformed {
                    line: line_no,
                    what: "data row",
                })
            }
        }
    }
    Ok(fields)
}

fn convert_field(attr: &Attribute, field: Field, line: usize) -> Result<RawValue, ArffError> {
    match &attr.kind {
        AttributeKind::Numeric => {
            if field.is_missing() {
                return Ok(RawValue::Number(f64::NAN));
            }
            field
                .text
                .trim()
                .parse::<f64>()
                .map(RawValue::Number)
                .map_err(|_| ArffError::NotANumber {
                    line,
                    attribute: attr.name.clone(),
                    value: field.text,
                })
        }
        AttributeKind::Nominal(labels) => {
            if !field.is_missing() && !labels.contains(&field.text) {
                return Err(ArffError::UndeclaredLabel {
                    line,
                    attribute: attr.name.clone(),
                    value: field.text,
                });
            }
            Ok(RawValue::Bytes(field.text.into_bytes()))
        }
        AttributeKind::String | AttributeKind::Date(_) => {
            Ok(RawValue::Bytes(field.text.into_bytes()))
        }
    }
}
