use super::model::{Column, RawColumn, RawValue, Relation, Table};

// ---------------------------------------------------------------------------
// Conversion options
// ---------------------------------------------------------------------------

/// Columns that are always written as numbers and never classified.
pub const DEFAULT_NUMERIC_COLUMNS: [&str; 2] = ["age", "result"];

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub numeric_columns: Vec<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            numeric_columns: DEFAULT_NUMERIC_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column classifier
// ---------------------------------------------------------------------------

/// Classify one raw column.
///
/// Phase 1 decodes byte-encoded values to text; a column with nothing to
/// decode is already numeric and passes through untouched. Phase 2 parses
/// every decoded value as `f32`: the column becomes numeric only when all
/// of them parse, otherwise it stays text as a whole.
pub fn classify(column: &RawColumn) -> Column {
    let Some(texts) = decode(column) else {
        log::debug!("{}: already numeric, passing through", column.name());
        return Column::Float(column.values.iter().map(value_as_f64).collect());
    };

    match parse_all(&texts) {
        Some(numbers) => {
            log::debug!("{}: decoded and parsed as f32", column.name());
            Column::Numeric(numbers)
        }
        None => {
            log::debug!("{}: kept as text", column.name());
            Column::Text(texts)
        }
    }
}

/// Decode every byte value as UTF-8. `None` when the column holds no bytes.
fn decode(column: &RawColumn) -> Option<Vec<String>> {
    if column.is_numeric() {
        return None;
    }
    let mut lossy = false;
    let texts = column
        .values
        .iter()
        .map(|v| match v.as_bytes() {
            Some(b) => match std::str::from_utf8(b) {
                Ok(s) => s.to_string(),
                Err(_) => {
                    lossy = true;
                    String::from_utf8_lossy(b).into_owned()
                }
            },
            None => v.as_f64().map(|n| n.to_string()).unwrap_or_default(),
        })
        .collect();
    if lossy {
        log::warn!("{}: invalid UTF-8 replaced", column.name());
    }
    Some(texts)
}

/// All-or-nothing `f32` parse.
fn parse_all(texts: &[String]) -> Option<Vec<f32>> {
    texts.iter().map(|t| t.trim().parse::<f32>().ok()).collect()
}

fn value_as_f64(value: &RawValue) -> f64 {
    match value {
        RawValue::Number(n) => *n,
        RawValue::Bytes(b) => std::str::from_utf8(b)
            .ok()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .unwrap_or(f64::NAN),
    }
}

// ---------------------------------------------------------------------------
// Whole-relation conversion
// ---------------------------------------------------------------------------

/// Convert every column of `relation`, keeping row and column order.
pub fn convert(relation: &Relation, options: &ConvertOptions) -> Table {
    let columns = relation
        .columns
        .iter()
        .map(|col| {
            let converted = if options.numeric_columns.iter().any(|n| n == col.name()) {
                Column::Float(col.values.iter().map(value_as_f64).collect())
            } else {
                classify(col)
            };
            (col.name().to_string(), converted)
        })
        .collect();
    Table::new(columns, relation.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Attribute, AttributeKind};

    fn bytes_column(name: &str, values: &[&str]) -> RawColumn {
        RawColumn {
            attribute: Attribute {
                name: name.into(),
                kind: AttributeKind::String,
            },
            values: values
                .iter()
                .map(|v| RawValue::Bytes(v.as_bytes().to_vec()))
                .collect(),
        }
    }

    fn numeric_column(name: &str, values: &[f64]) -> RawColumn {
        RawColumn {
            attribute: Attribute {
                name: name.into(),
                kind: AttributeKind::Numeric,
            },
            values: values.iter().copied().map(RawValue::Number).collect(),
        }
    }

    #[test]
    fn numeric_labels_become_f32() {
        let col = bytes_column("A1_Score", &["1", "0", " 1 "]);
        assert_eq!(classify(&col), Column::Numeric(vec![1.0, 0.0, 1.0]));
    }

    #[test]
    fn one_bad_value_keeps_whole_column_as_text() {
        let col = bytes_column("A2_Score", &["1", "?", "0"]);
        assert_eq!(
            classify(&col),
            Column::Text(vec!["1".into(), "?".into(), "0".into()])
        );
    }

    #[test]
    fn categorical_text_is_decoded() {
        let col = bytes_column("gender", &["m", "f"]);
        assert_eq!(classify(&col), Column::Text(vec!["m".into(), "f".into()]));
    }

    #[test]
    fn numeric_columns_pass_through_unchanged() {
        let col = numeric_column("score", &[1.5, f64::NAN]);
        match classify(&col) {
            Column::Float(v) => {
                assert_eq!(v[0], 1.5);
                assert!(v[1].is_nan());
            }
            other => panic!("expected passthrough, got {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_is_decoded_lossily_without_dropping_rows() {
        let mut col = bytes_column("name", &["ok"]);
        col.values.push(RawValue::Bytes(vec![0xff, b'a']));
        match classify(&col) {
            Column::Text(v) => {
                assert_eq!(v.len(), 2);
                assert_eq!(v[1], "\u{fffd}a");
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn convert_keeps_order_and_forces_fixed_columns_numeric() {
        let relation = Relation::new(
            "r",
            vec![
                numeric_column("age", &[26.0, 30.0]),
                bytes_column("gender", &["m", "f"]),
                bytes_column("result", &["6", "oops"]),
            ],
        );
        let table = convert(&relation, &ConvertOptions::default());
        assert_eq!(table.len(), 2);
        assert_eq!(table.headers(), vec!["age", "gender", "result"]);
        assert!(table.columns.iter().all(|(_, c)| c.len() == 2));
        assert_eq!(table.column("age"), Some(&Column::Float(vec![26.0, 30.0])));
        assert!(!table.column("gender").unwrap().is_numeric());
        match table.column("result") {
            Some(Column::Float(v)) => {
                assert_eq!(v[0], 6.0);
                assert!(v[1].is_nan());
            }
            other => panic!("expected numeric result column, got {other:?}"),
        }
    }

    #[test]
    fn custom_numeric_columns_replace_defaults() {
        let relation = Relation::new("r", vec![bytes_column("age", &["x"])]);
        let options = ConvertOptions {
            numeric_columns: vec!["other".into()],
        };
        let table = convert(&relation, &options);
        assert_eq!(table.column("age"), Some(&Column::Text(vec!["x".into()])));
    }
}
