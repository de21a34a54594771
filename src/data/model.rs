use std::fmt;

// ---------------------------------------------------------------------------
// RawValue – a single cell as the ARFF reader hands it over
// ---------------------------------------------------------------------------

/// A cell straight out of the `@data` section.
///
/// Nominal, string and date attributes arrive byte-encoded; numeric
/// attributes arrive as `f64` with `?` mapped to NaN.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Bytes(Vec<u8>),
    Number(f64),
}

impl RawValue {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RawValue::Bytes(b) => Some(b),
            RawValue::Number(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Number(v) => Some(*v),
            RawValue::Bytes(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Attribute declarations
// ---------------------------------------------------------------------------

/// Declared type of an `@attribute` line.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeKind {
    /// `numeric`, `real` or `integer`.
    Numeric,
    /// `{a, b, c}` – the allowed labels in declaration order.
    Nominal(Vec<String>),
    String,
    /// `date` with an optional format pattern, kept verbatim.
    Date(Option<String>),
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeKind::Numeric => write!(f, "numeric"),
            AttributeKind::Nominal(labels) => write!(f, "{{{}}}", labels.join(",")),
            AttributeKind::String => write!(f, "string"),
            AttributeKind::Date(Some(fmt_str)) => write!(f, "date {fmt_str}"),
            AttributeKind::Date(None) => write!(f, "date"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
}

// ---------------------------------------------------------------------------
// RawColumn / Relation – the parsed input
// ---------------------------------------------------------------------------

/// One attribute together with every value it takes, in row order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub attribute: Attribute,
    pub values: Vec<RawValue>,
}

impl RawColumn {
    pub fn name(&self) -> &str {
        &self.attribute.name
    }

    /// True when no value in the column is byte-encoded.
    pub fn is_numeric(&self) -> bool {
        self.values.iter().all(|v| matches!(v, RawValue::Number(_)))
    }
}

/// The complete parsed ARFF file, column-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    pub name: String,
    pub columns: Vec<RawColumn>,
    rows: usize,
}

impl Relation {
    /// Build a relation from columns that all share the same length.
    pub fn new(name: impl Into<String>, columns: Vec<RawColumn>) -> Self {
        let rows = columns.first().map_or(0, |c| c.values.len());
        debug_assert!(columns.iter().all(|c| c.values.len() == rows));
        Relation {
            name: name.into(),
            columns,
            rows,
        }
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(RawColumn::name).collect()
    }
}

// ---------------------------------------------------------------------------
// Column / Table – the converted output
// ---------------------------------------------------------------------------

/// A fully classified output column. A column is never a mix of kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    /// Decoded text that parsed as `f32` for every row.
    Numeric(Vec<f32>),
    /// A numeric attribute passed through untouched.
    Float(Vec<f64>),
    /// Decoded text kept as-is.
    Text(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Column::Text(_))
    }

    /// Render one cell the way it is written to CSV.
    pub fn cell(&self, row: usize) -> String {
        match self {
            Column::Numeric(v) => format_float(v[row]),
            Column::Float(v) => format_float(v[row]),
            Column::Text(v) => v[row].clone(),
        }
    }
}

/// Render a float the way Python's `repr` does, which is what pandas
/// writes: NaN becomes an empty field, magnitudes outside `[1e-4, 1e16)`
/// use exponent form (`1e+20`, `1.5e-05`), integral values keep one
/// decimal (`26.0`), everything else is the shortest round-trip text.
fn format_float<T>(v: T) -> String
where
    T: Copy + Into<f64> + fmt::Display + fmt::LowerExp,
{
    let x: f64 = v.into();
    if x.is_nan() {
        return String::new();
    }
    let mag = x.abs();
    if x.is_finite() && mag != 0.0 && !(1e-4..1e16).contains(&mag) {
        let text = format!("{v:e}");
        let (mantissa, exp) = text.split_once('e').unwrap_or((&text, "0"));
        let exp: i32 = exp.parse().unwrap_or(0);
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exp.abs());
    }
    if x.is_finite() && x.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Ordered, named output columns sharing one row count.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub columns: Vec<(String, Column)>,
    rows: usize,
}

impl Table {
    pub fn new(columns: Vec<(String, Column)>, rows: usize) -> Self {
        debug_assert!(columns.iter().all(|(_, c)| c.len() == rows));
        Table { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c)
    }

    /// Cells of one row, in column order.
    pub fn row(&self, index: usize) -> Vec<String> {
        self.columns.iter().map(|(_, c)| c.cell(index)).collect()
    }
}
