use std::path::PathBuf;

use thiserror::Error;

use crate::quantize::format::SUPPORTED_FORMATS;

/// Errors raised while reading an ARFF document. Line numbers are 1-based.
#[derive(Debug, Error, PartialEq)]
pub enum ArffError {
    #[error("line {line}: unknown attribute type '{kind}'")]
    UnknownType { line: usize, kind: String },

    #[error("line {line}: malformed {what}")]
    Malformed { line: usize, what: &'static str },

    #[error("line {line}: unterminated quote")]
    UnterminatedQuote { line: usize },

    #[error("line {line}: expected {expected} values, found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: '{value}' is not a number (attribute '{attribute}')")]
    NotANumber {
        line: usize,
        attribute: String,
        value: String,
    },

    #[error("line {line}: '{value}' is not a declared label of '{attribute}'")]
    UndeclaredLabel {
        line: usize,
        attribute: String,
        value: String,
    },

    #[error("line {line}: sparse data rows are not supported")]
    SparseUnsupported { line: usize },

    #[error("no @attribute declarations found")]
    NoAttributes,

    #[error("missing @data section")]
    MissingData,
}

/// User-input failures of the palette reducer.
#[derive(Debug, Error)]
pub enum ReduceError {
    #[error("the number of colors must be a positive integer, got {0}")]
    InvalidColorCount(i64),

    #[error("No image selected. You can select: {} formats", format_list())]
    UnsupportedImage,

    #[error("image has no pixels")]
    EmptyImage,

    #[error("cannot reduce to {k} colors: the image has only {pixels} pixels")]
    TooManyColors { k: usize, pixels: usize },

    #[error("cannot derive an output name from {0}")]
    InvalidPath(PathBuf),
}

fn format_list() -> String {
    let quoted: Vec<String> = SUPPORTED_FORMATS.iter().map(|f| format!("'{f}'")).collect();
    format!("[{}]", quoted.join(", "))
}
