//! Two small data utilities: an ARFF-to-CSV converter with per-column type
//! inference, and a K-means palette reducer for raster images.

pub mod color;
pub mod data;
pub mod error;
pub mod quantize;

pub use data::coerce::{classify, convert, ConvertOptions};
pub use data::model::{Column, RawColumn, RawValue, Relation, Table};
pub use error::{ArffError, ReduceError};
pub use quantize::picker::{DialogPicker, FilePicker, FixedPicker};
pub use quantize::pipeline::{compress, ReduceOptions, Report};
