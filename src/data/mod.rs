/// Converter data layer: parsing, column classification, and CSV output.
///
/// Architecture:
/// ```text
///   .arff
///     │
///     ▼
///   ┌──────────┐
///   │  loader   │  parse file → Relation (byte / f64 cells)
///   └──────────┘
///     │
///     ▼
///   ┌──────────┐
///   │  coerce   │  per-column decode + all-or-nothing f32 parse → Table
///   └──────────┘
///     │
///     ▼
///   ┌──────────┐
///   │  writer   │  Table → .csv
///   └──────────┘
/// ```

pub mod coerce;
pub mod loader;
pub mod model;
pub mod writer;
