/// Palette reducer: pick an image, cluster its colors, write the result.
///
/// ```text
///   picker ──► format (allow-list) ──► image decode ──► color::normalize
///                                                          │
///                                                          ▼
///   save compressed_<name> ◄── color::denormalize ◄── kmeans (mini-batch)
/// ```

pub mod format;
pub mod kmeans;
pub mod picker;
pub mod pipeline;
