use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use image::{ImageBuffer, Rgb, RgbImage};

use super::format::{output_name, validate_selection};
use super::kmeans::MiniBatchKMeans;
use super::picker::FilePicker;
use crate::color;
use crate::error::ReduceError;

// ---------------------------------------------------------------------------
// Options / report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ReduceOptions {
    /// Target number of colors (K).
    pub colors: usize,
    /// Directory receiving `compressed_<name>`.
    pub output_dir: PathBuf,
    pub seed: Option<u64>,
    pub batch_size: usize,
    pub max_iter: usize,
    /// Early-stop patience in mini-batch steps; `0` disables it.
    pub max_no_improvement: usize,
}

impl ReduceOptions {
    /// Options for `colors` clusters; zero or negative counts are rejected.
    pub fn new(colors: i64) -> Result<Self, ReduceError> {
        if colors <= 0 {
            return Err(ReduceError::InvalidColorCount(colors));
        }
        Ok(Self {
            colors: colors as usize,
            output_dir: PathBuf::from("."),
            seed: None,
            batch_size: MiniBatchKMeans::DEFAULT_BATCH_SIZE,
            max_iter: MiniBatchKMeans::DEFAULT_MAX_ITER,
            max_no_improvement: MiniBatchKMeans::DEFAULT_MAX_NO_IMPROVEMENT,
        })
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct Report {
    pub input: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Distinct colors in the reduced raster, counted before encoding.
    /// Lossy encoders (JPEG) may add colors to the file on disk.
    pub colors: usize,
    /// Wall-clock time from selection to saved file.
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Pick an image, reduce its palette and save the result.
///
/// The written file keeps the input's dimensions. PNG, GIF and TIFF keep at
/// most `options.colors` colors; JPEG re-encoding may blend neighbours.
pub fn compress(picker: &dyn FilePicker, options: &ReduceOptions) -> Result<Report> {
    let input = validate_selection(picker.pick())?;
    let started = Instant::now();

    let image = image::open(&input)
        .with_context(|| format!("decoding {}", input.display()))?
        .to_rgb8();
    let (width, height) = image.dimensions();
    log::info!("Loaded {} ({width}x{height})", input.display());

    let reduced = reduce(&image, options)?;
    let colors = distinct_colors(&reduced);

    let output = options.output_dir.join(output_name(&input)?);
    reduced
        .save(&output)
        .with_context(|| format!("saving {}", output.display()))?;
    log::info!("Wrote {} with {colors} colors", output.display());

    Ok(Report {
        input,
        output,
        width,
        height,
        colors,
        elapsed: started.elapsed(),
    })
}

/// Replace every pixel by the center of its cluster.
pub fn reduce(image: &RgbImage, options: &ReduceOptions) -> Result<RgbImage, ReduceError> {
    let points = color::normalize(image);
    let model = MiniBatchKMeans::new(options.colors)
        .batch_size(options.batch_size)
        .max_iter(options.max_iter)
        .max_no_improvement(options.max_no_improvement)
        .seed(options.seed)
        .fit(&points)?;
    log::debug!("Fitted {} centers in {} steps", options.colors, model.steps());

    let palette: Vec<Rgb<u8>> = model.centers().iter().map(|&c| color::denormalize(c)).collect();
    let labels = model.predict(&points);
    let width = image.width();
    Ok(ImageBuffer::from_fn(width, image.height(), |x, y| {
        palette[labels[(y as usize) * (width as usize) + x as usize]]
    }))
}

pub fn distinct_colors(image: &RgbImage) -> usize {
    image.pixels().map(|p| p.0).collect::<HashSet<_>>().len()
}
