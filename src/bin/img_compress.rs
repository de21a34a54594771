use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;

use rusty_palette::quantize::kmeans::MiniBatchKMeans;
use rusty_palette::{compress, DialogPicker, FilePicker, FixedPicker, ReduceError, ReduceOptions};

/// Reduce an image to a fixed number of colors with mini-batch K-means.
#[derive(Parser, Debug)]
#[command(name = "img-compress", version)]
struct Cli {
    /// Number of colors in the output image
    #[arg(allow_negative_numbers = true)]
    colors: Option<i64>,

    /// Image to process instead of opening a file dialog
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory that receives compressed_<name>
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Seed for reproducible clustering
    #[arg(long)]
    seed: Option<u64>,

    /// Samples per mini-batch
    #[arg(long, default_value_t = MiniBatchKMeans::DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Maximum number of passes over the pixels
    #[arg(long, default_value_t = MiniBatchKMeans::DEFAULT_MAX_ITER)]
    max_iter: usize,

    /// Stop after this many mini-batches without improvement (0 disables)
    #[arg(long, default_value_t = MiniBatchKMeans::DEFAULT_MAX_NO_IMPROVEMENT)]
    max_no_improvement: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let Some(colors) = cli.colors else {
        println!(
            "No number of colors specified.\n\
             Re-run the script specifying the number of desired colors."
        );
        process::exit(1);
    };

    let mut options = match ReduceOptions::new(colors) {
        Ok(options) => options,
        Err(e) => {
            println!("{e}");
            process::exit(1);
        }
    };
    options.output_dir = cli.output_dir;
    options.seed = cli.seed;
    options.batch_size = cli.batch_size;
    options.max_iter = cli.max_iter;
    options.max_no_improvement = cli.max_no_improvement;

    let picker: Box<dyn FilePicker> = match cli.input {
        Some(path) => Box::new(FixedPicker::new(path)),
        None => Box::new(DialogPicker),
    };

    match compress(picker.as_ref(), &options) {
        Ok(report) => {
            println!("Runtime:::: {:.2} seconds", report.elapsed.as_secs_f64());
            Ok(())
        }
        Err(err) => match err.downcast_ref::<ReduceError>() {
            Some(e @ (ReduceError::UnsupportedImage | ReduceError::TooManyColors { .. })) => {
                println!("{e}");
                process::exit(1);
            }
            _ => Err(err),
        },
    }
}
