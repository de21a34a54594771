use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use rusty_palette::data::coerce::DEFAULT_NUMERIC_COLUMNS;
use rusty_palette::data::{loader, writer};
use rusty_palette::{convert, ConvertOptions};

/// Convert an ARFF file to CSV, turning numeric-looking categorical
/// columns into numbers.
#[derive(Parser, Debug)]
#[command(name = "arff-to-csv", version)]
struct Cli {
    /// Input attribute-relation file
    #[arg(short, long, default_value = "autism_adult_data.arff")]
    input: PathBuf,

    /// Output CSV file, overwritten if present
    #[arg(short, long, default_value = "autism_adult.csv")]
    output: PathBuf,

    /// Columns always written as numbers (repeatable)
    #[arg(long = "numeric-column", value_name = "NAME", default_values_t = DEFAULT_NUMERIC_COLUMNS.map(String::from))]
    numeric_columns: Vec<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let relation = loader::load_file(&cli.input)?;
    let options = ConvertOptions {
        numeric_columns: cli.numeric_columns,
    };
    let table = convert(&relation, &options);
    writer::write_csv(&table, &cli.output)
}
