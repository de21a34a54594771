use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Write a synthetic adult autism-screening dataset in ARFF format.
#[derive(Parser, Debug)]
#[command(name = "generate-sample", version)]
struct Cli {
    /// Destination file
    #[arg(short, long, default_value = "autism_adult_data.arff")]
    output: PathBuf,

    /// Number of records
    #[arg(short = 'n', long, default_value_t = 200)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const ETHNICITIES: [&str; 8] = [
    "White-European",
    "Latino",
    "Others",
    "Black",
    "Asian",
    "Middle Eastern ",
    "South Asian",
    "Hispanic",
];
const COUNTRIES: [&str; 6] = [
    "United States",
    "Brazil",
    "Spain",
    "New Zealand",
    "Jordan",
    "United Kingdom",
];
const RELATIONS: [&str; 5] = ["Self", "Parent", "Health care professional", "Relative", "Others"];

/// Single-quote labels containing anything but plain word characters.
fn quote(label: &str) -> String {
    if label.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        label.to_string()
    } else {
        format!("'{}'", label.replace('\'', "\\'"))
    }
}

fn nominal(labels: &[&str]) -> String {
    let quoted: Vec<String> = labels.iter().map(|l| quote(l)).collect();
    format!("{{{}}}", quoted.join(","))
}

/// A label, or `?` with probability `missing`.
fn pick_or_missing(rng: &mut StdRng, labels: &[&str], missing: f64) -> String {
    if rng.gen_bool(missing) {
        "?".to_string()
    } else {
        labels.choose(rng).map(|l| quote(l)).unwrap_or_default()
    }
}

fn header() -> String {
    let mut out = String::from("@relation autism_adult\n\n");
    for i in 1..=10 {
        let _ = writeln!(out, "@attribute A{i}_Score {{0,1}}");
    }
    let _ = writeln!(out, "@attribute age numeric");
    let _ = writeln!(out, "@attribute gender {{f,m}}");
    let _ = writeln!(out, "@attribute ethnicity {}", nominal(&ETHNICITIES));
    let _ = writeln!(out, "@attribute jundice {{no,yes}}");
    let _ = writeln!(out, "@attribute austim {{no,yes}}");
    let _ = writeln!(out, "@attribute contry_of_res {}", nominal(&COUNTRIES));
    let _ = writeln!(out, "@attribute used_app_before {{no,yes}}");
    let _ = writeln!(out, "@attribute result numeric");
    let _ = writeln!(out, "@attribute age_desc {{'18 and more'}}");
    let _ = writeln!(out, "@attribute relation {}", nominal(&RELATIONS));
    let _ = writeln!(out, "@attribute Class/ASD {{NO,YES}}");
    out.push_str("\n@data\n");
    out
}

fn record(rng: &mut StdRng) -> String {
    let scores: Vec<u8> = (0..10).map(|_| u8::from(rng.gen_bool(0.45))).collect();
    let result: u32 = scores.iter().map(|&s| s as u32).sum();

    let mut fields: Vec<String> = scores.iter().map(|s| s.to_string()).collect();
    fields.push(if rng.gen_bool(0.02) {
        "?".to_string()
    } else {
        rng.gen_range(18..=64).to_string()
    });
    fields.push(["f", "m"].choose(rng).copied().unwrap_or("f").to_string());
    fields.push(pick_or_missing(rng, &ETHNICITIES, 0.1));
    fields.push((if rng.gen_bool(0.1) { "yes" } else { "no" }).to_string());
    fields.push((if rng.gen_bool(0.12) { "yes" } else { "no" }).to_string());
    fields.push(pick_or_missing(rng, &COUNTRIES, 0.0));
    fields.push((if rng.gen_bool(0.05) { "yes" } else { "no" }).to_string());
    fields.push(result.to_string());
    fields.push(quote("18 and more"));
    fields.push(pick_or_missing(rng, &RELATIONS, 0.1));
    fields.push((if result > 6 { "YES" } else { "NO" }).to_string());
    fields.join(",")
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut rng = StdRng::seed_from_u64(cli.seed);

    let mut text = header();
    for _ in 0..cli.rows {
        text.push_str(&record(&mut rng));
        text.push('\n');
    }

    std::fs::write(&cli.output, text)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    println!("Wrote {} records to {}", cli.rows, cli.output.display());
    Ok(())
}
