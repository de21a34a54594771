use std::fs;

use assert_cmd::Command;
use tempfile::TempDir;

const ARFF: &str = "\
@relation autism_adult
@attribute A1_Score {0,1}
@attribute age numeric
@attribute gender {f,m}
@attribute contry_of_res {'United States','New Zealand'}
@attribute A2_Score {0,1}
@attribute result numeric
@attribute relation {Self,'Health care professional'}
@data
1,26,f,'United States',0,6,Self
0,?,m,'New Zealand',?,2,'Health care professional'
1,35,f,'United States',1,7,?
";

fn csv_records(text: &str) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(text.as_bytes());
    reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect()
}

fn run_in(dir: &TempDir) {
    Command::cargo_bin("arff-to-csv")
        .unwrap()
        .current_dir(dir.path())
        .assert()
        .success();
}

#[test]
fn converts_default_file_names() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("autism_adult_data.arff"), ARFF).unwrap();
    run_in(&dir);

    let text = fs::read_to_string(dir.path().join("autism_adult.csv")).unwrap();
    let rows = csv_records(&text);
    assert_eq!(rows.len(), 4);
    assert_eq!(
        rows[0],
        vec!["A1_Score", "age", "gender", "contry_of_res", "A2_Score", "result", "relation"]
    );
    assert_eq!(
        rows[1],
        vec!["1.0", "26.0", "f", "United States", "0", "6.0", "Self"]
    );
    assert_eq!(
        rows[2],
        vec!["0.0", "", "m", "New Zealand", "?", "2.0", "Health care professional"]
    );
    assert!(rows.iter().all(|r| r.len() == 7));
}

#[test]
fn rerun_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("autism_adult_data.arff"), ARFF).unwrap();
    run_in(&dir);
    let first = fs::read(dir.path().join("autism_adult.csv")).unwrap();
    run_in(&dir);
    let second = fs::read(dir.path().join("autism_adult.csv")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn custom_paths_and_numeric_columns() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("in.arff");
    let output = dir.path().join("out.csv");
    fs::write(&input, ARFF).unwrap();

    Command::cargo_bin("arff-to-csv")
        .unwrap()
        .arg("--input")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(["--numeric-column", "age", "--numeric-column", "A2_Score"])
        .assert()
        .success();

    let rows = csv_records(&fs::read_to_string(&output).unwrap());
    assert_eq!(rows[2][4], "");
    assert_eq!(rows[1][5], "6.0");
}

#[test]
fn missing_input_fails() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("arff-to-csv")
        .unwrap()
        .current_dir(dir.path())
        .assert()
        .failure();
    assert!(!dir.path().join("autism_adult.csv").exists());
}

#[test]
fn converts_generated_sample() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("generate-sample")
        .unwrap()
        .current_dir(dir.path())
        .args(["--rows", "50"])
        .assert()
        .success();
    run_in(&dir);

    let rows = csv_records(&fs::read_to_string(dir.path().join("autism_adult.csv")).unwrap());
    assert_eq!(rows.len(), 51);
    assert_eq!(rows[0].len(), 21);
    let a1 = rows[0].iter().position(|h| h == "A1_Score").unwrap();
    assert!(rows[1..].iter().all(|r| r[a1] == "0.0" || r[a1] == "1.0"));
}
