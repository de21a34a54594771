use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::Table;

/// Write `table` as comma-separated text with a header row and no index
/// column. An existing file at `path` is truncated.
pub fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_to(table, file).with_context(|| format!("writing {}", path.display()))?;
    log::info!(
        "Wrote {} rows x {} columns to {}",
        table.len(),
        table.columns.len(),
        path.display()
    );
    Ok(())
}

/// Serialize into any writer; quoting follows the `csv` crate's
/// "only when necessary" rule.
pub fn write_to<W: Write>(table: &Table, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(table.headers())?;
    for row in 0..table.len() {
        writer.write_record(table.row(row))?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn render(table: &Table) -> String {
        let mut buf = Vec::new();
        write_to(table, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn writes_header_and_rows_without_index() {
        let table = Table::new(
            vec![
                ("age".into(), Column::Float(vec![26.0, f64::NAN])),
                ("A1_Score".into(), Column::Numeric(vec![1.0, 0.0])),
                ("country".into(), Column::Text(vec!["New Zealand".into(), "Brazil".into()])),
            ],
            2,
        );
        assert_eq!(
            render(&table),
            "age,A1_Score,country\n26.0,1.0,New Zealand\n,0.0,Brazil\n"
        );
    }

    #[test]
    fn quotes_fields_containing_delimiters() {
        let table = Table::new(
            vec![("relation".into(), Column::Text(vec!["Health care, professional".into()]))],
            1,
        );
        assert_eq!(render(&table), "relation\n\"Health care, professional\"\n");
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "stale contents that are longer than the output\n").unwrap();
        let table = Table::new(vec![("x".into(), Column::Numeric(vec![2.5]))], 1);
        write_csv(&table, &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x\n2.5\n");
    }
}
