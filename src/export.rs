//! Writes the cleaned dataset and every dashboard aggregate to disk.

use crate::dashboard::{self, Chart};
use crate::dataset::{write_csv, write_parquet, Dataset};
use polars::prelude::PolarsError;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Parquet,
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write cleaned dataset: {0}")]
    Polars(#[from] PolarsError),

    #[error("failed to write aggregate table: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes `cleaned.<format>` plus one `<chart id>.csv` per chart into `dir`
/// and returns the paths written.
pub async fn export_all(dataset: &Dataset, dir: &Path, format: ExportFormat) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::new();

    let mut df = dataset.to_frame()?;
    let cleaned = match format {
        ExportFormat::Csv => {
            let path = dir.join("cleaned.csv");
            write_csv(&path, &mut df).await?;
            path
        }
        ExportFormat::Parquet => {
            let path = dir.join("cleaned.parquet");
            write_parquet(&path, &mut df).await?;
            path
        }
    };
    written.push(cleaned);

    for chart in dashboard::all_charts(dataset) {
        let path = dir.join(format!("{}.csv", chart.id()));
        write_chart(&path, &chart)?;
        written.push(path);
    }

    tracing::info!(dir = %dir.display(), files = written.len(), "Export written");
    Ok(written)
}

/// One row per group: key columns, `mean_charges` (empty when the group has
/// no rows) and `count`.
pub fn write_chart(path: &Path, chart: &Chart) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header: Vec<&str> = chart.grouping.columns().iter().map(|c| c.name()).collect();
    header.extend(["mean_charges", "count"]);
    writer.write_record(&header)?;

    for row in &chart.rows {
        let mut record: Vec<String> = row.keys.iter().map(ToString::to_string).collect();
        record.push(row.mean_charges.map(|m| m.to_string()).unwrap_or_default());
        record.push(row.count.to_string());
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brackets::{AgeBracket, BmiBracket};
    use crate::records::InsuranceRecord;

    fn dataset() -> Dataset {
        Dataset::from_records(vec![InsuranceRecord {
            age: None,
            bmi: None,
            age_bracket: AgeBracket::From46To50,
            bmi_bracket: BmiBracket::Overweight,
            sex: "Female".into(),
            children: 3,
            smoker: "Yes".into(),
            region: "northwest".into(),
            charges: 25000.0,
        }])
    }

    #[tokio::test]
    async fn writes_cleaned_table_and_every_chart() {
        let dir = tempfile::tempdir().unwrap();
        let written = export_all(&dataset(), dir.path(), ExportFormat::Csv).await.unwrap();
        assert_eq!(written.len(), 12);
        assert!(dir.path().join("cleaned.csv").is_file());
        assert!(dir.path().join("age_bracket_by_children.csv").is_file());

        let table = std::fs::read_to_string(dir.path().join("bmi_bracket.csv")).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "bmi_bracket,mean_charges,count");
        assert_eq!(lines[1], "Underweight,,0");
        assert_eq!(lines[3], "Overweight,25000,1");
        assert_eq!(lines.len(), 7);
    }

    #[tokio::test]
    async fn parquet_export() {
        let dir = tempfile::tempdir().unwrap();
        export_all(&dataset(), dir.path(), ExportFormat::Parquet).await.unwrap();
        let df = crate::dataset::read_parquet(dir.path().join("cleaned.parquet")).await.unwrap();
        assert_eq!(df.height(), 1);
    }
}
