//! Loading the insurance table with polars and cleaning it into records.
//!
//! Every column is read as text and cleaned row by row, so CSV and Parquet
//! inputs go through the same normalization. The loaded [`Dataset`] is
//! immutable and is shared read-only by the applications.

use crate::error::{RecordRejected, StartupError};
use crate::records::{self, InsuranceRecord, RawRecord};

use polars::frame::DataFrame;
use polars::prelude::PolarsResult;
use polars::prelude::*;
use polars_io::parquet::ParquetWriter;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

pub async fn read_parquet<P: AsRef<Path>>(path: P) -> PolarsResult<DataFrame> {
    let file = File::open(path)?;

    ParquetReader::new(file).finish()
}

/// Reads a CSV with every column as text; cleaning does the typing.
pub async fn read_csv<P: AsRef<Path>>(path: P) -> PolarsResult<DataFrame> {
    let file = File::open(path)?;

    CsvReader::new(file)
        .has_header(true)
        .infer_schema(Some(0))
        .finish()
}

pub async fn write_csv<P: AsRef<Path>>(path: P, df: &mut DataFrame) -> PolarsResult<()> {
    let mut file = File::create(path)?;

    CsvWriter::new(&mut file).finish(df)?;

    Ok(())
}

pub async fn write_parquet<P: AsRef<Path>>(path: P, df: &mut DataFrame) -> PolarsResult<()> {
    let mut file = File::create(path)?;

    ParquetWriter::new(&mut file).finish(df)?;

    Ok(())
}

/// What happened to the rows of the source table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept: usize,
    /// Dropped row counts keyed by rejection reason.
    pub rejected: BTreeMap<String, usize>,
}

impl LoadReport {
    pub fn dropped(&self) -> usize {
        self.total_rows - self.kept
    }

    fn reject(&mut self, reason: RecordRejected) {
        *self.rejected.entry(reason.to_string()).or_insert(0) += 1;
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<InsuranceRecord>,
    report: LoadReport,
}

impl Dataset {
    /// Loads and cleans the table at `path`. A `.parquet` (or `.pq`) file is
    /// read as Parquet, a `.csv` file as CSV.
    pub async fn load(path: &Path) -> Result<Self, StartupError> {
        if !path.is_file() {
            return Err(StartupError::DatasetMissing { path: path.to_path_buf() });
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let df = match extension.as_deref() {
            Some("csv") => read_csv(path).await?,
            Some("parquet") | Some("pq") => read_parquet(path).await?,
            _ => return Err(StartupError::DatasetFormat { path: path.to_path_buf() }),
        };

        let dataset = Self::from_frame(&df)?;
        tracing::info!(
            path = %path.display(),
            rows = dataset.report.total_rows,
            kept = dataset.report.kept,
            dropped = dataset.report.dropped(),
            reasons = ?dataset.report.rejected,
            "Dataset loaded"
        );
        if dataset.is_empty() {
            tracing::warn!(path = %path.display(), "No rows survived cleaning; every chart will be empty");
        }
        Ok(dataset)
    }

    /// Cleans an in-memory frame. Rows that fail cleaning are dropped and
    /// counted in the [`LoadReport`].
    pub fn from_frame(df: &DataFrame) -> Result<Self, StartupError> {
        let present = df.get_column_names();
        for alternatives in InsuranceRecord::required_columns() {
            if !alternatives.iter().any(|c| present.contains(c)) {
                return Err(StartupError::MissingColumn(alternatives.join(" or ")));
            }
        }

        let mut age = text_column(df, records::AGE)?;
        let mut age_bracket = text_column(df, records::AGE_BRACKET)?;
        let mut bmi = text_column(df, records::BMI)?;
        let mut bmi_bracket = text_column(df, records::BMI_BRACKET)?;
        let mut sex = text_column(df, records::SEX)?;
        let mut children = text_column(df, records::CHILDREN)?;
        let mut smoker = text_column(df, records::SMOKER)?;
        let mut region = text_column(df, records::REGION)?;
        let mut charges = text_column(df, records::CHARGES)?;

        let raw = (0..df.height()).map(|i| RawRecord {
            age: take(&mut age, i),
            age_bracket: take(&mut age_bracket, i),
            bmi: take(&mut bmi, i),
            bmi_bracket: take(&mut bmi_bracket, i),
            sex: take(&mut sex, i),
            children: take(&mut children, i),
            smoker: take(&mut smoker, i),
            region: take(&mut region, i),
            charges: take(&mut charges, i),
        });

        Ok(Self::from_raw(raw))
    }

    pub fn from_raw<I: IntoIterator<Item = RawRecord>>(rows: I) -> Self {
        let mut report = LoadReport::default();
        let mut kept = Vec::new();
        for row in rows {
            report.total_rows += 1;
            match row.normalize() {
                Ok(record) => kept.push(record),
                Err(reason) => report.reject(reason),
            }
        }
        report.kept = kept.len();
        Self { records: kept, report }
    }

    /// Wraps records that are already clean.
    pub fn from_records(records: Vec<InsuranceRecord>) -> Self {
        let report = LoadReport {
            total_rows: records.len(),
            kept: records.len(),
            rejected: BTreeMap::new(),
        };
        Self { records, report }
    }

    pub fn records(&self) -> &[InsuranceRecord] {
        &self.records
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The cleaned table, one column per [`InsuranceRecord::cleaned_columns`].
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let rows = &self.records;
        let [age_bracket, bmi_bracket, sex, children, smoker, region, charges] =
            InsuranceRecord::cleaned_columns();

        DataFrame::new(vec![
            Series::new(age_bracket, rows.iter().map(|r| r.age_bracket.label()).collect::<Vec<_>>()),
            Series::new(bmi_bracket, rows.iter().map(|r| r.bmi_bracket.label()).collect::<Vec<_>>()),
            Series::new(sex, rows.iter().map(|r| r.sex.as_str()).collect::<Vec<_>>()),
            Series::new(children, rows.iter().map(|r| r.children).collect::<Vec<i64>>()),
            Series::new(smoker, rows.iter().map(|r| r.smoker.as_str()).collect::<Vec<_>>()),
            Series::new(region, rows.iter().map(|r| r.region.as_str()).collect::<Vec<_>>()),
            Series::new(charges, rows.iter().map(|r| r.charges).collect::<Vec<f64>>()),
        ])
    }
}

/// The column as optional strings, or `None` when the frame lacks it.
fn text_column(df: &DataFrame, name: &str) -> PolarsResult<Option<Vec<Option<String>>>> {
    if !df.get_column_names().contains(&name) {
        return Ok(None);
    }
    let series = df.column(name)?.cast(&DataType::Utf8)?;
    let values = series
        .utf8()?
        .into_iter()
        .map(|v| v.map(str::to_owned))
        .collect();
    Ok(Some(values))
}

fn take(column: &mut Option<Vec<Option<String>>>, row: usize) -> Option<String> {
    column.as_mut().and_then(|values| values[row].take())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brackets::{AgeBracket, BmiBracket};

    fn frame() -> DataFrame {
        df!(
            "age" => &["10", "40", "70", "33"],
            "bmi" => &["17", "31.2", "22", "abc"],
            "sex" => &["m", "female", "male", "male"],
            "children" => &["2", "x", "1", "0"],
            "smoker" => &["Y", "no", "n", "y"],
            "region" => &["east", "southwest", "northwest", "east"],
            "charges" => &["1200.50", "8000", "9000", "100"]
        )
        .unwrap()
    }

    #[test]
    fn cleans_and_counts_rejections() {
        let dataset = Dataset::from_frame(&frame()).unwrap();
        assert_eq!(dataset.report().total_rows, 4);
        assert_eq!(dataset.report().kept, 2);
        assert_eq!(dataset.report().dropped(), 2);
        assert_eq!(dataset.report().rejected.values().sum::<usize>(), 2);

        let first = &dataset.records()[0];
        assert_eq!(first.age_bracket, AgeBracket::UpTo18);
        assert_eq!(first.bmi_bracket, BmiBracket::Underweight);
        assert_eq!(first.sex, "M");
        assert_eq!(first.smoker, "Yes");
        assert_eq!(first.children, 2);

        let second = &dataset.records()[1];
        assert_eq!(second.age_bracket, AgeBracket::From36To40);
        assert_eq!(second.bmi_bracket, BmiBracket::ObeseI);
        assert_eq!(second.children, 0);
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let df = df!("age" => &["10"], "bmi" => &["20"]).unwrap();
        match Dataset::from_frame(&df) {
            Err(StartupError::MissingColumn(column)) => assert_eq!(column, "sex"),
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn cleaned_frame_has_one_row_per_record() {
        let dataset = Dataset::from_frame(&frame()).unwrap();
        let df = dataset.to_frame().unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.get_column_names(), InsuranceRecord::cleaned_columns().to_vec());
    }

    #[tokio::test]
    async fn fully_rejected_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dirty.csv");
        std::fs::write(
            &path,
            "age,sex,bmi,children,smoker,region,charges\n\
             90,male,20,0,no,east,100\n\
             30,male,101,0,no,east,100\n",
        )
        .unwrap();

        let dataset = Dataset::load(&path).await.unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.report().dropped(), 2);
        assert!(!Dataset::from_frame(&frame()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_file_is_a_startup_error() {
        let err = Dataset::load(Path::new("definitely/not/here.csv")).await.unwrap_err();
        assert!(matches!(err, StartupError::DatasetMissing { .. }));
    }
}
