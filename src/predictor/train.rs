use crate::predictor::encoding::{AgeRange, BmiRange, PredictionForm, QueryRecord, Region, Sex, Smoker, MODEL_COLUMNS};
use crate::predictor::model::{ModelArtifact, Regressor};
use crate::records::InsuranceRecord;

use smartcore::ensemble::random_forest_regressor::{RandomForestRegressor, RandomForestRegressorParameters};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{LinearRegression, LinearRegressionParameters};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ModelKind {
    RandomForest,
    Linear,
}

#[derive(Error, Debug)]
pub enum TrainError {
    #[error("no records could be encoded for training (raw age and bmi columns are required)")]
    NoRows,

    #[error("model fit failed: {0}")]
    Fit(String),
}

/// Encodes a cleaned record into the predictor vocabulary. Needs the raw
/// age and bmi; records outside the vocabulary yield `None`.
pub fn encode_record(record: &InsuranceRecord) -> Option<QueryRecord> {
    let form = PredictionForm::new(
        AgeRange::from_age(record.age?)?,
        BmiRange::from_bmi(record.bmi?)?,
        Sex::from_dataset(&record.sex)?,
        record.children,
        Smoker::from_label(&record.smoker)?,
        Region::from_label(&record.region)?,
    )
    .ok()?;
    Some(form.encode())
}

/// Fits a regressor on every encodable record.
pub fn train(records: &[InsuranceRecord], kind: ModelKind) -> Result<ModelArtifact, TrainError> {
    let mut xs: Vec<f64> = Vec::new();
    let mut y: Vec<f64> = Vec::new();
    for record in records {
        if let Some(encoded) = encode_record(record) {
            xs.extend_from_slice(&encoded.to_row());
            y.push(record.charges);
        }
    }

    let skipped = records.len() - y.len();
    if y.is_empty() {
        return Err(TrainError::NoRows);
    }
    tracing::info!(rows = y.len(), skipped, ?kind, "Training charge model");

    let x = DenseMatrix::new(y.len(), MODEL_COLUMNS.len(), xs, false);
    let fit_error = |e: smartcore::error::Failed| TrainError::Fit(e.to_string());

    let model = match kind {
        ModelKind::RandomForest => Regressor::RandomForest {
            model: RandomForestRegressor::fit(&x, &y, RandomForestRegressorParameters::default())
                .map_err(fit_error)?,
        },
        ModelKind::Linear => Regressor::Linear {
            model: LinearRegression::fit(&x, &y, LinearRegressionParameters::default())
                .map_err(fit_error)?,
        },
    };

    Ok(ModelArtifact::new(model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brackets::{AgeBracket, BmiBracket};
    use crate::predictor::model::ChargeModel;

    fn record(age: f64, bmi: f64, smoker: &str, region: &str, charges: f64) -> InsuranceRecord {
        InsuranceRecord {
            age: Some(age),
            bmi: Some(bmi),
            age_bracket: AgeBracket::classify(age).unwrap(),
            bmi_bracket: BmiBracket::classify(bmi).unwrap(),
            sex: "M".into(),
            children: 1,
            smoker: smoker.into(),
            region: region.into(),
            charges,
        }
    }

    #[test]
    fn records_encode_into_the_predictor_vocabulary() {
        let encoded = encode_record(&record(19.0, 27.9, "Yes", "southwest", 16884.92)).unwrap();
        assert_eq!(
            encoded,
            QueryRecord { age_bracket: 2, bmi_bracket: 3, sex: 1, children: 1, smoker: 1, region: 3 }
        );
        assert!(encode_record(&record(30.0, 22.0, "No", "east", 1.0)).is_none());

        let mut no_raw = record(30.0, 22.0, "No", "northeast", 1.0);
        no_raw.age = None;
        assert!(encode_record(&no_raw).is_none());
    }

    #[test]
    fn nothing_to_train_on() {
        let records = vec![record(30.0, 22.0, "No", "east", 1.0)];
        assert!(matches!(train(&records, ModelKind::RandomForest), Err(TrainError::NoRows)));
    }

    #[test]
    fn random_forest_survives_a_save_and_load() {
        let regions = ["northeast", "northwest", "southeast", "southwest"];
        let records: Vec<InsuranceRecord> = (0..40)
            .map(|i| {
                let age = 18.0 + i as f64;
                let smoker = if i % 3 == 0 { "Yes" } else { "No" };
                let charges = 1000.0 + age * 250.0 + if smoker == "Yes" { 20000.0 } else { 0.0 };
                record(age, 18.0 + (i % 20) as f64, smoker, regions[i % 4], charges)
            })
            .collect();

        let artifact = train(&records, ModelKind::RandomForest).unwrap();
        let query = encode_record(&records[0]).unwrap();
        let before = artifact.predict(&query).unwrap();
        assert!(before.is_finite());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        artifact.save(&path).unwrap();
        let loaded = ModelArtifact::load(&path).unwrap();
        assert_eq!(loaded.model.kind(), "random_forest");
        assert_eq!(loaded.predict(&query).unwrap(), before);
    }
}
