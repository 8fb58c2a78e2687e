//! Row cleaning: categorical normalization, numeric coercion and bracket
//! derivation. A row either becomes an [`InsuranceRecord`] or is rejected
//! with the reason it failed.

use crate::brackets::{AgeBracket, BmiBracket};
use crate::error::RecordRejected;
use crate::records::{InsuranceRecord, RawRecord};

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub fn normalize_smoker(value: &str) -> String {
    let value = capitalize(value.trim());
    match value.as_str() {
        "Y" => "Yes".to_string(),
        "N" => "No".to_string(),
        _ => value,
    }
}

pub fn normalize_sex(value: &str) -> String {
    capitalize(value.trim())
}

/// Parses a dependant count. Non-numeric or missing input becomes 0;
/// fractional input is truncated toward zero. Negative counts pass through.
pub fn coerce_children(value: Option<&str>) -> i64 {
    value
        .and_then(parse_number)
        .filter(|n| n.is_finite())
        .map(|n| n.trunc() as i64)
        .unwrap_or(0)
}

pub fn coerce_charges(value: Option<&str>) -> Option<f64> {
    value.and_then(parse_number)
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| !n.is_nan())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl RawRecord {
    /// Cleans the row. A precomputed bracket column wins over the raw value.
    pub fn normalize(&self) -> Result<InsuranceRecord, RecordRejected> {
        let age = self.age.as_deref().and_then(parse_number);
        let bmi = self.bmi.as_deref().and_then(parse_number);

        let age_bracket = match non_empty(self.age_bracket.as_deref()) {
            Some(label) => AgeBracket::from_label(label),
            None => age.and_then(AgeBracket::classify),
        }
        .ok_or(RecordRejected::AgeBracket)?;

        let bmi_bracket = match non_empty(self.bmi_bracket.as_deref()) {
            Some(label) => BmiBracket::from_label(label),
            None => bmi.and_then(BmiBracket::classify),
        }
        .ok_or(RecordRejected::BmiBracket)?;

        // Categorical cells never reject a row; a null cell reads as empty.
        let sex = normalize_sex(self.sex.as_deref().unwrap_or_default());
        let smoker = normalize_smoker(self.smoker.as_deref().unwrap_or_default());
        let region = self.region.clone().unwrap_or_default();
        let charges = coerce_charges(self.charges.as_deref()).ok_or(RecordRejected::Charges)?;

        Ok(InsuranceRecord {
            age,
            bmi,
            age_bracket,
            bmi_bracket,
            sex,
            children: coerce_children(self.children.as_deref()),
            smoker,
            region,
            charges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(age: &str, bmi: &str, sex: &str, smoker: &str, children: &str, charges: &str) -> RawRecord {
        RawRecord {
            age: Some(age.into()),
            bmi: Some(bmi.into()),
            sex: Some(sex.into()),
            smoker: Some(smoker.into()),
            region: Some("east".into()),
            children: Some(children.into()),
            charges: Some(charges.into()),
            ..Default::default()
        }
    }

    #[test]
    fn smoker_shorthand_and_casing() {
        assert_eq!(normalize_smoker("y"), "Yes");
        assert_eq!(normalize_smoker(" N "), "No");
        assert_eq!(normalize_smoker("yes"), "Yes");
        assert_eq!(normalize_smoker("NO"), "No");
        assert_eq!(normalize_smoker("maybe"), "Maybe");
    }

    #[test]
    fn sex_is_trimmed_and_capitalized() {
        assert_eq!(normalize_sex(" female "), "Female");
        assert_eq!(normalize_sex("MALE"), "Male");
        assert_eq!(normalize_sex("m"), "M");
    }

    #[test]
    fn children_coercion() {
        assert_eq!(coerce_children(Some("3")), 3);
        assert_eq!(coerce_children(Some("two")), 0);
        assert_eq!(coerce_children(None), 0);
        assert_eq!(coerce_children(Some("2.0")), 2);
        assert_eq!(coerce_children(Some("NaN")), 0);
        assert_eq!(coerce_children(Some("-1")), -1);
    }

    #[test]
    fn charges_coercion() {
        assert_eq!(coerce_charges(Some("1200.50")), Some(1200.5));
        assert_eq!(coerce_charges(Some("n/a")), None);
        assert_eq!(coerce_charges(Some("nan")), None);
        assert_eq!(coerce_charges(None), None);
    }

    #[test]
    fn end_to_end_row() {
        let record = raw("10", "17", "m", "Y", "2", "1200.50").normalize().unwrap();
        assert_eq!(record.age_bracket.label(), "0–18");
        assert_eq!(record.bmi_bracket.label(), "Underweight");
        assert_eq!(record.sex, "M");
        assert_eq!(record.smoker, "Yes");
        assert_eq!(record.region, "east");
        assert_eq!(record.children, 2);
        assert_eq!(record.charges, 1200.50);
    }

    #[test]
    fn rows_outside_brackets_are_rejected() {
        assert_eq!(
            raw("66", "17", "m", "Y", "2", "1.0").normalize(),
            Err(RecordRejected::AgeBracket)
        );
        assert_eq!(
            raw("30", "101", "m", "Y", "2", "1.0").normalize(),
            Err(RecordRejected::BmiBracket)
        );
        assert_eq!(
            raw("30", "20", "m", "Y", "2", "").normalize(),
            Err(RecordRejected::Charges)
        );
    }

    #[test]
    fn blank_categoricals_pass_through() {
        let record = raw("30", "20", " ", "", "2", "1.0").normalize().unwrap();
        assert_eq!(record.sex, "");
        assert_eq!(record.smoker, "");

        let row = RawRecord {
            region: None,
            ..raw("30", "20", "female", "no", "2", "1.0")
        };
        let record = row.normalize().unwrap();
        assert_eq!(record.region, "");
        assert_eq!(record.sex, "Female");
    }

    #[test]
    fn precomputed_brackets_are_used() {
        let row = RawRecord {
            age_bracket: Some("41-45".into()),
            bmi_bracket: Some("Obese II".into()),
            sex: Some("female".into()),
            smoker: Some("no".into()),
            region: Some("southwest".into()),
            children: None,
            charges: Some("8000".into()),
            ..Default::default()
        };
        let record = row.normalize().unwrap();
        assert_eq!(record.age_bracket, AgeBracket::From41To45);
        assert_eq!(record.bmi_bracket, BmiBracket::ObeseII);
        assert_eq!(record.age, None);
        assert_eq!(record.children, 0);
    }
}
