use crate::brackets::{AgeBracket, BmiBracket};
use serde::{Deserialize, Serialize};

pub const AGE: &str = "age";
pub const AGE_BRACKET: &str = "age_bracket";
pub const BMI: &str = "bmi";
pub const BMI_BRACKET: &str = "bmi_bracket";
pub const SEX: &str = "sex";
pub const CHILDREN: &str = "children";
pub const SMOKER: &str = "smoker";
pub const REGION: &str = "region";
pub const CHARGES: &str = "charges";

/// One raw row as read from the dataset, every cell as optional text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    pub age: Option<String>,
    pub age_bracket: Option<String>,
    pub bmi: Option<String>,
    pub bmi_bracket: Option<String>,
    pub sex: Option<String>,
    pub children: Option<String>,
    pub smoker: Option<String>,
    pub region: Option<String>,
    pub charges: Option<String>,
}

/// A cleaned, bracketed insurance record. Every field is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceRecord {
    /// Raw age, kept when the source had an `age` column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    /// Raw bmi, kept when the source had a `bmi` column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bmi: Option<f64>,
    pub age_bracket: AgeBracket,
    pub bmi_bracket: BmiBracket,
    pub sex: String,
    pub children: i64,
    pub smoker: String,
    pub region: String,
    pub charges: f64,
}

impl InsuranceRecord {
    /// Columns that must be present in an input file, as alternatives.
    pub fn required_columns() -> [&'static [&'static str]; 7] {
        [
            &[AGE, AGE_BRACKET],
            &[BMI, BMI_BRACKET],
            &[SEX],
            &[CHILDREN],
            &[SMOKER],
            &[REGION],
            &[CHARGES],
        ]
    }

    /// Column order of the cleaned dataset on export.
    pub fn cleaned_columns() -> [&'static str; 7] {
        [AGE_BRACKET, BMI_BRACKET, SEX, CHILDREN, SMOKER, REGION, CHARGES]
    }
}
