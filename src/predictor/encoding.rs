//! Predictor vocabulary and the model's input row.
//!
//! These choices are NOT the dashboard brackets: the model was trained on 7
//! age ranges and 4 BMI ranges with integer codes, so they get their own
//! enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Column order the model was trained on.
pub const MODEL_COLUMNS: [&str; 6] = ["age_bracket", "bmi_bracket", "sex", "children", "smoker", "region"];

pub const MAX_CHILDREN: u8 = 5;

/// Lower-cased with all whitespace removed, so "Normal (18.5-24.9)" matches
/// "Normal (18.5 - 24.9)".
fn squash(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

macro_rules! choice {
    ($(#[$meta:meta])* $name:ident, $field:literal { $($variant:ident => ($label:literal, $code:literal)),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const FIELD: &'static str = $field;

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub fn code(self) -> u8 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn from_label(label: &str) -> Option<Self> {
                let wanted = squash(label);
                Self::ALL.iter().copied().find(|c| squash(c.label()) == wanted)
            }

            fn parse(label: &str) -> Result<Self, EncodeError> {
                Self::from_label(label).ok_or_else(|| EncodeError::UnknownChoice {
                    field: $field,
                    value: label.to_string(),
                })
            }
        }

        impl TryFrom<String> for $name {
            type Error = EncodeError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.label()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

choice!(
    /// Age choice, coded 1..=7.
    AgeRange, "age_range" {
        UpTo18 => ("0-18 years", 1),
        From19To25 => ("19-25 years", 2),
        From26To35 => ("26-35 years", 3),
        From36To45 => ("36-45 years", 4),
        From46To55 => ("46-55 years", 5),
        From56To60 => ("56-60 years", 6),
        Over60 => ("61+ years", 7),
    }
);

choice!(
    /// BMI choice, coded 1..=4.
    BmiRange, "bmi_range" {
        Underweight => ("Underweight (<18.5)", 1),
        Normal => ("Normal (18.5 - 24.9)", 2),
        Overweight => ("Overweight (25 - 29.9)", 3),
        Obese => ("Obese (≥30)", 4),
    }
);

choice!(
    Sex, "sex" {
        Male => ("Male", 1),
        Female => ("Female", 0),
    }
);

choice!(
    Smoker, "smoker" {
        Yes => ("Yes", 1),
        No => ("No", 0),
    }
);

choice!(
    Region, "region" {
        Northeast => ("Northeast", 0),
        Northwest => ("Northwest", 1),
        Southeast => ("Southeast", 2),
        Southwest => ("Southwest", 3),
    }
);

impl AgeRange {
    /// Maps a raw age onto the predictor ranges, right-closed like the
    /// dashboard brackets.
    pub fn from_age(age: f64) -> Option<Self> {
        if age.is_nan() || age < 0.0 {
            return None;
        }
        Some(match age {
            a if a <= 18.0 => AgeRange::UpTo18,
            a if a <= 25.0 => AgeRange::From19To25,
            a if a <= 35.0 => AgeRange::From26To35,
            a if a <= 45.0 => AgeRange::From36To45,
            a if a <= 55.0 => AgeRange::From46To55,
            a if a <= 60.0 => AgeRange::From56To60,
            _ => AgeRange::Over60,
        })
    }
}

impl BmiRange {
    pub fn from_bmi(bmi: f64) -> Option<Self> {
        if bmi.is_nan() || bmi < 0.0 {
            return None;
        }
        Some(match bmi {
            b if b < 18.5 => BmiRange::Underweight,
            b if b < 25.0 => BmiRange::Normal,
            b if b < 30.0 => BmiRange::Overweight,
            _ => BmiRange::Obese,
        })
    }
}

impl Sex {
    /// Accepts the cleaned dataset's spellings ("Male", "M", "Female", "F").
    pub fn from_dataset(value: &str) -> Option<Self> {
        match value {
            "M" => Some(Sex::Male),
            "F" => Some(Sex::Female),
            other => Self::from_label(other),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("unknown {field} {value:?}")]
    UnknownChoice { field: &'static str, value: String },

    #[error("children must be a whole number, got {0:?}")]
    ChildrenNotANumber(String),

    #[error("children must be between 0 and 5, got {0}")]
    ChildrenOutOfRange(i64),
}

/// Single-row model input, fields in [`MODEL_COLUMNS`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryRecord {
    pub age_bracket: u8,
    pub bmi_bracket: u8,
    pub sex: u8,
    pub children: u8,
    pub smoker: u8,
    pub region: u8,
}

impl QueryRecord {
    pub fn to_row(&self) -> [f64; 6] {
        [
            self.age_bracket as f64,
            self.bmi_bracket as f64,
            self.sex as f64,
            self.children as f64,
            self.smoker as f64,
            self.region as f64,
        ]
    }
}

/// A complete, validated set of predictor choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PredictionForm {
    pub age_range: AgeRange,
    pub bmi_range: BmiRange,
    pub sex: Sex,
    pub children: u8,
    pub smoker: Smoker,
    pub region: Region,
}

impl PredictionForm {
    pub fn new(
        age_range: AgeRange,
        bmi_range: BmiRange,
        sex: Sex,
        children: i64,
        smoker: Smoker,
        region: Region,
    ) -> Result<Self, EncodeError> {
        let children = u8::try_from(children)
            .ok()
            .filter(|c| *c <= MAX_CHILDREN)
            .ok_or(EncodeError::ChildrenOutOfRange(children))?;
        Ok(Self { age_range, bmi_range, sex, children, smoker, region })
    }

    pub fn encode(&self) -> QueryRecord {
        QueryRecord {
            age_bracket: self.age_range.code(),
            bmi_bracket: self.bmi_range.code(),
            sex: self.sex.code(),
            children: self.children,
            smoker: self.smoker.code(),
            region: self.region.code(),
        }
    }
}

impl Default for PredictionForm {
    /// The first option of every control, children 0.
    fn default() -> Self {
        Self {
            age_range: AgeRange::UpTo18,
            bmi_range: BmiRange::Underweight,
            sex: Sex::Male,
            children: 0,
            smoker: Smoker::Yes,
            region: Region::Northeast,
        }
    }
}

/// Untrusted predictor input, as submitted by a form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionInput {
    #[serde(default)]
    pub age_range: String,
    #[serde(default)]
    pub bmi_range: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub children: String,
    #[serde(default)]
    pub smoker: String,
    #[serde(default)]
    pub region: String,
}

impl PredictionInput {
    pub fn parse(&self) -> Result<PredictionForm, EncodeError> {
        let children = self
            .children
            .trim()
            .parse::<i64>()
            .map_err(|_| EncodeError::ChildrenNotANumber(self.children.clone()))?;

        PredictionForm::new(
            AgeRange::parse(&self.age_range)?,
            BmiRange::parse(&self.bmi_range)?,
            Sex::parse(&self.sex)?,
            children,
            Smoker::parse(&self.smoker)?,
            Region::parse(&self.region)?,
        )
    }

    /// The submitted choices that are valid, with the defaults standing in
    /// for the rest. Used to re-fill the form after a rejected submission.
    pub fn selections(&self) -> PredictionForm {
        let fallback = PredictionForm::default();
        PredictionForm {
            age_range: AgeRange::from_label(&self.age_range).unwrap_or(fallback.age_range),
            bmi_range: BmiRange::from_label(&self.bmi_range).unwrap_or(fallback.bmi_range),
            sex: Sex::from_label(&self.sex).unwrap_or(fallback.sex),
            children: self
                .children
                .trim()
                .parse::<u8>()
                .ok()
                .filter(|c| *c <= MAX_CHILDREN)
                .unwrap_or(fallback.children),
            smoker: Smoker::from_label(&self.smoker).unwrap_or(fallback.smoker),
            region: Region::from_label(&self.region).unwrap_or(fallback.region),
        }
    }
}
