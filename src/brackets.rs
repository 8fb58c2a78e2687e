//! Dashboard bracket vocabulary.
//!
//! Raw `age` and `bmi` values are placed into fixed, ordered brackets by
//! looking them up in a boundary table. A value outside the outer edges (or
//! NaN) is unclassifiable and the owning record is dropped by the loader.
//!
//! The predictor uses its own, coarser vocabulary; see
//! [`crate::predictor::encoding`].

use serde::{Deserialize, Serialize};
use std::fmt;

pub const AGE_EDGES: [f64; 11] = [0.0, 18.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0, 65.0];
pub const BMI_EDGES: [f64; 7] = [0.0, 18.5, 24.9, 29.9, 34.9, 39.9, 100.0];

/// Which side of each interval is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closed {
    /// `(lo, hi]`, with the lowest interval also including its lower edge.
    Right,
    /// `[lo, hi)`; the upper edge of the table is outside every interval.
    Left,
}

/// An ordered list of cut points plus an edge policy.
#[derive(Debug, Clone, Copy)]
pub struct BinTable<'a> {
    pub edges: &'a [f64],
    pub closed: Closed,
}

impl<'a> BinTable<'a> {
    pub const fn new(edges: &'a [f64], closed: Closed) -> Self {
        Self { edges, closed }
    }

    /// Index of the interval containing `value`, or `None` when it falls
    /// outside the table.
    pub fn locate(&self, value: f64) -> Option<usize> {
        if value.is_nan() || self.edges.len() < 2 {
            return None;
        }
        let first = self.edges[0];
        let last = self.edges[self.edges.len() - 1];
        if value < first || value > last {
            return None;
        }

        match self.closed {
            Closed::Right => {
                if value == first {
                    return Some(0);
                }
                self.edges
                    .windows(2)
                    .position(|w| value > w[0] && value <= w[1])
            }
            Closed::Left => self
                .edges
                .windows(2)
                .position(|w| value >= w[0] && value < w[1]),
        }
    }
}

pub const AGE_BINS: BinTable<'static> = BinTable::new(&AGE_EDGES, Closed::Right);
pub const BMI_BINS: BinTable<'static> = BinTable::new(&BMI_EDGES, Closed::Left);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBracket {
    #[serde(rename = "0–18")]
    UpTo18,
    #[serde(rename = "19–25")]
    From19To25,
    #[serde(rename = "26–30")]
    From26To30,
    #[serde(rename = "31–35")]
    From31To35,
    #[serde(rename = "36–40")]
    From36To40,
    #[serde(rename = "41–45")]
    From41To45,
    #[serde(rename = "46–50")]
    From46To50,
    #[serde(rename = "51–55")]
    From51To55,
    #[serde(rename = "56–60")]
    From56To60,
    #[serde(rename = "61–65")]
    From61To65,
}

impl AgeBracket {
    pub const ALL: [AgeBracket; 10] = [
        AgeBracket::UpTo18,
        AgeBracket::From19To25,
        AgeBracket::From26To30,
        AgeBracket::From31To35,
        AgeBracket::From36To40,
        AgeBracket::From41To45,
        AgeBracket::From46To50,
        AgeBracket::From51To55,
        AgeBracket::From56To60,
        AgeBracket::From61To65,
    ];

    pub fn classify(age: f64) -> Option<Self> {
        AGE_BINS.locate(age).map(|i| Self::ALL[i])
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBracket::UpTo18 => "0–18",
            AgeBracket::From19To25 => "19–25",
            AgeBracket::From26To30 => "26–30",
            AgeBracket::From31To35 => "31–35",
            AgeBracket::From36To40 => "36–40",
            AgeBracket::From41To45 => "41–45",
            AgeBracket::From46To50 => "46–50",
            AgeBracket::From51To55 => "51–55",
            AgeBracket::From56To60 => "56–60",
            AgeBracket::From61To65 => "61–65",
        }
    }

    /// Parses a precomputed `age_bracket` cell. Accepts an ASCII hyphen in
    /// place of the en dash.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().replace('-', "–");
        Self::ALL.into_iter().find(|b| b.label() == label)
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BmiBracket {
    Underweight,
    Normal,
    Overweight,
    #[serde(rename = "Obese I")]
    ObeseI,
    #[serde(rename = "Obese II")]
    ObeseII,
    #[serde(rename = "Obese III")]
    ObeseIII,
}

impl BmiBracket {
    pub const ALL: [BmiBracket; 6] = [
        BmiBracket::Underweight,
        BmiBracket::Normal,
        BmiBracket::Overweight,
        BmiBracket::ObeseI,
        BmiBracket::ObeseII,
        BmiBracket::ObeseIII,
    ];

    pub fn classify(bmi: f64) -> Option<Self> {
        BMI_BINS.locate(bmi).map(|i| Self::ALL[i])
    }

    pub fn label(self) -> &'static str {
        match self {
            BmiBracket::Underweight => "Underweight",
            BmiBracket::Normal => "Normal",
            BmiBracket::Overweight => "Overweight",
            BmiBracket::ObeseI => "Obese I",
            BmiBracket::ObeseII => "Obese II",
            BmiBracket::ObeseIII => "Obese III",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|b| b.label() == label)
    }
}

impl fmt::Display for BmiBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
