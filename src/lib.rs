//! Insurance charge analytics: a dashboard over a cleaned insurance table
//! and a form-driven charge predictor backed by a trained regressor.
//!
//! The dashboard pipeline is [`dataset`] → [`normalize`] (with [`brackets`])
//! → [`aggregate`] → [`dashboard`] view models. The predictor pipeline is
//! [`predictor::encoding`] → [`predictor::model`]. Both are served by [`web`]
//! through the renderers in [`render`].

pub mod aggregate;
pub mod brackets;
pub mod config;
pub mod currency;
pub mod dashboard;
pub mod dataset;
pub mod error;
pub mod export;
pub mod monitor;
pub mod normalize;
pub mod predictor;
pub mod records;
pub mod render;
pub mod web;

pub use aggregate::{mean_charges_by, AggregateRow, GroupColumn, GroupValue, Grouping, Kpis};
pub use brackets::{AgeBracket, BmiBracket};
pub use crate::config::Config;
pub use dataset::{Dataset, LoadReport};
pub use error::{AppError, RecordRejected, StartupError};
pub use records::{InsuranceRecord, RawRecord};
