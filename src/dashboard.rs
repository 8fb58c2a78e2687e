//! View models for the three dashboard pages.
//!
//! Each page is a list of [`Chart`]s computed from the dataset with
//! [`mean_charges_by`]. Rendering is someone else's job; see
//! [`crate::render`].

use crate::aggregate::{self, mean_charges_by, AggregateRow, GroupColumn, Grouping, Kpis};
use crate::currency::format_currency;
use crate::dataset::Dataset;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    Overview,
    Age,
    Bmi,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Overview, Page::Age, Page::Bmi];

    /// Unknown paths fall back to the overview.
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/age" => Page::Age,
            "/bmi" => Page::Bmi,
            _ => Page::Overview,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Page::Overview => "/",
            Page::Age => "/age",
            Page::Bmi => "/bmi",
        }
    }

    pub fn nav_label(self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::Age => "Age Insights",
            Page::Bmi => "BMI Insights",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn root_class(self) -> &'static str {
        match self {
            Theme::Light => "app-root light-theme",
            Theme::Dark => "app-root dark-theme",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    GroupedBar,
    Donut,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    pub title: String,
    pub kind: ChartKind,
    pub grouping: Grouping,
    pub rows: Vec<AggregateRow>,
}

impl Chart {
    fn build(dataset: &Dataset, title: &str, kind: ChartKind, grouping: Grouping) -> Self {
        Self {
            title: title.to_string(),
            kind,
            grouping,
            rows: mean_charges_by(dataset.records(), grouping),
        }
    }

    /// Stable identifier, e.g. `age_bracket_by_sex`.
    pub fn id(&self) -> String {
        self.grouping
            .columns()
            .iter()
            .map(|c| c.name())
            .collect::<Vec<_>>()
            .join("_by_")
    }

    /// Largest group mean, used to scale bars.
    pub fn max_mean(&self) -> Option<f64> {
        self.rows
            .iter()
            .filter_map(|r| r.mean_charges)
            .fold(None, |acc, m| Some(acc.map_or(m, |a: f64| a.max(m))))
    }

    /// Each row's share of the summed means, for donut charts.
    pub fn shares(&self) -> Vec<Option<f64>> {
        let total: f64 = self.rows.iter().filter_map(|r| r.mean_charges).sum();
        self.rows
            .iter()
            .map(|r| r.mean_charges.filter(|_| total > 0.0).map(|m| m / total))
            .collect()
    }
}

/// KPI values formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiCards {
    pub average_charge: String,
    pub core_age_bracket: String,
    pub core_bmi_bracket: String,
    pub average_dependants: String,
    #[serde(skip)]
    pub raw: Kpis,
}

impl From<Kpis> for KpiCards {
    fn from(kpis: Kpis) -> Self {
        Self {
            average_charge: format_currency(kpis.average_charge, 0),
            core_age_bracket: kpis.core_age_bracket.to_string(),
            core_bmi_bracket: kpis.core_bmi_bracket.to_string(),
            average_dependants: format!("{:.0}", kpis.average_children),
            raw: kpis,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewPage {
    pub kpis: Option<KpiCards>,
    pub charts: Vec<Chart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownPage {
    pub page: Page,
    pub bracket: GroupColumn,
    pub charts: Vec<Chart>,
}

pub fn overview(dataset: &Dataset) -> OverviewPage {
    OverviewPage {
        kpis: aggregate::kpis(dataset.records()).map(KpiCards::from),
        charts: vec![
            Chart::build(
                dataset,
                "Average Charges by Age Bracket",
                ChartKind::Bar,
                Grouping::One(GroupColumn::AgeBracket),
            ),
            Chart::build(
                dataset,
                "Average Charges by BMI Bracket",
                ChartKind::Bar,
                Grouping::One(GroupColumn::BmiBracket),
            ),
            Chart::build(
                dataset,
                "Average Charges by Smoker Status",
                ChartKind::Donut,
                Grouping::One(GroupColumn::Smoker),
            ),
        ],
    }
}

/// The drill-down page for one bracket column: the bracket crossed with
/// sex, smoker status, dependants and region.
pub fn breakdown(dataset: &Dataset, page: Page) -> BreakdownPage {
    let (page, bracket, name) = match page {
        Page::Bmi => (Page::Bmi, GroupColumn::BmiBracket, "BMI"),
        _ => (Page::Age, GroupColumn::AgeBracket, "Age"),
    };

    let facets = [
        (GroupColumn::Sex, "Gender"),
        (GroupColumn::Smoker, "Smoker"),
        (GroupColumn::Children, "Dependants"),
        (GroupColumn::Region, "Region"),
    ];
    let charts = facets
        .into_iter()
        .map(|(facet, label)| {
            Chart::build(
                dataset,
                &format!("Avg Charges by {name} Bracket ({label})"),
                ChartKind::GroupedBar,
                Grouping::Two(bracket, facet),
            )
        })
        .collect();

    BreakdownPage { page, bracket, charts }
}

/// Every chart the dashboard shows, in page order.
pub fn all_charts(dataset: &Dataset) -> Vec<Chart> {
    let mut charts = overview(dataset).charts;
    charts.extend(breakdown(dataset, Page::Age).charts);
    charts.extend(breakdown(dataset, Page::Bmi).charts);
    charts
}
