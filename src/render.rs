//! Presentation boundary.
//!
//! The web handlers only know these traits; [`HtmlRenderer`] is the one
//! implementation shipped, drawing charts as tables with proportional bars.

use crate::currency::format_currency;
use crate::dashboard::{BreakdownPage, Chart, ChartKind, OverviewPage, Page, Theme};
use crate::predictor::{AgeRange, BmiRange, Prediction, PredictionForm, Region, Sex, Smoker};
use std::fmt::Write;

pub trait DashboardRenderer: Send + Sync {
    fn overview(&self, page: &OverviewPage, theme: Theme) -> String;
    fn breakdown(&self, page: &BreakdownPage, theme: Theme) -> String;
}

pub trait PredictionRenderer: Send + Sync {
    /// The form with `selected` pre-filled, plus the result or error of the
    /// last action, if any.
    fn form(&self, selected: &PredictionForm, outcome: Option<Result<&Prediction, &str>>) -> String;
}

#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    pub title: String,
}

impl HtmlRenderer {
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into() }
    }

    fn document(&self, root_class: &str, body: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n\
             <body>\n<div id=\"root\" class=\"{root_class}\">\n{body}</div>\n</body>\n</html>\n",
            title = escape(&self.title),
        )
    }

    fn navbar(&self, current: Page, theme: Theme) -> String {
        let mut html = String::from("<nav class=\"navbar\">");
        let _ = write!(html, "<a class=\"brand\" href=\"/?theme={}\">Insurance Analytics</a>", theme.as_str());
        for page in Page::ALL {
            let active = if page == current { " active" } else { "" };
            let _ = write!(
                html,
                "<a class=\"nav-link{active}\" href=\"{}?theme={}\">{}</a>",
                page.path(),
                theme.as_str(),
                page.nav_label()
            );
        }
        let toggled = theme.toggled();
        let _ = write!(
            html,
            "</nav>\n<div class=\"toggle-row\"><a class=\"theme-toggle\" href=\"{}?theme={}\">{}</a></div>\n",
            current.path(),
            toggled.as_str(),
            if toggled == Theme::Dark { "Dark Mode" } else { "Light Mode" }
        );
        html
    }
}

impl DashboardRenderer for HtmlRenderer {
    fn overview(&self, page: &OverviewPage, theme: Theme) -> String {
        let mut body = self.navbar(Page::Overview, theme);
        body.push_str("<div class=\"page-content\">\n<div class=\"kpi-row\">\n");
        match &page.kpis {
            Some(kpis) => {
                for (title, value) in [
                    ("Average Insurance Charge", &kpis.average_charge),
                    ("Core Age Bracket", &kpis.core_age_bracket),
                    ("Core BMI Bracket", &kpis.core_bmi_bracket),
                    ("Avg Number of Dependants", &kpis.average_dependants),
                ] {
                    let _ = writeln!(
                        body,
                        "<div class=\"kpi-card\"><div class=\"kpi-title\">{title}</div>\
                         <div class=\"kpi-value\">{}</div></div>",
                        escape(value)
                    );
                }
            }
            None => body.push_str("<p class=\"empty\">No records to summarize.</p>\n"),
        }
        body.push_str("</div>\n<div class=\"chart-row\">\n");
        for chart in &page.charts {
            body.push_str(&chart_html(chart));
        }
        body.push_str("</div>\n</div>\n");
        self.document(theme.root_class(), &body)
    }

    fn breakdown(&self, page: &BreakdownPage, theme: Theme) -> String {
        let mut body = self.navbar(page.page, theme);
        body.push_str("<div class=\"page-content\">\n");
        for chart in &page.charts {
            body.push_str(&chart_html(chart));
        }
        body.push_str("</div>\n");
        self.document(theme.root_class(), &body)
    }
}

impl PredictionRenderer for HtmlRenderer {
    fn form(&self, selected: &PredictionForm, outcome: Option<Result<&Prediction, &str>>) -> String {
        let mut body = String::new();
        body.push_str(
            "<h1>Insurance Charge Predictor</h1>\n\
             <p>Predict medical insurance charges based on your health and lifestyle details.</p>\n\
             <form method=\"post\" action=\"/predict\">\n",
        );
        body.push_str(&select("Age Range", AgeRange::FIELD, AgeRange::ALL.iter().map(|c| c.label()), selected.age_range.label()));
        body.push_str(&select("BMI Range", BmiRange::FIELD, BmiRange::ALL.iter().map(|c| c.label()), selected.bmi_range.label()));
        body.push_str(&select("Sex", Sex::FIELD, Sex::ALL.iter().map(|c| c.label()), selected.sex.label()));
        let _ = writeln!(
            body,
            "<label>Number of Children <input type=\"number\" name=\"children\" min=\"0\" max=\"{}\" value=\"{}\"></label>",
            crate::predictor::encoding::MAX_CHILDREN,
            selected.children
        );
        body.push_str(&select("Smoker?", Smoker::FIELD, Smoker::ALL.iter().map(|c| c.label()), selected.smoker.label()));
        body.push_str(&select("Region", Region::FIELD, Region::ALL.iter().map(|c| c.label()), selected.region.label()));
        body.push_str("<button type=\"submit\">Predict Insurance Charge</button>\n</form>\n");

        match outcome {
            Some(Ok(prediction)) => {
                let _ = writeln!(
                    body,
                    "<div class=\"success\"><strong>Estimated Insurance Charge:</strong> {}</div>",
                    escape(&prediction.formatted)
                );
            }
            Some(Err(message)) => {
                let _ = writeln!(body, "<div class=\"error\">{}</div>", escape(message));
            }
            None => {}
        }
        body.push_str(
            "<p class=\"note\">The prediction is an estimate based on statistical patterns; \
             actual charges may vary.</p>\n",
        );
        self.document("app-root light-theme", &body)
    }
}

fn select<'a>(label: &str, name: &str, options: impl Iterator<Item = &'a str>, selected: &str) -> String {
    let mut html = format!("<label>{label} <select name=\"{name}\">");
    for option in options {
        let mark = if option == selected { " selected" } else { "" };
        let _ = write!(html, "<option{mark}>{}</option>", escape(option));
    }
    html.push_str("</select></label>\n");
    html
}

fn chart_html(chart: &Chart) -> String {
    let mut html = format!(
        "<figure class=\"chart chart-{kind}\" id=\"{id}\">\n<figcaption>{title}</figcaption>\n<table>\n",
        kind = match chart.kind {
            ChartKind::Bar => "bar",
            ChartKind::GroupedBar => "grouped-bar",
            ChartKind::Donut => "donut",
        },
        id = chart.id(),
        title = escape(&chart.title),
    );

    let max = chart.max_mean().unwrap_or(0.0);
    let shares = chart.shares();
    for (row, share) in chart.rows.iter().zip(shares) {
        let key = row
            .keys
            .iter()
            .map(|k| escape(&k.to_string()))
            .collect::<Vec<_>>()
            .join(" · ");
        let value = row
            .mean_charges
            .map(|m| format_currency(m, 2))
            .unwrap_or_else(|| "–".to_string());
        let width = match (row.mean_charges, max > 0.0) {
            (Some(m), true) => m / max * 100.0,
            _ => 0.0,
        };
        let extra = match (chart.kind, share) {
            (ChartKind::Donut, Some(s)) => format!(" ({:.1}%)", s * 100.0),
            _ => String::new(),
        };
        let _ = writeln!(
            html,
            "<tr><th>{key}</th><td class=\"bar-cell\"><div class=\"bar\" style=\"width:{width:.1}%\"></div></td>\
             <td class=\"value\">{value}{extra}</td></tr>"
        );
    }
    html.push_str("</table>\n</figure>\n");
    html
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "\
body{margin:0;font-family:sans-serif}\
.app-root{min-height:100vh;padding-bottom:2rem}\
.light-theme{background:#f8f9fa;color:#212529}\
.dark-theme{background:#1e1e2f;color:#e4e6eb}\
.navbar{display:flex;gap:1rem;padding:.75rem 1rem;background:#0d6efd}\
.navbar a{color:#fff;text-decoration:none}.navbar .active{font-weight:bold}\
.toggle-row{padding:.5rem 1rem;text-align:right}\
.page-content{padding:1rem}\
.kpi-row{display:flex;gap:1rem;flex-wrap:wrap}\
.kpi-card{flex:1;min-width:12rem;padding:1rem;border-radius:.5rem;background:rgba(13,110,253,.1)}\
.kpi-value{font-size:1.5rem;font-weight:bold}\
.chart{margin:1.5rem 0}.chart table{width:100%;border-collapse:collapse}\
.bar-cell{width:60%}.bar{height:1rem;background:#0d6efd}\
.value{text-align:right;white-space:nowrap}\
.success{padding:1rem;background:#d1e7dd}.error{padding:1rem;background:#f8d7da}";
