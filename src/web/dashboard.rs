use crate::dashboard::{self, BreakdownPage, OverviewPage, Page, Theme};
use crate::web::DashboardState;

use axum::{
    extract::{Query, State},
    http::Uri,
    response::Html,
    Json,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ThemeQuery {
    #[serde(default)]
    pub theme: Theme,
}

fn render(state: &DashboardState, page: Page, theme: Theme) -> Html<String> {
    match page {
        Page::Overview => Html(state.renderer.overview(&dashboard::overview(&state.dataset), theme)),
        Page::Age | Page::Bmi => Html(
            state
                .renderer
                .breakdown(&dashboard::breakdown(&state.dataset, page), theme),
        ),
    }
}

pub async fn overview_page(State(state): State<DashboardState>, Query(query): Query<ThemeQuery>) -> Html<String> {
    render(&state, Page::Overview, query.theme)
}

pub async fn age_page(State(state): State<DashboardState>, Query(query): Query<ThemeQuery>) -> Html<String> {
    render(&state, Page::Age, query.theme)
}

pub async fn bmi_page(State(state): State<DashboardState>, Query(query): Query<ThemeQuery>) -> Html<String> {
    render(&state, Page::Bmi, query.theme)
}

/// Anything unrouted: trailing-slash variants resolve to their page, the
/// rest to the overview.
pub async fn page_for_path(
    State(state): State<DashboardState>,
    Query(query): Query<ThemeQuery>,
    uri: Uri,
) -> Html<String> {
    tracing::debug!(path = uri.path(), "Unrouted dashboard path");
    render(&state, Page::from_path(uri.path()), query.theme)
}

pub async fn overview_json(State(state): State<DashboardState>) -> Json<OverviewPage> {
    Json(dashboard::overview(&state.dataset))
}

pub async fn age_json(State(state): State<DashboardState>) -> Json<BreakdownPage> {
    Json(dashboard::breakdown(&state.dataset, Page::Age))
}

pub async fn bmi_json(State(state): State<DashboardState>) -> Json<BreakdownPage> {
    Json(dashboard::breakdown(&state.dataset, Page::Bmi))
}
