use crate::error::{AppError, Result};
use crate::predictor::{predict_charge, Prediction, PredictionForm, PredictionInput};
use crate::web::PredictorState;

use axum::{extract::State, http::StatusCode, response::Html, Form, Json};
use serde::Deserialize;

pub async fn form_page(State(state): State<PredictorState>) -> Html<String> {
    Html(state.renderer.form(&PredictionForm::default(), None))
}

/// Handles the HTML form. Bad choices re-render the form with the error,
/// keeping whatever the user picked that was valid.
pub async fn predict_form(
    State(state): State<PredictorState>,
    Form(input): Form<PredictionInput>,
) -> (StatusCode, Html<String>) {
    let form = match input.parse() {
        Ok(form) => form,
        Err(e) => {
            let message = e.to_string();
            tracing::warn!(error = %message, "Rejected predictor input");
            let page = state.renderer.form(&input.selections(), Some(Err(&message)));
            return (StatusCode::BAD_REQUEST, Html(page));
        }
    };

    match predict_charge(state.model.as_ref(), &form) {
        Ok(prediction) => (StatusCode::OK, Html(state.renderer.form(&form, Some(Ok(&prediction))))),
        Err(e) => {
            tracing::error!(error = %e, "Prediction failed");
            let message = e.to_string();
            let page = state.renderer.form(&form, Some(Err(&message)));
            (StatusCode::INTERNAL_SERVER_ERROR, Html(page))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    pub age_range: String,
    pub bmi_range: String,
    pub sex: String,
    pub children: i64,
    pub smoker: String,
    pub region: String,
}

impl From<PredictRequest> for PredictionInput {
    fn from(request: PredictRequest) -> Self {
        PredictionInput {
            age_range: request.age_range,
            bmi_range: request.bmi_range,
            sex: request.sex,
            children: request.children.to_string(),
            smoker: request.smoker,
            region: request.region,
        }
    }
}

pub async fn predict_json(
    State(state): State<PredictorState>,
    Json(request): Json<PredictRequest>,
) -> Result<Json<Prediction>> {
    let form = PredictionInput::from(request)
        .parse()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let prediction = predict_charge(state.model.as_ref(), &form)
        .map_err(|e| AppError::Prediction(e.to_string()))?;

    Ok(Json(prediction))
}
