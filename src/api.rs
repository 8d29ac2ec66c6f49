use axum::{
    Router,
    body::Bytes,
    extract::State,
    response::Json,
    routing::post,
};
use chrono::{Datelike, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    error::ServiceError,
    models::{Location, MonthDay},
    service::{ProbabilityQuery, ProbabilityResponse, ProbabilityService},
};

pub const INVALID_BODY_MESSAGE: &str = "Invalid request body. Ensure it is valid JSON.";
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: latitude, longitude, date";

const REQUIRED_FIELDS: [&str; 3] = ["latitude", "longitude", "date"];

#[derive(Clone)]
pub struct AppState {
    pub service: ProbabilityService,
}

impl AppState {
    pub fn new(service: ProbabilityService) -> Self {
        Self { service }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/weather_probability", post(weather_probability))
        .with_state(state)
}

async fn weather_probability(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ProbabilityResponse>, ServiceError> {
    let query = parse_query(&body)?;
    debug!("Parsed query: {:?}", query);

    let assessment = state.service.assess(query, Utc::now().year()).await;
    Ok(Json(ProbabilityResponse::from(&assessment)))
}

/// Turn a raw request body into a validated query.
///
/// Expects an object with `latitude` and `longitude` numbers and an 8-digit
/// `date` string (`YYYYMMDD`).
pub fn parse_query(body: &[u8]) -> Result<ProbabilityQuery, ServiceError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|_| ServiceError::validation(INVALID_BODY_MESSAGE))?;

    let fields = value
        .as_object()
        .filter(|fields| REQUIRED_FIELDS.iter().all(|key| fields.contains_key(*key)))
        .ok_or_else(|| ServiceError::validation(MISSING_FIELDS_MESSAGE))?;

    let location = Location::new(number_field(fields, "latitude")?, number_field(fields, "longitude")?);
    location.validate()?;

    let date = fields
        .get("date")
        .and_then(Value::as_str)
        .filter(|date| date.len() == 8 && date.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| ServiceError::validation("Field 'date' must be a string in YYYYMMDD format"))?;

    let target_year = date[..4]
        .parse()
        .map_err(|_| ServiceError::validation(format!("Invalid year in date '{date}'")))?;
    let month_day: MonthDay = date[4..].parse()?;

    Ok(ProbabilityQuery {
        location,
        target_year,
        month_day,
    })
}

fn number_field(fields: &Map<String, Value>, key: &str) -> Result<f64, ServiceError> {
    fields
        .get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| ServiceError::validation(format!("Field '{key}' must be a number")))
}
