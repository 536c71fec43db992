// src/api/handlers.rs

use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, StatusCode},
    response::Html,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::api::error::{ApiError, ApiResult};
use crate::llm::GenerateError;
use crate::report::{Report, ReportError, SectionToggles};
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
}

pub async fn login_handler(
    State(state): State<SharedState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    match state.sessions.login(&request.username, &request.password).await {
        Some(token) => Ok(Json(LoginResponse { token })),
        None => Err(ApiError::unauthorized("Incorrect user or password")),
    }
}

pub async fn logout_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    if let Some(token) = bearer_token(&headers) {
        state.sessions.logout(token).await;
    }
    Json(json!({ "ok": true }))
}

pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn index_handler() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

/// Multipart report request: the `script` PDF plus section toggles and the
/// currency rate as text fields.
pub async fn report_handler(
    State(state): State<SharedState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResult<Json<Report>> {
    let session = match bearer_token(&headers) {
        Some(token) => state.sessions.authorize(token).await,
        None => None,
    };
    let Some(session) = session else {
        return Err(ApiError::unauthorized("Login required"));
    };

    let mut pdf_bytes = None;
    let mut sections = SectionToggles::default();
    let mut currency_rate = 0.0_f64;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(format!("Malformed upload: {}", err)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "script" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| ApiError::bad_request(format!("Unreadable script upload: {}", err)))?;
                pdf_bytes = Some(bytes);
            }
            "narrative" => sections.narrative = parse_flag(&text_field(field).await?),
            "production" => sections.production = parse_flag(&text_field(field).await?),
            "diversity" => sections.diversity = parse_flag(&text_field(field).await?),
            "currency_rate" => {
                currency_rate = text_field(field).await?.trim().parse().unwrap_or(0.0);
            }
            _ => {}
        }
    }

    let Some(pdf_bytes) = pdf_bytes else {
        return Err(ApiError::bad_request("Missing script PDF"));
    };

    info!(
        "Report requested by {} ({} bytes uploaded)",
        session.username,
        pdf_bytes.len()
    );

    match state
        .reports
        .create_report(&pdf_bytes, currency_rate, sections)
        .await
    {
        Ok(report) => Ok(Json(report)),
        Err(err @ ReportError::NoSectionsSelected) => Err(ApiError::bad_request(err.to_string())),
        Err(ReportError::Generation(err @ GenerateError::TooManyRequests)) => {
            Err(ApiError::custom(StatusCode::TOO_MANY_REQUESTS, err.to_string()))
        }
        Err(ReportError::Generation(err)) => {
            error!("Report generation failed: {}", err);
            Err(ApiError::custom(StatusCode::BAD_GATEWAY, "Report generation failed"))
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

async fn text_field(field: axum::extract::multipart::Field<'_>) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|err| ApiError::bad_request(format!("Malformed form field: {}", err)))
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim(), "true" | "on" | "1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_is_stripped() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc-123".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc-123"));
    }

    #[test]
    fn missing_or_malformed_authorization_is_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn flags_accept_form_spellings() {
        assert!(parse_flag("true"));
        assert!(parse_flag("on"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }
}
