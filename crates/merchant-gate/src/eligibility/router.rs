use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::MerchantId;
use super::repository::{MerchantDirectory, SessionStore};
use super::service::{EligibilityService, EligibilityServiceError, WorkspaceOverview};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityRequest {
    pub merchant_id: MerchantId,
}

#[derive(Debug, Default, Deserialize)]
pub struct EligibilityQuery {
    #[serde(rename = "merchantId", default)]
    pub merchant_id: Option<String>,
}

/// Router builder exposing the eligibility check and console endpoints.
pub fn eligibility_router<D, S>(service: Arc<EligibilityService<D, S>>) -> Router
where
    D: MerchantDirectory + 'static,
    S: SessionStore + 'static,
{
    Router::new()
        .route(
            "/check-eligibility",
            post(check_body_handler::<D, S>).get(check_query_handler::<D, S>),
        )
        .route("/api/v1/console/:merchant_id", get(overview_handler::<D, S>))
        .with_state(service)
}

pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

pub(crate) async fn check_body_handler<D, S>(
    State(service): State<Arc<EligibilityService<D, S>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    D: MerchantDirectory + 'static,
    S: SessionStore + 'static,
{
    // Content-Type is not required; the body is read as JSON regardless.
    match serde_json::from_slice::<EligibilityRequest>(&body) {
        Ok(request) => check_response(&service, &headers, &request.merchant_id),
        Err(err) => invalid_request(err.to_string()),
    }
}

pub(crate) async fn check_query_handler<D, S>(
    State(service): State<Arc<EligibilityService<D, S>>>,
    headers: HeaderMap,
    query: Result<Query<EligibilityQuery>, QueryRejection>,
) -> Response
where
    D: MerchantDirectory + 'static,
    S: SessionStore + 'static,
{
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => return invalid_request(rejection.body_text()),
    };

    let Some(raw) = query.merchant_id.filter(|raw| !raw.trim().is_empty()) else {
        let payload = json!({ "error": "merchantId is required" });
        return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
    };

    match MerchantId::parse(&raw) {
        Ok(merchant_id) => check_response(&service, &headers, &merchant_id),
        Err(err) => invalid_request(format!("merchantId: {err}")),
    }
}

pub(crate) async fn overview_handler<D, S>(
    State(service): State<Arc<EligibilityService<D, S>>>,
    headers: HeaderMap,
    Path(merchant_id): Path<String>,
) -> Result<Json<WorkspaceOverview>, AppError>
where
    D: MerchantDirectory + 'static,
    S: SessionStore + 'static,
{
    let merchant_id = MerchantId::parse(&merchant_id)?;
    let session = service.session(bearer_token(&headers))?;

    service
        .overview(session.as_ref(), &merchant_id)?
        .map(Json)
        .ok_or(AppError::MerchantNotFound(merchant_id))
}

fn check_response<D, S>(
    service: &EligibilityService<D, S>,
    headers: &HeaderMap,
    merchant_id: &MerchantId,
) -> Response
where
    D: MerchantDirectory + 'static,
    S: SessionStore + 'static,
{
    let outcome = service
        .session(bearer_token(headers))
        .and_then(|session| service.check(session.as_ref(), merchant_id));

    match outcome {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(EligibilityServiceError::Access(error)) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::FORBIDDEN, Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

fn invalid_request(detail: String) -> Response {
    let payload = json!({
        "error": "Invalid request",
        "details": [detail],
    });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}
