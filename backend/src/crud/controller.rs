//! Axum handlers for one entity namespace.
//!
//! Each handler receives the namespace's [`CrudService`] as router state and
//! forwards every failure as an [`ApiError`], which renders itself.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use cadastros_common::Record;
use serde_json::Value;

use super::service::{CrudService, Removed};
use crate::error::{ApiError, ApiResult, NOT_FOUND_MESSAGE};

/// Numeric id from the `{id}` path segment.
pub fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::bad_request("Invalid identifier provided."))
}

/// Request body as a record. A body that is valid JSON but not an object
/// counts as an empty payload.
fn payload(body: Result<Json<Value>, JsonRejection>) -> ApiResult<Record> {
    match body {
        Ok(Json(Value::Object(record))) => Ok(record),
        Ok(Json(_)) => Ok(Record::new()),
        Err(rejection) => Err(ApiError::BadRequest {
            message: "Invalid JSON body.".to_string(),
            details: Some(Value::String(rejection.body_text())),
        }),
    }
}

/// GET /api/{entity}
pub async fn list(State(service): State<CrudService>) -> ApiResult<Json<Vec<Record>>> {
    Ok(Json(service.list().await?))
}

/// POST /api/{entity}
pub async fn create(
    State(service): State<CrudService>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Record>)> {
    let input = payload(body)?;
    let created = service.create(&input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/{entity}/{id}
pub async fn update(
    State(service): State<CrudService>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Record>> {
    let id = parse_id(&id)?;
    let input = payload(body)?;
    Ok(Json(service.update(id, &input).await?))
}

/// DELETE /api/{entity}/{id}
pub async fn remove(State(service): State<CrudService>, Path(id): Path<String>) -> ApiResult<Json<Removed>> {
    let id = parse_id(&id)?;
    Ok(Json(service.remove(id).await?))
}

/// Unmatched route or unsupported method.
pub async fn route_not_found() -> ApiError {
    ApiError::not_found(NOT_FOUND_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id(" 7 ").unwrap(), 7);

        for raw in ["abc", "12abc", "1.5", "", "9999999999999999999999"] {
            let err = parse_id(raw).unwrap_err();
            assert_eq!(err.to_string(), "Invalid identifier provided.");
        }
    }

    #[test]
    fn test_non_object_body_is_empty_payload() {
        let record = payload(Ok(Json(serde_json::json!([1, 2])))).unwrap();
        assert!(record.is_empty());
    }
}
