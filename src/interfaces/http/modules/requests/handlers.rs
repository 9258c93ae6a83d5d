//! Appointment request HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use uuid::Uuid;

use crate::application::scheduling::services::booking::{Decision, NewRequest};
use crate::application::BookingService;
use crate::domain::RequestStatus;
use crate::interfaces::http::common::{
    bad_request, error_response, ApiError, ApiResponse, ValidatedJson,
};

use super::dto::*;

/// Application state for request handlers.
#[derive(Clone)]
pub struct RequestAppState {
    pub booking: Arc<BookingService>,
}

fn parse_request_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| bad_request(format!("invalid request id '{raw}'")))
}

fn parse_optional_slot_id(raw: Option<String>) -> Result<Option<Uuid>, ApiError> {
    raw.map(|s| {
        Uuid::parse_str(&s).map_err(|_| bad_request(format!("invalid slot id '{s}'")))
    })
    .transpose()
}

#[utoipa::path(
    post,
    path = "/api/v1/requests",
    tag = "Requests",
    request_body = CreateRequestBody,
    responses(
        (status = 200, description = "Request created in Pending", body = ApiResponse<RequestDto>),
        (status = 400, description = "Missing or blank motive"),
        (status = 404, description = "Pre-selected slot does not exist")
    )
)]
pub async fn create_request(
    State(state): State<RequestAppState>,
    ValidatedJson(body): ValidatedJson<CreateRequestBody>,
) -> Result<Json<ApiResponse<RequestDto>>, ApiError> {
    let slot_id = parse_optional_slot_id(body.slot_id)?;

    let request = state
        .booking
        .create(NewRequest {
            client_id: body.client_id,
            motive: body.motive,
            complaint_id: body.complaint_id,
            slot_id,
            desired_date: body.desired_date,
            time_preference: body.time_preference,
            comment: body.comment,
        })
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(RequestDto::from_domain(request))))
}

#[utoipa::path(
    get,
    path = "/api/v1/requests/{request_id}",
    tag = "Requests",
    params(("request_id" = String, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request details", body = ApiResponse<RequestDto>),
        (status = 404, description = "Unknown request")
    )
)]
pub async fn get_request(
    State(state): State<RequestAppState>,
    Path(request_id): Path<String>,
) -> Result<Json<ApiResponse<RequestDto>>, ApiError> {
    let request_id = parse_request_id(&request_id)?;
    let request = state
        .booking
        .get(request_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(RequestDto::from_domain(request))))
}

#[utoipa::path(
    get,
    path = "/api/v1/requests",
    tag = "Requests",
    params(RequestStatusFilter),
    responses(
        (status = 200, description = "Requests, newest first", body = ApiResponse<Vec<RequestDto>>),
        (status = 400, description = "Unknown status value")
    )
)]
pub async fn list_requests(
    State(state): State<RequestAppState>,
    Query(filter): Query<RequestStatusFilter>,
) -> Result<Json<ApiResponse<Vec<RequestDto>>>, ApiError> {
    let status = filter
        .status
        .as_deref()
        .map(RequestStatus::parse)
        .transpose()
        .map_err(error_response)?;

    let requests = state.booking.list(status).await.map_err(error_response)?;
    let dtos = requests.into_iter().map(RequestDto::from_domain).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/clients/{client_id}/requests",
    tag = "Requests",
    params(("client_id" = i64, Path, description = "Client ID")),
    responses(
        (status = 200, description = "The client's requests, newest first", body = ApiResponse<Vec<RequestDto>>)
    )
)]
pub async fn list_client_requests(
    State(state): State<RequestAppState>,
    Path(client_id): Path<i64>,
) -> Result<Json<ApiResponse<Vec<RequestDto>>>, ApiError> {
    let requests = state
        .booking
        .list_by_client(client_id)
        .await
        .map_err(error_response)?;
    let dtos = requests.into_iter().map(RequestDto::from_domain).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    post,
    path = "/api/v1/requests/{request_id}/process",
    tag = "Requests",
    params(("request_id" = String, Path, description = "Request ID")),
    request_body = ProcessRequestBody,
    responses(
        (status = 200, description = "Request confirmed or rejected", body = ApiResponse<RequestDto>),
        (status = 400, description = "Request is not Pending, or no slot resolvable"),
        (status = 404, description = "Unknown request or slot"),
        (status = 409, description = "Slot already reserved; request stays Pending")
    )
)]
pub async fn process_request(
    State(state): State<RequestAppState>,
    Path(request_id): Path<String>,
    ValidatedJson(body): ValidatedJson<ProcessRequestBody>,
) -> Result<Json<ApiResponse<RequestDto>>, ApiError> {
    let request_id = parse_request_id(&request_id)?;
    let slot_id = parse_optional_slot_id(body.slot_id)?;

    let request = state
        .booking
        .process(
            request_id,
            Decision {
                accept: body.accept,
                slot_id,
                job_id: body.job_id,
                comment: body.comment,
            },
        )
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(RequestDto::from_domain(request))))
}

#[utoipa::path(
    post,
    path = "/api/v1/requests/{request_id}/cancel",
    tag = "Requests",
    params(("request_id" = String, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request cancelled, slot released if one was reserved", body = ApiResponse<RequestDto>),
        (status = 400, description = "Request already terminal"),
        (status = 404, description = "Unknown request")
    )
)]
pub async fn cancel_request(
    State(state): State<RequestAppState>,
    Path(request_id): Path<String>,
) -> Result<Json<ApiResponse<RequestDto>>, ApiError> {
    let request_id = parse_request_id(&request_id)?;
    let request = state
        .booking
        .cancel(request_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(RequestDto::from_domain(request))))
}
