//! Slot HTTP handlers

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{NaiveTime, Weekday};
use uuid::Uuid;

use crate::application::scheduling::RecurrenceSpec;
use crate::application::SlotService;
use crate::domain::TechnicianDirectory;
use crate::interfaces::http::common::{
    bad_request, error_response, ApiError, ApiResponse, EmptyData, ValidatedJson,
};

use super::dto::*;

/// Application state for slot handlers.
#[derive(Clone)]
pub struct SlotAppState {
    pub slot_service: Arc<SlotService>,
    pub directory: Arc<dyn TechnicianDirectory>,
}

pub(crate) fn parse_slot_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| bad_request(format!("invalid slot id '{raw}'")))
}

fn parse_daily_time(raw: &str, field: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .map_err(|_| bad_request(format!("invalid {field} '{raw}', expected HH:MM")))
}

fn parse_weekdays(raw: &[String]) -> Result<Vec<Weekday>, ApiError> {
    let mut weekdays = Vec::with_capacity(raw.len());
    for name in raw {
        let day = Weekday::from_str(name)
            .map_err(|_| bad_request(format!("invalid weekday '{name}'")))?;
        if !weekdays.contains(&day) {
            weekdays.push(day);
        }
    }
    Ok(weekdays)
}

async fn to_dto(state: &SlotAppState, slot: crate::domain::Slot) -> SlotDto {
    let name = state.directory.display_name(slot.technician_id).await;
    SlotDto::from_domain(slot, name)
}

#[utoipa::path(
    post,
    path = "/api/v1/slots",
    tag = "Slots",
    request_body = CreateSlotRequest,
    responses(
        (status = 200, description = "Slot created", body = ApiResponse<SlotDto>),
        (status = 400, description = "Invalid interval"),
        (status = 409, description = "Overlaps an existing slot")
    )
)]
pub async fn create_slot(
    State(state): State<SlotAppState>,
    ValidatedJson(request): ValidatedJson<CreateSlotRequest>,
) -> Result<Json<ApiResponse<SlotDto>>, ApiError> {
    let slot = state
        .slot_service
        .create_slot(request.technician_id, request.start_time, request.end_time)
        .await
        .map_err(error_response)?;

    let dto = to_dto(&state, slot).await;
    Ok(Json(ApiResponse::success(dto)))
}

#[utoipa::path(
    post,
    path = "/api/v1/slots/generate",
    tag = "Slots",
    request_body = GenerateSlotsRequest,
    responses(
        (status = 200, description = "Accepted subset of generated slots", body = ApiResponse<GeneratedSlotsResponse>),
        (status = 400, description = "Invalid recurrence specification")
    )
)]
pub async fn generate_slots(
    State(state): State<SlotAppState>,
    ValidatedJson(request): ValidatedJson<GenerateSlotsRequest>,
) -> Result<Json<ApiResponse<GeneratedSlotsResponse>>, ApiError> {
    let spec = RecurrenceSpec {
        technician_id: request.technician_id,
        range_start: request.range_start,
        range_end: request.range_end,
        slot_duration_minutes: request.slot_duration_minutes,
        weekdays: parse_weekdays(&request.weekdays)?,
        daily_start: parse_daily_time(&request.daily_start, "daily_start")?,
        daily_end: parse_daily_time(&request.daily_end, "daily_end")?,
    };

    let accepted = state
        .slot_service
        .generate_recurring(&spec)
        .await
        .map_err(error_response)?;

    let mut dtos = Vec::with_capacity(accepted.len());
    for slot in accepted {
        dtos.push(to_dto(&state, slot).await);
    }

    Ok(Json(ApiResponse::success(GeneratedSlotsResponse {
        accepted_count: dtos.len(),
        accepted: dtos,
    })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/slots/{slot_id}",
    tag = "Slots",
    params(("slot_id" = String, Path, description = "Slot ID")),
    responses(
        (status = 200, description = "Slot deleted", body = ApiResponse<EmptyData>),
        (status = 404, description = "Unknown slot"),
        (status = 409, description = "Slot is reserved")
    )
)]
pub async fn delete_slot(
    State(state): State<SlotAppState>,
    Path(slot_id): Path<String>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    let slot_id = parse_slot_id(&slot_id)?;
    state
        .slot_service
        .delete(slot_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    post,
    path = "/api/v1/slots/{slot_id}/reserve",
    tag = "Slots",
    params(("slot_id" = String, Path, description = "Slot ID")),
    request_body = ReserveSlotRequest,
    responses(
        (status = 200, description = "Slot reserved", body = ApiResponse<SlotDto>),
        (status = 404, description = "Unknown slot"),
        (status = 409, description = "Already reserved")
    )
)]
pub async fn reserve_slot(
    State(state): State<SlotAppState>,
    Path(slot_id): Path<String>,
    ValidatedJson(request): ValidatedJson<ReserveSlotRequest>,
) -> Result<Json<ApiResponse<SlotDto>>, ApiError> {
    let slot_id = parse_slot_id(&slot_id)?;
    let slot = state
        .slot_service
        .reserve(slot_id, &request.job_id)
        .await
        .map_err(error_response)?;

    let dto = to_dto(&state, slot).await;
    Ok(Json(ApiResponse::success(dto)))
}

#[utoipa::path(
    post,
    path = "/api/v1/slots/{slot_id}/release",
    tag = "Slots",
    params(("slot_id" = String, Path, description = "Slot ID")),
    responses(
        (status = 200, description = "Slot released (idempotent)", body = ApiResponse<EmptyData>),
        (status = 404, description = "Unknown slot")
    )
)]
pub async fn release_slot(
    State(state): State<SlotAppState>,
    Path(slot_id): Path<String>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    let slot_id = parse_slot_id(&slot_id)?;
    state
        .slot_service
        .release(slot_id)
        .await
        .map_err(error_response)?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}

#[utoipa::path(
    get,
    path = "/api/v1/technicians/{technician_id}/slots",
    tag = "Slots",
    params(
        ("technician_id" = i64, Path, description = "Technician ID"),
        SlotDateFilter
    ),
    responses(
        (status = 200, description = "Technician slots ordered by start time", body = ApiResponse<Vec<SlotDto>>)
    )
)]
pub async fn list_technician_slots(
    State(state): State<SlotAppState>,
    Path(technician_id): Path<i64>,
    Query(filter): Query<SlotDateFilter>,
) -> Result<Json<ApiResponse<Vec<SlotDto>>>, ApiError> {
    let slots = state
        .slot_service
        .list_by_technician(technician_id, filter.date)
        .await
        .map_err(error_response)?;

    let name = state.directory.display_name(technician_id).await;
    let dtos = slots
        .into_iter()
        .map(|slot| SlotDto::from_domain(slot, name.clone()))
        .collect();

    Ok(Json(ApiResponse::success(dtos)))
}
