//! Availability HTTP handlers

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;

use crate::application::AvailabilityService;
use crate::domain::TechnicianDirectory;
use crate::interfaces::http::common::{
    error_response, ApiError, ApiResponse, PaginationParams,
};
use crate::interfaces::http::modules::slots::SlotDto;

use super::dto::*;

/// Application state for availability handlers.
#[derive(Clone)]
pub struct AvailabilityAppState {
    pub availability: Arc<AvailabilityService>,
    pub directory: Arc<dyn TechnicianDirectory>,
}

async fn to_dtos(
    state: &AvailabilityAppState,
    slots: Vec<crate::domain::Slot>,
) -> Vec<SlotDto> {
    let mut dtos = Vec::with_capacity(slots.len());
    for slot in slots {
        let name = state.directory.display_name(slot.technician_id).await;
        dtos.push(SlotDto::from_domain(slot, name));
    }
    dtos
}

#[utoipa::path(
    get,
    path = "/api/v1/availability",
    tag = "Availability",
    params(AvailabilityFilter),
    responses(
        (status = 200, description = "Slots intersecting the range", body = ApiResponse<Vec<SlotDto>>),
        (status = 400, description = "Invalid range")
    )
)]
pub async fn list_availability(
    State(state): State<AvailabilityAppState>,
    Query(filter): Query<AvailabilityFilter>,
) -> Result<Json<ApiResponse<Vec<SlotDto>>>, ApiError> {
    let slots = state
        .availability
        .list(filter.from, filter.to, filter.technician_id)
        .await
        .map_err(error_response)?;

    let dtos = to_dtos(&state, slots).await;
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/availability/paged",
    tag = "Availability",
    params(AvailabilityFilter, PaginationParams),
    responses(
        (status = 200, description = "One availability page with whole-set totals", body = ApiResponse<AvailabilityPageDto>),
        (status = 400, description = "Invalid range or pagination")
    )
)]
pub async fn list_availability_paged(
    State(state): State<AvailabilityAppState>,
    Query(filter): Query<AvailabilityFilter>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<AvailabilityPageDto>>, ApiError> {
    let crate::application::AvailabilityPage {
        slots,
        total,
        free,
        reserved,
        page,
        page_size,
        total_pages,
    } = state
        .availability
        .query(
            filter.from,
            filter.to,
            filter.technician_id,
            pagination.page,
            pagination.limit,
        )
        .await
        .map_err(error_response)?;

    let items = to_dtos(&state, slots).await;

    Ok(Json(ApiResponse::success(AvailabilityPageDto {
        items,
        total,
        free,
        reserved,
        page,
        limit: page_size,
        total_pages,
    })))
}
