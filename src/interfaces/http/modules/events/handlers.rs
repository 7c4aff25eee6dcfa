//! Event API handlers
//!
//! Reads are public. Creation requires the ORGANIZER or ADMIN role;
//! mutation of an existing event requires being its organizer or an admin.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    CreateEventRequest, EventDto, ListEventsParams, SearchEventsParams, UpdateEventRequest,
};
use crate::application::{CreateEvent, EventService, UpdateEvent};
use crate::domain::EventSearch;
use crate::interfaces::http::access;
use crate::interfaces::http::common::{domain_error, forbidden, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Event handler state
#[derive(Clone)]
pub struct EventHandlerState {
    pub event_service: Arc<EventService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    params(ListEventsParams),
    responses(
        (status = 200, description = "Event list", body = ApiResponse<Vec<EventDto>>)
    )
)]
pub async fn list_events(
    State(state): State<EventHandlerState>,
    Query(params): Query<ListEventsParams>,
) -> Result<Json<ApiResponse<Vec<EventDto>>>, (StatusCode, Json<ApiResponse<Vec<EventDto>>>)> {
    let events = if params.published_only {
        state.event_service.list_published().await
    } else {
        state.event_service.list_all().await
    }
    .map_err(domain_error)?;

    let items = events.into_iter().map(EventDto::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/events/search",
    tag = "Events",
    params(SearchEventsParams),
    responses(
        (status = 200, description = "Matching published events", body = ApiResponse<Vec<EventDto>>)
    )
)]
pub async fn search_events(
    State(state): State<EventHandlerState>,
    Query(params): Query<SearchEventsParams>,
) -> Result<Json<ApiResponse<Vec<EventDto>>>, (StatusCode, Json<ApiResponse<Vec<EventDto>>>)> {
    let events = state
        .event_service
        .search(EventSearch {
            keyword: params.keyword,
            category: params.category,
            date: params.date,
        })
        .await
        .map_err(domain_error)?;

    let items = events.into_iter().map(EventDto::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/events/{id}",
    tag = "Events",
    params(("id" = String, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event details", body = ApiResponse<EventDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_event(
    State(state): State<EventHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EventDto>>, (StatusCode, Json<ApiResponse<EventDto>>)> {
    let details = state.event_service.get(&id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EventDto::from(details))))
}

#[utoipa::path(
    get,
    path = "/api/v1/events/organizer/{organizer_id}",
    tag = "Events",
    params(("organizer_id" = String, Path, description = "Organizer user ID")),
    responses(
        (status = 200, description = "Events by organizer", body = ApiResponse<Vec<EventDto>>),
        (status = 404, description = "Organizer not found")
    )
)]
pub async fn list_events_by_organizer(
    State(state): State<EventHandlerState>,
    Path(organizer_id): Path<String>,
) -> Result<Json<ApiResponse<Vec<EventDto>>>, (StatusCode, Json<ApiResponse<Vec<EventDto>>>)> {
    let events = state
        .event_service
        .list_by_organizer(&organizer_id)
        .await
        .map_err(domain_error)?;

    let items = events.into_iter().map(EventDto::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    post,
    path = "/api/v1/events",
    tag = "Events",
    security(("bearer_auth" = [])),
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created (unpublished)", body = ApiResponse<EventDto>),
        (status = 400, description = "Invalid dates"),
        (status = 403, description = "Requires ORGANIZER or ADMIN role"),
        (status = 404, description = "Organizer not found")
    )
)]
pub async fn create_event(
    State(state): State<EventHandlerState>,
    Extension(actor): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateEventRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EventDto>>), (StatusCode, Json<ApiResponse<EventDto>>)> {
    if !access::can_create_events(&actor) {
        return Err(forbidden());
    }

    let details = state
        .event_service
        .create(CreateEvent {
            name: request.name,
            description: request.description,
            start_time: request.start_time,
            end_time: request.end_time,
            location: request.location,
            category: request.category,
            capacity: request.capacity,
            organizer_id: request.organizer_id,
        })
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(EventDto::from(details))),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/events/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Event ID")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = ApiResponse<EventDto>),
        (status = 400, description = "Invalid dates"),
        (status = 403, description = "Not the organizer"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_event(
    State(state): State<EventHandlerState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateEventRequest>,
) -> Result<Json<ApiResponse<EventDto>>, (StatusCode, Json<ApiResponse<EventDto>>)> {
    let existing = state.event_service.get(&id).await.map_err(domain_error)?;
    if !access::can_manage_event(&actor, &existing.event.organizer_id) {
        return Err(forbidden());
    }

    let details = state
        .event_service
        .update(
            &id,
            UpdateEvent {
                name: request.name,
                description: request.description,
                start_time: request.start_time,
                end_time: request.end_time,
                location: request.location,
                category: request.category,
                capacity: request.capacity,
            },
        )
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(EventDto::from(details))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/events/{id}",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deleted"),
        (status = 403, description = "Not the organizer"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_event(
    State(state): State<EventHandlerState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    let existing = state.event_service.get(&id).await.map_err(domain_error)?;
    if !access::can_manage_event(&actor, &existing.event.organizer_id) {
        return Err(forbidden());
    }

    state.event_service.delete(&id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/events/{id}/publish",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event published", body = ApiResponse<EventDto>),
        (status = 400, description = "Already published"),
        (status = 403, description = "Not the organizer"),
        (status = 404, description = "Not found")
    )
)]
pub async fn publish_event(
    State(state): State<EventHandlerState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EventDto>>, (StatusCode, Json<ApiResponse<EventDto>>)> {
    let existing = state.event_service.get(&id).await.map_err(domain_error)?;
    if !access::can_manage_event(&actor, &existing.event.organizer_id) {
        return Err(forbidden());
    }

    let details = state.event_service.publish(&id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EventDto::from(details))))
}

#[utoipa::path(
    patch,
    path = "/api/v1/events/{id}/unpublish",
    tag = "Events",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event unpublished", body = ApiResponse<EventDto>),
        (status = 400, description = "Already unpublished"),
        (status = 403, description = "Not the organizer"),
        (status = 404, description = "Not found")
    )
)]
pub async fn unpublish_event(
    State(state): State<EventHandlerState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EventDto>>, (StatusCode, Json<ApiResponse<EventDto>>)> {
    let existing = state.event_service.get(&id).await.map_err(domain_error)?;
    if !access::can_manage_event(&actor, &existing.event.organizer_id) {
        return Err(forbidden());
    }

    let details = state
        .event_service
        .unpublish(&id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(EventDto::from(details))))
}
