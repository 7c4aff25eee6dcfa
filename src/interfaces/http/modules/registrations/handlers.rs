//! Registration API handlers
//!
//! Thin wrappers around the registration lifecycle service. Handlers only
//! add the access-policy checks; every invariant lives in the service.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::RegistrationDto;
use crate::application::{EventService, RegistrationService};
use crate::interfaces::http::access;
use crate::interfaces::http::common::{domain_error, forbidden, ApiResponse};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Registration handler state
#[derive(Clone)]
pub struct RegistrationHandlerState {
    pub registration_service: Arc<RegistrationService>,
    pub event_service: Arc<EventService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/registrations",
    tag = "Registrations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All registrations", body = ApiResponse<Vec<RegistrationDto>>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_registrations(
    State(state): State<RegistrationHandlerState>,
    Extension(actor): Extension<AuthenticatedUser>,
) -> Result<
    Json<ApiResponse<Vec<RegistrationDto>>>,
    (StatusCode, Json<ApiResponse<Vec<RegistrationDto>>>),
> {
    if !access::is_admin(&actor) {
        return Err(forbidden());
    }

    let rows = state
        .registration_service
        .list_all()
        .await
        .map_err(domain_error)?;
    let items = rows.into_iter().map(RegistrationDto::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/registrations/{id}",
    tag = "Registrations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Registration ID")),
    responses(
        (status = 200, description = "Registration details", body = ApiResponse<RegistrationDto>),
        (status = 403, description = "Not the registrant or event organizer"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_registration(
    State(state): State<RegistrationHandlerState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<RegistrationDto>>, (StatusCode, Json<ApiResponse<RegistrationDto>>)> {
    let registration = state
        .registration_service
        .get_by_id(&id)
        .await
        .map_err(domain_error)?;

    let event = state
        .event_service
        .get(&registration.event_id)
        .await
        .map_err(domain_error)?;

    if !access::can_view_registration(&actor, &registration.user_id, &event.event.organizer_id) {
        return Err(forbidden());
    }

    Ok(Json(ApiResponse::success(RegistrationDto::from(
        registration,
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/registrations/user/{user_id}",
    tag = "Registrations",
    security(("bearer_auth" = [])),
    params(("user_id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Registrations by user", body = ApiResponse<Vec<RegistrationDto>>),
        (status = 403, description = "Not your registrations"),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_registrations_by_user(
    State(state): State<RegistrationHandlerState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
) -> Result<
    Json<ApiResponse<Vec<RegistrationDto>>>,
    (StatusCode, Json<ApiResponse<Vec<RegistrationDto>>>),
> {
    if !access::can_act_as(&actor, &user_id) {
        return Err(forbidden());
    }

    let rows = state
        .registration_service
        .list_by_user(&user_id)
        .await
        .map_err(domain_error)?;
    let items = rows.into_iter().map(RegistrationDto::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    get,
    path = "/api/v1/registrations/event/{event_id}",
    tag = "Registrations",
    security(("bearer_auth" = [])),
    params(("event_id" = String, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Registrations for event", body = ApiResponse<Vec<RegistrationDto>>),
        (status = 403, description = "Not the event organizer"),
        (status = 404, description = "Event not found")
    )
)]
pub async fn list_registrations_by_event(
    State(state): State<RegistrationHandlerState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
) -> Result<
    Json<ApiResponse<Vec<RegistrationDto>>>,
    (StatusCode, Json<ApiResponse<Vec<RegistrationDto>>>),
> {
    let event = state
        .event_service
        .get(&event_id)
        .await
        .map_err(domain_error)?;

    if !access::can_manage_event(&actor, &event.event.organizer_id) {
        return Err(forbidden());
    }

    let rows = state
        .registration_service
        .list_by_event(&event_id)
        .await
        .map_err(domain_error)?;
    let items = rows.into_iter().map(RegistrationDto::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    post,
    path = "/api/v1/registrations/user/{user_id}/event/{event_id}",
    tag = "Registrations",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = String, Path, description = "User ID"),
        ("event_id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 201, description = "Registration confirmed", body = ApiResponse<RegistrationDto>),
        (status = 400, description = "Unpublished, full or past event"),
        (status = 403, description = "Cannot register someone else"),
        (status = 404, description = "User or event not found"),
        (status = 409, description = "Already registered")
    )
)]
pub async fn register_for_event(
    State(state): State<RegistrationHandlerState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path((user_id, event_id)): Path<(String, String)>,
) -> Result<
    (StatusCode, Json<ApiResponse<RegistrationDto>>),
    (StatusCode, Json<ApiResponse<RegistrationDto>>),
> {
    if !access::can_act_as(&actor, &user_id) {
        return Err(forbidden());
    }

    let registration = state
        .registration_service
        .register(&user_id, &event_id)
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(RegistrationDto::from(registration))),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/v1/registrations/user/{user_id}/event/{event_id}/cancel",
    tag = "Registrations",
    security(("bearer_auth" = [])),
    params(
        ("user_id" = String, Path, description = "User ID"),
        ("event_id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Registration cancelled", body = ApiResponse<RegistrationDto>),
        (status = 400, description = "Event already started"),
        (status = 403, description = "Cannot cancel for someone else"),
        (status = 404, description = "Registration not found")
    )
)]
pub async fn cancel_registration(
    State(state): State<RegistrationHandlerState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path((user_id, event_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<RegistrationDto>>, (StatusCode, Json<ApiResponse<RegistrationDto>>)> {
    if !access::can_act_as(&actor, &user_id) {
        return Err(forbidden());
    }

    let registration = state
        .registration_service
        .cancel(&user_id, &event_id)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(RegistrationDto::from(
        registration,
    ))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/registrations/{id}",
    tag = "Registrations",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Registration ID")),
    responses(
        (status = 204, description = "Registration deleted"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_registration(
    State(state): State<RegistrationHandlerState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, (StatusCode, Json<ApiResponse<()>>)> {
    if !access::is_admin(&actor) {
        return Err(forbidden());
    }

    state
        .registration_service
        .delete(&id)
        .await
        .map_err(domain_error)?;
    Ok(StatusCode::NO_CONTENT)
}
