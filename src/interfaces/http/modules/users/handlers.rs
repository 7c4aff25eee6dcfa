//! User management API handlers
//!
//! Listing and creation are admin-only; read/update/delete of a single
//! account also allow the account owner.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{parse_roles, CreateUserRequest, UpdateUserRequest, UserDto};
use crate::application::identity::{CreateUser, UpdateUser};
use crate::application::UserService;
use crate::domain::Role;
use crate::interfaces::http::access;
use crate::interfaces::http::common::{domain_error, forbidden, ApiResponse, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// User handler state
#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User list", body = ApiResponse<Vec<UserDto>>),
        (status = 403, description = "Admin only")
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
    Extension(actor): Extension<AuthenticatedUser>,
) -> Result<Json<ApiResponse<Vec<UserDto>>>, (StatusCode, Json<ApiResponse<Vec<UserDto>>>)> {
    if !access::is_admin(&actor) {
        return Err(forbidden());
    }

    let users = state.user_service.list_users().await.map_err(domain_error)?;
    let items = users.into_iter().map(UserDto::from).collect();
    Ok(Json(ApiResponse::success(items)))
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserDto>),
        (status = 403, description = "Admin only"),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    Extension(actor): Extension<AuthenticatedUser>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserDto>>), (StatusCode, Json<ApiResponse<UserDto>>)> {
    if !access::is_admin(&actor) {
        return Err(forbidden());
    }

    let roles = if request.roles.is_empty() {
        vec![Role::User]
    } else {
        parse_roles(&request.roles)
    };

    let user = state
        .user_service
        .create_user(CreateUser {
            username: request.username,
            email: request.email,
            password: request.password,
            full_name: request.full_name,
            roles,
        })
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(UserDto::from(user))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 403, description = "Not your account"),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    if !access::can_act_as(&actor, &id) {
        return Err(forbidden());
    }

    let user = state.user_service.get_by_id(&id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/username/{username}",
    tag = "Users",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user_by_username(
    State(state): State<UserHandlerState>,
    Path(username): Path<String>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    let user = state
        .user_service
        .get_by_username(&username)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<UserDto>),
        (status = 403, description = "Not your account, or role change without admin"),
        (status = 404, description = "Not found"),
        (status = 409, description = "Username or email already exists")
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserDto>>, (StatusCode, Json<ApiResponse<UserDto>>)> {
    if !access::can_act_as(&actor, &id) {
        return Err(forbidden());
    }

    // Role changes are an admin-only capability
    if request.roles.is_some() && !access::is_admin(&actor) {
        return Err(forbidden());
    }

    let user = state
        .user_service
        .update_user(
            &id,
            UpdateUser {
                username: request.username,
                email: request.email,
                full_name: request.full_name,
                password: request.password,
                roles: request.roles.as_deref().map(parse_roles),
            },
        )
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(UserDto::from(user))))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 403, description = "Not your account"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Extension(actor): Extension<AuthenticatedUser>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, (StatusCode, Json<ApiResponse<()>>)> {
    if !access::can_act_as(&actor, &id) {
        return Err(forbidden());
    }

    state.user_service.delete_user(&id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(())))
}
