//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{EventService, RegistrationService, UserService};
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::{auth, events, health, registrations, users};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::handlers::health_check,
        // Auth
        auth::handlers::login,
        auth::handlers::register,
        auth::handlers::get_current_user,
        // Users
        users::handlers::list_users,
        users::handlers::create_user,
        users::handlers::get_user,
        users::handlers::get_user_by_username,
        users::handlers::update_user,
        users::handlers::delete_user,
        // Events
        events::handlers::list_events,
        events::handlers::search_events,
        events::handlers::get_event,
        events::handlers::list_events_by_organizer,
        events::handlers::create_event,
        events::handlers::update_event,
        events::handlers::delete_event,
        events::handlers::publish_event,
        events::handlers::unpublish_event,
        // Registrations
        registrations::handlers::list_registrations,
        registrations::handlers::get_registration,
        registrations::handlers::list_registrations_by_user,
        registrations::handlers::list_registrations_by_event,
        registrations::handlers::register_for_event,
        registrations::handlers::cancel_registration,
        registrations::handlers::delete_registration,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            // Health
            health::handlers::HealthResponse,
            health::handlers::ComponentHealth,
            // Auth
            auth::dto::LoginRequest,
            auth::dto::LoginResponse,
            auth::dto::RegisterRequest,
            auth::dto::UserInfo,
            // Users
            users::dto::UserDto,
            users::dto::CreateUserRequest,
            users::dto::UpdateUserRequest,
            // Events
            events::dto::EventDto,
            events::dto::CreateEventRequest,
            events::dto::UpdateEventRequest,
            // Registrations
            registrations::dto::RegistrationDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "User authentication: login (JWT), self-signup, current user"),
        (name = "Users", description = "User account management"),
        (name = "Events", description = "Event CRUD, search and publication"),
        (name = "Registrations", description = "Event registration lifecycle"),
    ),
    info(
        title = "EventHub API",
        version = "1.0.0",
        description = "REST API for event registration management",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    user_service: Arc<UserService>,
    event_service: Arc<EventService>,
    registration_service: Arc<RegistrationService>,
    db: DatabaseConnection,
    jwt_config: JwtConfig,
) -> Router {
    let auth_state = AuthState { jwt_config };

    let auth_handler_state = auth::AuthHandlerState {
        user_service: user_service.clone(),
    };
    let user_state = users::UserHandlerState { user_service };
    let event_state = events::EventHandlerState {
        event_service: event_service.clone(),
    };
    let registration_state = registrations::RegistrationHandlerState {
        registration_service,
        event_service,
    };
    let health_state = health::HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes: login/register public, /me behind the JWT middleware
    let auth_routes = Router::new()
        .route("/login", post(auth::handlers::login))
        .route("/register", post(auth::handlers::register))
        .merge(
            Router::new()
                .route("/me", get(auth::handlers::get_current_user))
                .layer(middleware::from_fn_with_state(
                    auth_state.clone(),
                    auth_middleware,
                )),
        )
        .with_state(auth_handler_state);

    // User routes: lookup by username is public, the rest requires auth
    let user_routes = Router::new()
        .route(
            "/username/{username}",
            get(users::handlers::get_user_by_username),
        )
        .merge(
            Router::new()
                .route(
                    "/",
                    get(users::handlers::list_users).post(users::handlers::create_user),
                )
                .route(
                    "/{id}",
                    get(users::handlers::get_user)
                        .put(users::handlers::update_user)
                        .delete(users::handlers::delete_user),
                )
                .layer(middleware::from_fn_with_state(
                    auth_state.clone(),
                    auth_middleware,
                )),
        )
        .with_state(user_state);

    // Event routes: reads public, mutations behind the JWT middleware
    let event_routes = Router::new()
        .route("/", get(events::handlers::list_events))
        .route("/search", get(events::handlers::search_events))
        .route(
            "/organizer/{organizer_id}",
            get(events::handlers::list_events_by_organizer),
        )
        .route("/{id}", get(events::handlers::get_event))
        .merge(
            Router::new()
                .route("/", post(events::handlers::create_event))
                .route(
                    "/{id}",
                    put(events::handlers::update_event).delete(events::handlers::delete_event),
                )
                .route("/{id}/publish", patch(events::handlers::publish_event))
                .route("/{id}/unpublish", patch(events::handlers::unpublish_event))
                .layer(middleware::from_fn_with_state(
                    auth_state.clone(),
                    auth_middleware,
                )),
        )
        .with_state(event_state);

    // Registration routes (all protected)
    let registration_routes = Router::new()
        .route("/", get(registrations::handlers::list_registrations))
        .route(
            "/{id}",
            get(registrations::handlers::get_registration)
                .delete(registrations::handlers::delete_registration),
        )
        .route(
            "/user/{user_id}",
            get(registrations::handlers::list_registrations_by_user),
        )
        .route(
            "/event/{event_id}",
            get(registrations::handlers::list_registrations_by_event),
        )
        .route(
            "/user/{user_id}/event/{event_id}",
            post(registrations::handlers::register_for_event),
        )
        .route(
            "/user/{user_id}/event/{event_id}/cancel",
            patch(registrations::handlers::cancel_registration),
        )
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(registration_state);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    // Build router
    Router::new()
        // Swagger UI
        .merge(swagger_routes)
        // Health
        .route("/health", get(health::handlers::health_check))
        .with_state(health_state)
        // Auth
        .nest("/api/v1/auth", auth_routes)
        // Users
        .nest("/api/v1/users", user_routes)
        // Events
        .nest("/api/v1/events", event_routes)
        // Registrations
        .nest("/api/v1/registrations", registration_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
