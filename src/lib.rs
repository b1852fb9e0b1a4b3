use axum::{
    Router,
    extract::FromRef,
    http::{HeaderName, HeaderValue, Method, header},
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Core application services and components.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod roles;
pub mod storage;
pub mod token;

// One router module per resource collection.
pub mod routes;
use routes::{applicants, applications, auth as auth_routes, jobs, recruiters, users};

// --- Public Re-exports ---

// Makes core state types easily accessible to the main entry point.
pub use config::AppConfig;
pub use repository::{PostgresRepository, RepositoryState};
pub use storage::{MockStorageService, S3StorageClient, StorageState};

/// ApiDoc
///
/// Auto-generates the OpenAPI documentation (Swagger JSON) by aggregating
/// every handler decorated with `#[utoipa::path]` and every schema with
/// `#[derive(utoipa::ToSchema)]`. Served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::issue_jwt, handlers::logout,
        handlers::create_user, handlers::get_users, handlers::set_user_role,
        handlers::create_job, handlers::get_jobs, handlers::get_jobs_by_company,
        handlers::get_job, handlers::update_job, handlers::delete_job,
        handlers::create_application, handlers::get_applications,
        handlers::get_application, handlers::update_application,
        handlers::delete_application,
        handlers::get_applicants, handlers::delete_applicant,
        handlers::get_recruiters, handlers::delete_recruiter,
    ),
    components(
        schemas(
            models::User, models::RoleProfile, models::Job, models::Application,
            models::IssueTokenRequest, models::CreateUserRequest, models::SetRoleRequest,
            models::CreateJobRequest, models::UpdateJobRequest,
            models::ApplicationMetadata, models::ApiMessage,
        )
    ),
    tags(
        (name = "job-portal", description = "Job Board RBAC API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, thread-safe, immutable container holding all application
/// services and configuration, shared across all incoming requests.
#[derive(Clone)]
pub struct AppState {
    /// Repository Layer: the document-store facade.
    pub repo: RepositoryState,
    /// Storage Layer: the blob-store facade for resume uploads.
    pub storage: StorageState,
    /// Configuration: the loaded, immutable environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

// Allow handlers and extractors to selectively pull components from the
// shared AppState.

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routing structure, applies the observability and CORS
/// layers, and registers the application state. Session gating is enforced
/// per-handler via the `AuthUser` extractor rather than a blanket layer,
/// because most resources mix public reads with gated mutations.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    // The session cookie only travels when the browser is allowed to send
    // credentials, which in turn requires an exact allowed origin.
    let origin = state
        .config
        .frontend_origin
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:5173"));
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    // Header name constant for request correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // GET /health — unauthenticated liveness probe.
        .route("/health", axum::routing::get(|| async { "ok" }))
        // Resource routers, one per collection.
        .nest("/auth", auth_routes::auth_routes())
        .nest("/users", users::user_routes())
        .nest("/jobs", jobs::job_routes())
        .nest("/applications", applications::application_routes())
        .nest("/applicants", applicants::applicant_routes())
        .nest("/recruiters", recruiters::recruiter_routes())
        // Apply the unified state to all routes.
        .with_state(state);

    // 3. Observability and Correlation Layers (applied outermost)
    base_router
        .layer(
            ServiceBuilder::new()
                // 3a. Request ID generation: a unique UUID per request.
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                // 3b. Request tracing: wraps the request/response lifecycle
                // in a span correlated by the generated request id.
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                // 3c. Request ID propagation back to the client.
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        // 4. CORS layer.
        .layer(cors)
}

/// trace_span_logger
///
/// Customizes the tracing span creation: extracts the `x-request-id` header
/// and includes it alongside the HTTP method and URI, so every log line for
/// a single request is correlated by a unique id.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
