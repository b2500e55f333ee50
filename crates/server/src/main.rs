// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header::InvalidHeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use clap::Parser;
use event_booking::{CredentialStore, SigningAlgorithm, TokenService};
use event_booking_api::{
    ApiError, AuthConfig, BookingRequest, BookingResponse, CreateEventRequest, EventResponse,
    LoginRequest, LoginResponse, OrganizerStatusRequest, PreparedAdmin, PreparedRegistration,
    RegisterAdminRequest, RegisterRequest, UpdateProfileRequest, UserDetailsResponse,
    UserResponse, WhoAmIResponse, apply_profile_update, approve_event,
    authorize_admin_registration, book_event, complete_admin_registration, complete_registration,
    find_login_account, finish_login, get_event, get_user_details, list_approved_events,
    list_my_bookings, list_my_events, list_organizers, prepare_admin_registration,
    prepare_profile_update, prepare_registration, reject_event, set_organizer_status,
    submit_event, whoami,
};
use event_booking_domain::User;
use event_booking_persistence::{Persistence, ProfileChanges};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, error, info};

use crate::session::{OptionalSessionUser, SessionUser};

/// Event Booking Server - HTTP surface for accounts, events and bookings
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file, or `:memory:`.
    #[arg(long, env = "EVENT_BOOKING_DATABASE")]
    database: String,

    /// Address to bind the server to.
    #[arg(long, env = "EVENT_BOOKING_BIND", default_value = "127.0.0.1:8000")]
    bind: SocketAddr,

    /// Secret used to sign identity tokens.
    #[arg(long, env = "EVENT_BOOKING_JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Token signing algorithm (HS256, HS384 or HS512).
    #[arg(long, env = "EVENT_BOOKING_JWT_ALGORITHM", default_value = "HS256")]
    jwt_algorithm: SigningAlgorithm,

    /// Token lifetime in minutes.
    #[arg(
        long,
        env = "EVENT_BOOKING_TOKEN_TTL_MINUTES",
        default_value_t = 30,
        value_parser = clap::value_parser!(i64).range(1..)
    )]
    token_ttl_minutes: i64,

    /// Secret required to create the first admin. Bootstrap is disabled
    /// when unset.
    #[arg(long, env = "EVENT_BOOKING_ADMIN_SETUP_TOKEN", hide_env_values = true)]
    admin_setup_token: Option<String>,

    /// Comma-separated list of allowed CORS origins.
    #[arg(long, env = "EVENT_BOOKING_CORS_ORIGINS", value_delimiter = ',')]
    cors_origins: Vec<String>,

    /// bcrypt cost factor for password hashes.
    #[arg(long, env = "EVENT_BOOKING_BCRYPT_COST", default_value_t = 12)]
    bcrypt_cost: u32,
}

/// Application state shared across handlers.
///
/// The store is a single connection behind a Mutex. Handlers take the lock
/// on a blocking thread since every store call is synchronous, and hash or
/// verify passwords before or after holding it.
#[derive(Clone)]
pub(crate) struct AppState {
    /// The persistence layer for users, events and bookings.
    pub(crate) persistence: Arc<Mutex<Persistence>>,
    /// Credential, token and bootstrap configuration.
    pub(crate) auth: Arc<AuthConfig>,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
struct ErrorResponse {
    /// Always `true`.
    error: bool,
    /// Stable machine-readable error code.
    code: String,
    /// Human-readable error message.
    message: String,
}

/// Static response for the health route.
#[derive(Debug, Serialize, Deserialize)]
struct MessageResponse {
    message: String,
}

/// Query parameters for `POST /admin/register`.
#[derive(Debug, Deserialize)]
struct SetupTokenQuery {
    setup_token: Option<String>,
}

/// Query parameters for `GET /admin/organizers`.
#[derive(Debug, Deserialize)]
struct OrganizerListQuery {
    status: Option<String>,
}

/// Wrapper for HTTP errors that can be converted to responses.
#[derive(Debug)]
pub(crate) struct HttpError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::InvalidCredentials
            | ApiError::Unauthorized { .. }
            | ApiError::UserNotFound => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. }
            | ApiError::OrganizerNotApproved { .. }
            | ApiError::InvalidSetupToken
            | ApiError::ForbiddenRoleRegistration { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidId { .. }
            | ApiError::InvalidInput { .. }
            | ApiError::PasswordPolicyViolation { .. }
            | ApiError::DuplicateEmail { .. } => StatusCode::BAD_REQUEST,
            ApiError::SoldOut { .. } | ApiError::NoOpStatusChange { .. } => StatusCode::CONFLICT,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message: String = if let ApiError::Internal { message } = &err {
            error!(error = %message, "Request failed with internal error");
            String::from("Internal server error")
        } else {
            err.to_string()
        };

        Self {
            status,
            code: err.code(),
            message,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: ErrorResponse = ErrorResponse {
            error: true,
            code: self.code.to_string(),
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Unwraps a JSON body, reporting malformed payloads as `invalid_input`.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, HttpError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        debug!(error = %rejection.body_text(), "Rejected request body");
        HttpError::from(ApiError::InvalidInput {
            field: String::from("body"),
            message: rejection.body_text(),
        })
    })
}

/// Runs synchronous work on the blocking pool.
async fn run_blocking<T, F>(operation: F) -> Result<T, HttpError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
{
    let result: Result<T, ApiError> = tokio::task::spawn_blocking(operation)
        .await
        .map_err(|e| {
            HttpError::from(ApiError::Internal {
                message: format!("blocking task failed: {e}"),
            })
        })?;

    result.map_err(HttpError::from)
}

/// Runs a store operation on a blocking thread while holding the store lock.
///
/// Closures passed here must not hash or verify passwords; that work goes
/// through [`with_credentials`] so it never holds the lock.
async fn with_store<T, F>(app_state: &AppState, operation: F) -> Result<T, HttpError>
where
    T: Send + 'static,
    F: FnOnce(&mut Persistence, &AuthConfig) -> Result<T, ApiError> + Send + 'static,
{
    let persistence: Arc<Mutex<Persistence>> = Arc::clone(&app_state.persistence);
    let auth: Arc<AuthConfig> = Arc::clone(&app_state.auth);

    run_blocking(move || {
        let mut guard = persistence.blocking_lock();
        operation(&mut *guard, auth.as_ref())
    })
    .await
}

/// Runs bcrypt work on a blocking thread without touching the store.
async fn with_credentials<T, F>(app_state: &AppState, operation: F) -> Result<T, HttpError>
where
    T: Send + 'static,
    F: FnOnce(&AuthConfig) -> Result<T, ApiError> + Send + 'static,
{
    let auth: Arc<AuthConfig> = Arc::clone(&app_state.auth);
    run_blocking(move || operation(auth.as_ref())).await
}

/// Handler for GET / endpoint.
async fn handle_root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: String::from("Welcome to Event Management API"),
    })
}

/// Handler for POST /auth/register endpoint.
///
/// Registers an attendee or organizer account.
async fn handle_register(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), HttpError> {
    let request: RegisterRequest = json_body(payload)?;
    info!(email = %request.email, role = %request.role, "Handling register request");

    let prepared: PreparedRegistration = with_credentials(&app_state, move |auth| {
        prepare_registration(auth, &request)
    })
    .await?;
    let response: UserResponse = with_store(&app_state, move |persistence, _| {
        complete_registration(persistence, &prepared)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for POST /auth/login endpoint.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, HttpError> {
    let request: LoginRequest = json_body(payload)?;
    info!(email = %request.email, "Handling login request");

    let email: String = request.email.clone();
    let account: Option<User> = with_store(&app_state, move |persistence, _| {
        find_login_account(persistence, &email)
    })
    .await?;
    let response: LoginResponse = with_credentials(&app_state, move |auth| {
        finish_login(auth, account.as_ref(), &request.password)
    })
    .await?;

    Ok(Json(response))
}

/// Handler for POST /admin/register endpoint.
///
/// Creates the first admin when the setup token matches, or adds an admin
/// when called by an existing admin.
async fn handle_register_admin(
    AxumState(app_state): AxumState<AppState>,
    OptionalSessionUser(caller): OptionalSessionUser,
    Query(query): Query<SetupTokenQuery>,
    payload: Result<Json<RegisterAdminRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), HttpError> {
    let request: RegisterAdminRequest = json_body(payload)?;
    info!(
        email = %request.email,
        authenticated = caller.is_some(),
        "Handling register_admin request"
    );

    let setup_token: Option<String> = query.setup_token;
    {
        let caller: Option<User> = caller.clone();
        let setup_token: Option<String> = setup_token.clone();
        with_store(&app_state, move |persistence, auth| {
            authorize_admin_registration(
                persistence,
                auth,
                caller.as_ref(),
                setup_token.as_deref(),
            )
        })
        .await?;
    }

    let prepared: PreparedAdmin = with_credentials(&app_state, move |auth| {
        prepare_admin_registration(auth, &request)
    })
    .await?;
    let response: UserResponse = with_store(&app_state, move |persistence, auth| {
        complete_admin_registration(
            persistence,
            auth,
            caller.as_ref(),
            setup_token.as_deref(),
            &prepared,
        )
    })
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for PUT `/admin/organizers/{user_id}` endpoint.
async fn handle_set_organizer_status(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(admin): SessionUser,
    Path(user_id): Path<String>,
    payload: Result<Json<OrganizerStatusRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, HttpError> {
    let request: OrganizerStatusRequest = json_body(payload)?;
    info!(
        admin_id = %admin.id,
        user_id = %user_id,
        status = %request.status,
        "Handling set_organizer_status request"
    );

    let response: UserResponse = with_store(&app_state, move |persistence, _| {
        set_organizer_status(persistence, &admin, &user_id, &request)
    })
    .await?;

    Ok(Json(response))
}

/// Handler for GET /admin/organizers endpoint.
async fn handle_list_organizers(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(admin): SessionUser,
    Query(query): Query<OrganizerListQuery>,
) -> Result<Json<Vec<UserResponse>>, HttpError> {
    debug!(status = ?query.status, "Handling list_organizers request");

    let response: Vec<UserResponse> = with_store(&app_state, move |persistence, _| {
        list_organizers(persistence, &admin, query.status.as_deref())
    })
    .await?;

    Ok(Json(response))
}

/// Handler for POST /events endpoint.
async fn handle_submit_event(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(caller): SessionUser,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<EventResponse>), HttpError> {
    let request: CreateEventRequest = json_body(payload)?;
    info!(organizer_id = %caller.id, title = %request.title, "Handling submit_event request");

    let response: EventResponse = with_store(&app_state, move |persistence, _| {
        submit_event(persistence, &caller, &request)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET /events endpoint. Public.
async fn handle_list_events(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<Vec<EventResponse>>, HttpError> {
    let response: Vec<EventResponse> =
        with_store(&app_state, |persistence, _| list_approved_events(persistence)).await?;
    Ok(Json(response))
}

/// Handler for GET /events/mine endpoint.
async fn handle_list_my_events(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(caller): SessionUser,
) -> Result<Json<Vec<EventResponse>>, HttpError> {
    let response: Vec<EventResponse> = with_store(&app_state, move |persistence, _| {
        list_my_events(persistence, &caller)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for PUT `/events/{event_id}/approve` endpoint.
async fn handle_approve_event(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(admin): SessionUser,
    Path(event_id): Path<String>,
) -> Result<Json<EventResponse>, HttpError> {
    info!(admin_id = %admin.id, event_id = %event_id, "Handling approve_event request");

    let response: EventResponse = with_store(&app_state, move |persistence, _| {
        approve_event(persistence, &admin, &event_id)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for PUT `/events/{event_id}/reject` endpoint.
async fn handle_reject_event(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(admin): SessionUser,
    Path(event_id): Path<String>,
) -> Result<Json<EventResponse>, HttpError> {
    info!(admin_id = %admin.id, event_id = %event_id, "Handling reject_event request");

    let response: EventResponse = with_store(&app_state, move |persistence, _| {
        reject_event(persistence, &admin, &event_id)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for GET `/events/{event_id}` endpoint. Public.
async fn handle_get_event(
    AxumState(app_state): AxumState<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<EventResponse>, HttpError> {
    let response: EventResponse = with_store(&app_state, move |persistence, _| {
        get_event(persistence, &event_id)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for POST /bookings endpoint.
async fn handle_book_event(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(caller): SessionUser,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingResponse>), HttpError> {
    let request: BookingRequest = json_body(payload)?;
    info!(user_id = %caller.id, event_id = request.event_id, "Handling book_event request");

    let response: BookingResponse = with_store(&app_state, move |persistence, _| {
        book_event(persistence, &caller, &request)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Handler for GET /bookings/mine endpoint.
async fn handle_list_my_bookings(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(caller): SessionUser,
) -> Result<Json<Vec<BookingResponse>>, HttpError> {
    let response: Vec<BookingResponse> = with_store(&app_state, move |persistence, _| {
        list_my_bookings(persistence, &caller)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for GET /me endpoint.
async fn handle_whoami(
    SessionUser(caller): SessionUser,
) -> Result<Json<WhoAmIResponse>, HttpError> {
    Ok(Json(whoami(&caller)?))
}

/// Handler for PUT /users/me endpoint.
async fn handle_update_profile(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(caller): SessionUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, HttpError> {
    let request: UpdateProfileRequest = json_body(payload)?;
    info!(user_id = %caller.id, "Handling update_profile request");

    let changes: ProfileChanges = {
        let caller: User = caller.clone();
        with_credentials(&app_state, move |auth| {
            prepare_profile_update(auth, &caller, &request)
        })
        .await?
    };
    let response: UserResponse = with_store(&app_state, move |persistence, _| {
        apply_profile_update(persistence, &caller, &changes)
    })
    .await?;
    Ok(Json(response))
}

/// Handler for GET `/users/{user_id}` endpoint.
async fn handle_get_user_details(
    AxumState(app_state): AxumState<AppState>,
    SessionUser(caller): SessionUser,
    Path(user_id): Path<String>,
) -> Result<Json<UserDetailsResponse>, HttpError> {
    let response: UserDetailsResponse = with_store(&app_state, move |persistence, _| {
        get_user_details(persistence, &caller, &user_id)
    })
    .await?;
    Ok(Json(response))
}

/// Builds the CORS layer for the configured origins.
///
/// A single `*` entry allows any origin.
fn build_cors_layer(origins: &[String]) -> Result<CorsLayer, InvalidHeaderValue> {
    let origins: Vec<&str> = origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .collect();

    let allow_origin: AllowOrigin = if origins == ["*"] {
        AllowOrigin::any()
    } else {
        let values: Vec<HeaderValue> = origins
            .into_iter()
            .map(HeaderValue::from_str)
            .collect::<Result<_, _>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/auth/register", post(handle_register))
        .route("/auth/login", post(handle_login))
        .route("/admin/register", post(handle_register_admin))
        .route("/admin/organizers", get(handle_list_organizers))
        .route(
            "/admin/organizers/{user_id}",
            put(handle_set_organizer_status),
        )
        .route("/events", post(handle_submit_event).get(handle_list_events))
        .route("/events/mine", get(handle_list_my_events))
        .route("/events/{event_id}", get(handle_get_event))
        .route("/events/{event_id}/approve", put(handle_approve_event))
        .route("/events/{event_id}/reject", put(handle_reject_event))
        .route("/bookings", post(handle_book_event))
        .route("/bookings/mine", get(handle_list_my_bookings))
        .route("/me", get(handle_whoami))
        .route("/users/me", put(handle_update_profile))
        .route("/users/{user_id}", get(handle_get_user_details))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Event Booking Server");

    let credentials: CredentialStore = CredentialStore::new(args.bcrypt_cost)?;
    let tokens: TokenService = TokenService::new(
        &args.jwt_secret,
        args.jwt_algorithm,
        time::Duration::minutes(args.token_ttl_minutes),
    )?;
    if args.admin_setup_token.is_none() {
        info!("No admin setup token configured; first-admin bootstrap is disabled");
    }
    let auth: AuthConfig = AuthConfig::new(credentials, tokens, args.admin_setup_token);
    let cors: CorsLayer = build_cors_layer(&args.cors_origins)?;

    info!(database = %args.database, "Opening database");
    let persistence: Persistence = Persistence::open(&args.database)?;

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        auth: Arc::new(auth),
    };

    let app: Router = build_router(app_state, cors);

    info!(
        addr = %args.bind,
        algorithm = %args.jwt_algorithm,
        token_ttl_minutes = args.token_ttl_minutes,
        "Server listening"
    );

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
