use crate::backend::Storage;
use crate::error::{ErrorKind, StorageError};
use crate::types::{Booking, Class};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::{http::StatusCode, Json};
use axum::{routing::get, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, warn};
use validator::{Validate, ValidationErrors};

#[derive(Clone)]
pub struct AppState<T: Storage> {
    pub storage: T,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    Storage(StorageError),
    InvalidRequest(String),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::InvalidRequest(err) => (StatusCode::BAD_REQUEST, invalid_request(err)),
            Self::Storage(err) => match err.kind() {
                ErrorKind::NotFound => (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        status: "Resource not found.".into(),
                        error: None,
                    },
                ),
                ErrorKind::InvalidState => (StatusCode::BAD_REQUEST, invalid_request(err.to_string())),
                ErrorKind::IoFailure => {
                    warn!(%err, "storage failure");
                    (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        ErrorResponse {
                            status: "Error rendering response.".into(),
                            error: Some(err.to_string()),
                        },
                    )
                }
            },
        };
        (status, Json(body)).into_response()
    }
}

fn invalid_request(err: String) -> ErrorResponse {
    ErrorResponse {
        status: "Invalid request.".into(),
        error: Some(err),
    }
}

type ApiResult<T> = Result<T, ApiError>;

pub fn create_app<T: Storage>(storage: T) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let classes = Router::new()
        .route("/classes", get(list_classes::<T>).post(create_class::<T>))
        .route(
            "/classes/:id",
            get(get_class::<T>)
                .put(update_class::<T>)
                .delete(delete_class::<T>),
        );

    let bookings = Router::new()
        .route(
            "/bookings",
            get(list_bookings::<T>).post(create_booking::<T>),
        )
        .route(
            "/bookings/:id",
            get(get_booking::<T>)
                .put(update_booking::<T>)
                .delete(delete_booking::<T>),
        );

    Router::new()
        .route("/ping", get(ping))
        .merge(classes)
        .merge(bookings)
        .with_state(AppState { storage })
        .layer(cors)
}

/// Health check for containerized deployments.
async fn ping() -> &'static str {
    "pong"
}

async fn list_classes<T: Storage>(State(state): State<AppState<T>>) -> ApiResult<Json<Vec<Class>>> {
    Ok(Json(state.storage.classes()?))
}

async fn create_class<T: Storage>(
    State(state): State<AppState<T>>,
    payload: Result<Json<Class>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Class>)> {
    let Json(class) = payload?;
    class.validate()?;

    let id = state.storage.add_class(class.clone())?;
    debug!(%id, "class created");
    Ok((StatusCode::CREATED, Json(Class { id, ..class })))
}

async fn get_class<T: Storage>(
    State(state): State<AppState<T>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Class>> {
    Ok(Json(state.storage.class(&id)?))
}

async fn update_class<T: Storage>(
    State(state): State<AppState<T>>,
    Path(id): Path<String>,
    payload: Result<Json<Class>, JsonRejection>,
) -> ApiResult<Json<Class>> {
    let Json(class) = payload?;
    class.validate()?;

    state.storage.update_class(&id, class.clone())?;
    Ok(Json(Class { id, ..class }))
}

async fn delete_class<T: Storage>(
    State(state): State<AppState<T>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Class>> {
    let class = state.storage.class(&id)?;
    state.storage.delete_class(&id)?;
    Ok(Json(class))
}

async fn list_bookings<T: Storage>(
    State(state): State<AppState<T>>,
) -> ApiResult<Json<Vec<Booking>>> {
    Ok(Json(state.storage.bookings()?))
}

async fn create_booking<T: Storage>(
    State(state): State<AppState<T>>,
    payload: Result<Json<Booking>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Booking>)> {
    let Json(booking) = payload?;
    booking.validate()?;

    let id = state.storage.add_booking(booking.clone())?;
    debug!(id, "booking created");
    Ok((StatusCode::CREATED, Json(Booking { id, ..booking })))
}

async fn get_booking<T: Storage>(
    State(state): State<AppState<T>>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Booking>> {
    let Path(id) = id?;
    Ok(Json(state.storage.booking(id)?))
}

async fn update_booking<T: Storage>(
    State(state): State<AppState<T>>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<Booking>, JsonRejection>,
) -> ApiResult<Json<Booking>> {
    let Path(id) = id?;
    let Json(booking) = payload?;
    booking.validate()?;

    state.storage.update_booking(id, booking.clone())?;
    Ok(Json(Booking { id, ..booking }))
}

async fn delete_booking<T: Storage>(
    State(state): State<AppState<T>>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<Booking>> {
    let Path(id) = id?;
    let booking = state.storage.booking(id)?;
    state.storage.delete_booking(id)?;
    Ok(Json(booking))
}
