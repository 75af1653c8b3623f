//! The `{message, status, data}` envelope every response is wrapped in.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Symbolic status class carried in the envelope.
///
/// Derived from the numeric HTTP status; codes without a class of their own
/// map to [`ResponseStatus::ServerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    /// 200
    Success,
    /// 201
    Created,
    /// 400
    BadRequest,
    /// 401
    Unauthorized,
    /// 403
    Forbidden,
    /// 404
    NotFound,
    /// 500 and anything unrecognized
    ServerError,
}

impl ResponseStatus {
    /// Class for a numeric status code.
    ///
    /// # Examples
    ///
    /// ```
    /// use studentdesk_web::ResponseStatus;
    ///
    /// assert_eq!(ResponseStatus::from_code(404), ResponseStatus::NotFound);
    /// assert_eq!(ResponseStatus::from_code(503), ResponseStatus::ServerError);
    /// ```
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            200 => Self::Success,
            201 => Self::Created,
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            _ => Self::ServerError,
        }
    }
}

/// Response body. `data` is omitted when absent.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    /// Human-readable outcome.
    pub message: String,
    /// Class derived from the HTTP status.
    pub status: ResponseStatus,
    /// Payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Build an envelope for `code`.
    #[must_use]
    pub fn new(code: StatusCode, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            message: message.into(),
            status: ResponseStatus::from_code(code.as_u16()),
            data,
        }
    }
}

/// A successful handler result: HTTP status plus envelope.
///
/// # Example
///
/// ```ignore
/// async fn handler() -> WebResult<ApiResponse<UserProfile>> {
///     let profile = service.register(request).await?;
///     Ok(ApiResponse::created("Student registered successfully", profile))
/// }
/// ```
#[derive(Debug)]
pub struct ApiResponse<T = ()> {
    code: StatusCode,
    envelope: Envelope<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with a payload.
    #[must_use]
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::with_data(StatusCode::OK, message, data)
    }

    /// 201 with a payload.
    #[must_use]
    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self::with_data(StatusCode::CREATED, message, data)
    }

    /// Any status with a payload.
    #[must_use]
    pub fn with_data(code: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            code,
            envelope: Envelope::new(code, message, Some(data)),
        }
    }

    /// The HTTP status.
    #[must_use]
    pub const fn code(&self) -> StatusCode {
        self.code
    }

    /// The body.
    #[must_use]
    pub const fn envelope(&self) -> &Envelope<T> {
        &self.envelope
    }
}

impl ApiResponse {
    /// A message-only envelope.
    #[must_use]
    pub fn message(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            envelope: Envelope::new(code, message, None),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.code, Json(self.envelope)).into_response()
    }
}
