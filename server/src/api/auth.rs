//! Student account endpoints.
//!
//! - POST /api/auth/register - Register a student
//! - POST /api/auth/login - Phone + password login
//! - POST /api/auth/forget-password - Email a password-reset OTP
//! - POST /api/auth/reset-password - Redeem an OTP for a new password
//! - POST /api/auth/student-details - Look a student up in the ERP
//! - PATCH /api/auth/profile/email - Change the caller's email

use crate::state::{AppState, Backend};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Deserialize;
use studentdesk_auth::constants::{
    EMAIL_UPDATED_MESSAGE, LOGIN_MESSAGE, OTP_SENT_MESSAGE, PASSWORD_RESET_MESSAGE,
    REGISTERED_MESSAGE, STUDENT_DETAILS_MESSAGE,
};
use studentdesk_auth::{AuthError, LoginOutcome, Registration, StudentRecord, UserProfile};
use studentdesk_core::ErrorCategory;
use studentdesk_web::{ApiResponse, AppError, MaybeBearerToken, WebResult};

// ============================================================================
// Request Types
// ============================================================================

/// Login request. `email` is accepted for older clients and ignored.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Registered phone number
    #[serde(default)]
    pub phone_number: String,
    /// Password
    #[serde(default)]
    pub password: String,
}

/// Forgot-password request.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    /// Registered email or phone number
    #[serde(rename = "emailOrPhone", default)]
    pub email_or_phone: String,
}

/// Reset-password request.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    /// OTP from the reset email
    #[serde(default)]
    pub otp: String,
    /// Replacement password
    #[serde(rename = "newPassword", default)]
    pub new_password: String,
}

/// ERP lookup request.
#[derive(Debug, Deserialize)]
pub struct StudentDetailsRequest {
    /// Phone number to look up
    #[serde(default)]
    pub mobile_number: String,
}

/// Email change request.
#[derive(Debug, Deserialize)]
pub struct UpdateEmailRequest {
    /// New address
    #[serde(default)]
    pub email: String,
}

/// Message for a required field that was absent or blank.
const MISSING_FIELDS: &str = "Missing required fields";

/// Internal failures keep their 500; everything else reports as `status`.
fn collapse(error: AuthError, status: StatusCode) -> AppError {
    if is_internal(&error) {
        AppError::from(error)
    } else {
        AppError::from(error).with_status(status)
    }
}

fn is_internal(error: &AuthError) -> bool {
    matches!(error.category(), ErrorCategory::Internal | ErrorCategory::Config)
}

// ============================================================================
// Handlers
// ============================================================================

/// Register a student.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8850/api/auth/register \
///   -H "Content-Type: application/json" \
///   -d '{"name": "Asha", "phone_number": "9876543210", "password": "p1"}'
/// ```
///
/// # Errors
///
/// - 400: missing fields, malformed phone/email, or already registered
/// - 404: phone unknown to the ERP (verification enabled)
/// - 503: ERP unavailable
pub async fn register<B: Backend>(
    State(state): State<AppState<B>>,
    body: Result<Json<Registration>, JsonRejection>,
) -> WebResult<ApiResponse<UserProfile>> {
    let Json(registration) = body?;
    let profile = state.credentials.register(registration).await?;
    Ok(ApiResponse::created(REGISTERED_MESSAGE, profile))
}

/// Log in with phone number and password.
///
/// Every failure other than an internal one is reported as 401
/// "Login failed"; the cause is only logged.
///
/// # Errors
///
/// - 400: missing fields
/// - 401: any credential or verification failure
/// - 500: internal failure
pub async fn login<B: Backend>(
    State(state): State<AppState<B>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> WebResult<ApiResponse<LoginOutcome>> {
    let Json(request) = body?;
    if request.phone_number.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::bad_request(MISSING_FIELDS));
    }

    let outcome = state
        .credentials
        .login(&request.phone_number, &request.password)
        .await
        .map_err(|e| {
            if is_internal(&e) {
                AppError::from(e)
            } else {
                AppError::from(e)
                    .with_status(StatusCode::UNAUTHORIZED)
                    .with_message("Login failed")
            }
        })?;

    Ok(ApiResponse::ok(LOGIN_MESSAGE, outcome))
}

/// Email a password-reset OTP to the account matching an email or phone.
///
/// # Errors
///
/// - 400: unknown account, missing identifier, or delivery failure
/// - 500: internal failure
pub async fn forgot_password<B: Backend>(
    State(state): State<AppState<B>>,
    body: Result<Json<ForgotPasswordRequest>, JsonRejection>,
) -> WebResult<ApiResponse> {
    let Json(request) = body?;
    state
        .credentials
        .forgot_password(&request.email_or_phone)
        .await
        .map_err(|e| collapse(e, StatusCode::BAD_REQUEST))?;

    Ok(ApiResponse::message(StatusCode::OK, OTP_SENT_MESSAGE))
}

/// Replace the password of the account holding an unexpired OTP.
///
/// # Errors
///
/// - 400: invalid or expired OTP, or missing fields
/// - 500: internal failure
pub async fn reset_password<B: Backend>(
    State(state): State<AppState<B>>,
    body: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> WebResult<ApiResponse> {
    let Json(request) = body?;
    state
        .credentials
        .reset_password(&request.otp, &request.new_password)
        .await
        .map_err(|e| collapse(e, StatusCode::BAD_REQUEST))?;

    Ok(ApiResponse::message(StatusCode::OK, PASSWORD_RESET_MESSAGE))
}

/// Fetch the ERP record for a phone number.
///
/// # Errors
///
/// - 400: missing or malformed number
/// - 404: unknown to the ERP
/// - 503: ERP unavailable
pub async fn student_details<B: Backend>(
    State(state): State<AppState<B>>,
    body: Result<Json<StudentDetailsRequest>, JsonRejection>,
) -> WebResult<ApiResponse<StudentRecord>> {
    let Json(request) = body?;
    if request.mobile_number.trim().is_empty() {
        return Err(AppError::bad_request("Missing mobile number"));
    }

    let record = state.credentials.student_details(&request.mobile_number).await?;
    Ok(ApiResponse::ok(STUDENT_DETAILS_MESSAGE, record))
}

/// Change the authenticated student's email.
///
/// # Errors
///
/// - 400: malformed address
/// - 401: missing or invalid bearer token
/// - 404: account no longer exists
pub async fn update_email<B: Backend>(
    State(state): State<AppState<B>>,
    MaybeBearerToken(token): MaybeBearerToken,
    body: Result<Json<UpdateEmailRequest>, JsonRejection>,
) -> WebResult<ApiResponse<UserProfile>> {
    let token = token.ok_or_else(|| AppError::unauthorized("Authentication required"))?;
    let user_id = state.credentials.authenticate(&token)?;

    let Json(request) = body?;
    let profile = state.credentials.update_email(user_id, &request.email).await?;
    Ok(ApiResponse::ok(EMAIL_UPDATED_MESSAGE, profile))
}
