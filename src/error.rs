//! 统一的 API 错误类型与转换。

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt;

use crate::auth::AuthError;
use crate::http::failure;
use crate::upload::RejectReason;

#[derive(Debug, PartialEq, Eq)]
pub enum ApiError {
    Auth(AuthError),
    Rejected(RejectReason),
    MalformedPush(String),
}

impl ApiError {
    /// 响应体中 `msg` 字段的文本。
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::Auth(AuthError::Malformed) => "invalid",
            ApiError::Auth(AuthError::Rejected) => "unauthorised",
            ApiError::Rejected(RejectReason::ApplyTimeInvalid) => "apply invalid",
            ApiError::Rejected(RejectReason::TargetInvalid) => "id invalid",
            ApiError::Rejected(RejectReason::FilenameInvalid) => "filename invalid",
            ApiError::Rejected(RejectReason::PayloadInvalid) => "data invalid",
            ApiError::MalformedPush(_) => "invalid",
        }
    }

    fn intended_status(&self) -> StatusCode {
        match self {
            ApiError::Auth(AuthError::Rejected) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::MalformedPush(detail) => write!(f, "malformed push request: {detail}"),
            other => f.write_str(other.message()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        failure(self.message(), self.intended_status())
    }
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        ApiError::Auth(error)
    }
}

impl From<RejectReason> for ApiError {
    fn from(reason: RejectReason) -> Self {
        ApiError::Rejected(reason)
    }
}

impl From<axum::extract::multipart::MultipartError> for ApiError {
    fn from(error: axum::extract::multipart::MultipartError) -> Self {
        ApiError::MalformedPush(error.body_text())
    }
}

impl From<axum::extract::multipart::MultipartRejection> for ApiError {
    fn from(rejection: axum::extract::multipart::MultipartRejection) -> Self {
        ApiError::MalformedPush(rejection.body_text())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::MalformedPush(error.to_string())
    }
}
