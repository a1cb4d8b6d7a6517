use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use async_graphql::ErrorExtensions;
use serde::Serialize;
use std::fmt;
use tracing::error;

use crate::store::{StoreError, UniqueKey};

/// Every failure a resolver can surface. Anything that is not one of the
/// named kinds ends up as `InternalError`, whose detail is logged but never
/// sent to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    Authentication,
    AccountNotFound,
    InvalidEmail,
    EmailInUse,
    WeakPassword,
    InvalidCredentials,
    InvalidName,
    InvalidTitle,
    DuplicateTitle,
    InvalidDate,
    ExpenseNotFound,
    InternalError(String),
}

impl AppError {
    /// Machine-readable code placed in `extensions.code`
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Authentication => "AUTHENTICATION_ERROR",
            AppError::AccountNotFound => "ACCOUNT_NOT_FOUND",
            AppError::InvalidEmail => "INVALID_EMAIL",
            AppError::EmailInUse => "EMAIL_IN_USE",
            AppError::WeakPassword => "INVALID_PASSWORD",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::InvalidName => "INVALID_NAME",
            AppError::InvalidTitle => "INVALID_TITLE",
            AppError::DuplicateTitle => "DUPLICATE_TITLE",
            AppError::InvalidDate => "INVALID_DATE",
            AppError::ExpenseNotFound => "EXPENSE_NOT_FOUND",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Human-readable message that is safe to return to the client
    pub fn message(&self) -> &'static str {
        match self {
            AppError::Authentication => "You need to login first!",
            AppError::AccountNotFound => "Account not found.",
            AppError::InvalidEmail => "Please provide a valid email.",
            AppError::EmailInUse => "The email provided is already in use.",
            AppError::WeakPassword => "Please provide a password with at least 8 characters.",
            AppError::InvalidCredentials => "Invalid credentials provided.",
            AppError::InvalidName => "Please provide a name.",
            AppError::InvalidTitle => "Please provide a expense title with at least 2 characters.",
            AppError::DuplicateTitle => "You already have an expense with the same title.",
            AppError::InvalidDate => "Please provide a valid date.",
            AppError::ExpenseNotFound => "Expense not found.",
            AppError::InternalError(_) => "Something went wrong, please try again later",
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        AppError::InternalError(detail.into())
    }
}

// Display never includes the internal detail, so an accidental `?` into
// `async_graphql::Error` still cannot leak it.
impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for AppError {}

/// Error body for failures raised outside of GraphQL execution
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Error type code (e.g., "AUTHENTICATION_ERROR")
    pub error: String,
    /// Human-readable error message
    pub message: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::AccountNotFound | AppError::ExpenseNotFound => StatusCode::NOT_FOUND,
            AppError::EmailInUse | AppError::DuplicateTitle => StatusCode::CONFLICT,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::InternalError(detail) = self {
            error!("Internal error: {detail}");
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.code().to_string(),
            message: self.message().to_string(),
        })
    }
}

impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        if let AppError::InternalError(detail) = self {
            // Log the actual error for debugging, but don't expose to client
            error!("Internal error: {detail}");
        }

        let code = self.code();
        async_graphql::Error::new(self.message()).extend_with(|_, e| e.set("code", code))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(UniqueKey::UserEmail) => AppError::EmailInUse,
            StoreError::UniqueViolation(UniqueKey::ExpenseTitle) => AppError::DuplicateTitle,
            StoreError::NotFound => AppError::internal("record vanished between check and write"),
            StoreError::Backend(msg) => AppError::InternalError(msg),
        }
    }
}
