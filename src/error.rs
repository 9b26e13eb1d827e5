//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the
//! application. It centralizes error management, providing a consistent way to
//! represent the failure conditions the API can produce, from database issues
//! to authentication failures.
//!
//! `AppError` implements `actix_web::error::ResponseError` to convert
//! application errors into HTTP responses with JSON bodies of the form
//! `{"msg": "..."}`. It also provides `From` implementations for common error
//! types like `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, and `bcrypt::BcryptError`, allowing for easy
//! conversion using the `?` operator.

use actix_web::{error::ResponseError, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Represents all possible errors that can occur within the application.
///
/// Each variant corresponds to a class of failure in the API's error
/// taxonomy and maps to a fixed HTTP status code.
#[derive(Debug)]
pub enum AppError {
    /// Missing, malformed, invalid, or expired bearer token (HTTP 401).
    Unauthorized(String),
    /// Malformed or invalid request input (HTTP 400).
    BadRequest(String),
    /// Login failure (HTTP 400). The message is identical for an unknown
    /// email and a wrong password so the cause cannot be distinguished.
    InvalidCredentials,
    /// Registration with an email that already has an account (HTTP 409).
    Conflict(String),
    /// Requested resource is absent, or owned by a different user; the two
    /// cases are indistinguishable (HTTP 404).
    NotFound(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// Failure originating from the database layer (HTTP 500).
    /// The detail is logged but never sent to the client.
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::InvalidCredentials => write!(f, "Invalid email or password"),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
///
/// This implementation allows Actix Web to automatically translate `AppError`
/// results from handlers into the correct HTTP status codes and JSON bodies.
impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::Unauthorized(msg) => HttpResponse::Unauthorized().json(json!({
                "msg": msg
            })),
            AppError::BadRequest(msg) => HttpResponse::BadRequest().json(json!({
                "msg": msg
            })),
            AppError::InvalidCredentials => HttpResponse::BadRequest().json(json!({
                "msg": "Invalid email or password"
            })),
            AppError::Conflict(msg) => HttpResponse::Conflict().json(json!({
                "msg": msg
            })),
            AppError::NotFound(msg) => HttpResponse::NotFound().json(json!({
                "msg": msg
            })),
            AppError::InternalServerError(msg) => HttpResponse::InternalServerError().json(json!({
                "msg": msg
            })),
            // Database failures surface as a generic server error; the detail
            // stays in the server log.
            AppError::DatabaseError(msg) => {
                log::error!("database error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "msg": "Server error"
                }))
            }
        }
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `sqlx::Error::RowNotFound` maps to `AppError::NotFound`; every other
/// database error becomes `AppError::DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

/// Converts `validator::ValidationErrors` into `AppError::BadRequest`.
///
/// The external interface defines 400 for every invalid-input case, so
/// validation failures do not get a status of their own.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::BadRequest(error.to_string())
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(error.to_string())
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
///
/// This handles errors during password hashing or verification.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        let error = AppError::Unauthorized("Invalid token".into());
        let response = error.error_response();
        assert_eq!(response.status(), 401);

        let error = AppError::BadRequest("Missing required fields".into());
        let response = error.error_response();
        assert_eq!(response.status(), 400);

        let error = AppError::InvalidCredentials;
        let response = error.error_response();
        assert_eq!(response.status(), 400);

        let error = AppError::Conflict("User already exists".into());
        let response = error.error_response();
        assert_eq!(response.status(), 409);

        let error = AppError::NotFound("Task not found".into());
        let response = error.error_response();
        assert_eq!(response.status(), 404);

        let error = AppError::InternalServerError("Server error".into());
        let response = error.error_response();
        assert_eq!(response.status(), 500);
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let error: AppError = sqlx::Error::RowNotFound.into();
        let response = error.error_response();
        assert_eq!(response.status(), 404);
    }
}
