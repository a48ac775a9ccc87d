//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A create or update request is missing one of the required fields.
    ///
    /// The description, amount, and category must all be provided; only the
    /// date may be omitted.
    #[error("missing required fields: description, amount, and category must be provided")]
    MissingExpenseFields,

    /// An empty (or whitespace only) string was used for the description.
    #[error("description cannot be empty")]
    EmptyDescription,

    /// The description exceeds the maximum allowed length.
    #[error("description cannot exceed 200 characters")]
    DescriptionTooLong,

    /// An empty (or whitespace only) string was used for the category.
    #[error("category cannot be empty")]
    EmptyCategory,

    /// The category exceeds the maximum allowed length.
    #[error("category cannot exceed 50 characters")]
    CategoryTooLong,

    /// A negative amount was used for an expense.
    ///
    /// Expenses record money spent, so amounts must be zero or greater.
    #[error("amount must be zero or greater, got {0}")]
    NegativeAmount(f64),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = match self {
            Error::MissingExpenseFields
            | Error::EmptyDescription
            | Error::DescriptionTooLong
            | Error::EmptyCategory
            | Error::CategoryTooLong
            | Error::NegativeAmount(_) => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            // Storage and configuration errors are not intended to be shown
            // to the client in any detail.
            ref error => {
                tracing::error!("An unexpected error occurred: {}", error);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "an unexpected error occurred" })),
                )
                    .into_response();
            }
        };

        (status_code, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
