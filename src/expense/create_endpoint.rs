//! Defines the endpoint for recording a new expense.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State},
    http::StatusCode,
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::Deserialize;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    expense::core::{ExpenseDraft, create_expense},
};

/// The state needed to create an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The request body for creating or updating an expense.
///
/// Every field is optional at the parsing stage so that missing fields can be
/// reported as a validation error rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct ExpensePayload {
    /// Text detailing the expense.
    pub description: Option<String>,
    /// The amount of money spent.
    pub amount: Option<f64>,
    /// The category the expense belongs to.
    pub category: Option<String>,
    /// When the expense happened, as an RFC 3339 timestamp.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

/// A route handler for recording a new expense.
///
/// The date defaults to the current time when omitted. Responds with the
/// created expense and status 201 on success.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn create_expense_endpoint(
    State(state): State<CreateExpenseState>,
    Json(payload): Json<ExpensePayload>,
) -> Result<impl IntoResponse, Error> {
    let (Some(description), Some(amount), Some(category)) =
        (payload.description, payload.amount, payload.category)
    else {
        return Err(Error::MissingExpenseFields);
    };

    let date = payload.date.unwrap_or_else(OffsetDateTime::now_utc);
    let draft = ExpenseDraft::new(&description, amount, &category, date)?;

    let connection = state.db_connection.lock().unwrap();
    let expense = create_expense(draft, &connection)?;

    Ok((StatusCode::CREATED, Json(expense)))
}
