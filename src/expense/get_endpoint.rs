//! Defines the endpoint for fetching a single expense by ID.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{AppState, Error, database_id::ExpenseId, expense::core::get_expense};

/// The state needed to fetch an expense.
#[derive(Debug, Clone)]
pub struct GetExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GetExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for fetching an expense by its ID.
///
/// Responds with status 404 when the ID does not refer to an expense.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn get_expense_endpoint(
    State(state): State<GetExpenseState>,
    Path(expense_id): Path<ExpenseId>,
) -> Result<impl IntoResponse, Error> {
    let connection = state.db_connection.lock().unwrap();

    let expense = get_expense(expense_id, &connection)?;

    Ok(Json(expense))
}
