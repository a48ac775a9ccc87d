//! Defines the endpoint for deleting an expense.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{AppState, Error, database_id::ExpenseId, expense::core::delete_expense};

/// The state needed to delete an expense.
#[derive(Debug, Clone)]
pub struct DeleteExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting an expense by its ID.
///
/// Responds with a confirmation message on success and status 404 when the
/// ID does not refer to an expense.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn delete_expense_endpoint(
    State(state): State<DeleteExpenseState>,
    Path(expense_id): Path<ExpenseId>,
) -> Response {
    let connection = state.db_connection.lock().unwrap();

    match delete_expense(expense_id, &connection) {
        Ok(0) => Error::NotFound.into_response(),
        Ok(_) => Json(json!({ "message": "Expense deleted" })).into_response(),
        Err(error) => {
            tracing::error!("could not delete expense {expense_id}: {error}");
            error.into_response()
        }
    }
}
