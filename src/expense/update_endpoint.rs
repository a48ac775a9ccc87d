//! Defines the endpoint for updating an existing expense.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::IntoResponse,
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::ExpenseId,
    expense::core::{ExpenseDraft, get_expense, update_expense},
};

use super::create_endpoint::ExpensePayload;

/// The state needed to update an expense.
#[derive(Debug, Clone)]
pub struct UpdateExpenseState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateExpenseState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for overwriting the fields of an expense.
///
/// The description, amount, and category must all be provided; omitting the
/// date keeps the stored date. Responds with the updated expense on success
/// and status 404 when the ID does not refer to an expense.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn update_expense_endpoint(
    State(state): State<UpdateExpenseState>,
    Path(expense_id): Path<ExpenseId>,
    Json(payload): Json<ExpensePayload>,
) -> Result<impl IntoResponse, Error> {
    let (Some(description), Some(amount), Some(category)) =
        (payload.description, payload.amount, payload.category)
    else {
        return Err(Error::MissingExpenseFields);
    };

    let connection = state.db_connection.lock().unwrap();

    let date = match payload.date {
        Some(date) => date,
        None => get_expense(expense_id, &connection)?.date,
    };
    let draft = ExpenseDraft::new(&description, amount, &category, date)?;

    let expense = update_expense(expense_id, draft, &connection)?;

    Ok(Json(expense))
}
