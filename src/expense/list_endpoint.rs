//! Defines the endpoint for listing expenses within a period.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    charts::aggregation::total_amount,
    expense::core::{Expense, get_expenses_in_range},
    period::{DateRange, Period, resolve_range},
    timezone::local_offset,
};

/// The state needed to list expenses.
#[derive(Debug, Clone)]
pub struct ListExpensesState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ListExpensesState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for the expense listing.
#[derive(Debug, Deserialize)]
pub struct ExpenseListParams {
    /// The period to list expenses for. Defaults to the daily view.
    #[serde(default)]
    pub period: Period,
    /// The reference date the period is resolved around, as an RFC 3339
    /// timestamp. Defaults to the current time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
}

/// The expense listing response payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExpenseListData {
    expenses: Vec<Expense>,
    total: f64,
    period: Period,
    date_range: DateRange,
}

/// A route handler for listing the expenses within a period, most recent
/// first, together with the period total and the resolved date range.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn list_expenses_endpoint(
    State(state): State<ListExpensesState>,
    Query(params): Query<ExpenseListParams>,
) -> Result<impl IntoResponse, Error> {
    let offset = local_offset(&state.local_timezone)?;
    let reference = params
        .date
        .unwrap_or_else(OffsetDateTime::now_utc)
        .to_offset(offset);
    let range = resolve_range(reference, params.period);

    let connection = state.db_connection.lock().unwrap();
    let expenses = get_expenses_in_range(&range, &connection)?;

    let total = total_amount(&expenses);

    Ok(Json(ExpenseListData {
        expenses,
        total,
        period: params.period,
        date_range: range,
    }))
}
