//! Defines the endpoint that serves aggregated chart data.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::IntoResponse,
};
use rusqlite::Connection;
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    charts::aggregation::{
        CategoryDatum, TimelinePoint, category_breakdown, timeline_breakdown, total_amount,
    },
    expense::get_expenses_in_range,
    period::{DateRange, Period, resolve_range},
    timezone::local_offset,
};

/// The state needed to serve chart data.
#[derive(Debug, Clone)]
pub struct ChartDataState {
    /// The database connection for managing expenses.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for ChartDataState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Which of the chart breakdowns a request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartSelection {
    /// Only the category breakdown.
    Category,
    /// Only the timeline breakdown.
    Timeline,
    /// Both breakdowns.
    #[default]
    All,
    /// An unrecognized selector: neither breakdown is computed, only the
    /// total. Kept for compatibility with the original API.
    Unrecognized,
}

impl ChartSelection {
    fn includes_category(self) -> bool {
        matches!(self, Self::Category | Self::All)
    }

    fn includes_timeline(self) -> bool {
        matches!(self, Self::Timeline | Self::All)
    }
}

impl<'de> Deserialize<'de> for ChartSelection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;

        Ok(match raw.as_str() {
            "category" => Self::Category,
            "timeline" => Self::Timeline,
            "all" => Self::All,
            _ => Self::Unrecognized,
        })
    }
}

/// The query parameters for the chart data endpoint.
#[derive(Debug, Deserialize)]
pub struct ChartDataParams {
    /// The period to aggregate expenses over. Defaults to the daily view.
    #[serde(default)]
    pub period: Period,
    /// The reference date the period is resolved around, as an RFC 3339
    /// timestamp. Defaults to the current time.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date: Option<OffsetDateTime>,
    /// Which breakdowns to compute. Defaults to all of them.
    #[serde(default, rename = "type")]
    pub chart: ChartSelection,
}

/// The chart data response payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartData {
    total: f64,
    period: Period,
    date_range: DateRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    category_data: Option<Vec<CategoryDatum>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeline_data: Option<Vec<TimelinePoint>>,
}

/// A route handler for the aggregated chart data of a period.
///
/// Resolves the period's date range around the reference date, sums the
/// matching expenses, and computes the requested breakdowns. Timeline buckets
/// follow the configured local timezone.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the same thread.
pub async fn chart_data_endpoint(
    State(state): State<ChartDataState>,
    Query(params): Query<ChartDataParams>,
) -> Result<impl IntoResponse, Error> {
    let offset = local_offset(&state.local_timezone)?;
    let reference = params
        .date
        .unwrap_or_else(OffsetDateTime::now_utc)
        .to_offset(offset);
    let range = resolve_range(reference, params.period);

    let connection = state.db_connection.lock().unwrap();
    let mut expenses = get_expenses_in_range(&range, &connection)?;

    // Shift the stored instants into the local timezone so that the hour and
    // day buckets follow the local calendar.
    for expense in &mut expenses {
        expense.date = expense.date.to_offset(offset);
    }

    let total = total_amount(&expenses);
    let category_data = params
        .chart
        .includes_category()
        .then(|| category_breakdown(&expenses));
    let timeline_data = params
        .chart
        .includes_timeline()
        .then(|| timeline_breakdown(&expenses, params.period));

    Ok(Json(ChartData {
        total,
        period: params.period,
        date_range: range,
        category_data,
        timeline_data,
    }))
}
