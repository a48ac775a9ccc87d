//! Application router configuration.

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use crate::{
    AppState,
    charts::chart_data_endpoint,
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_expense_endpoint,
        list_expenses_endpoint, update_expense_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::EXPENSES,
            get(list_expenses_endpoint).post(create_expense_endpoint),
        )
        .route(endpoints::EXPENSE_CHARTS, get(chart_data_endpoint))
        .route(
            endpoints::EXPENSE,
            get(get_expense_endpoint)
                .put(update_expense_endpoint)
                .delete(delete_expense_endpoint),
        )
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The JSON response for requests that match no route.
async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "the requested resource could not be found" })),
    )
        .into_response()
}

#[cfg(test)]
mod route_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{AppState, endpoints};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let state =
            AppState::new(connection, "Etc/UTC").expect("Could not create application state");

        TestServer::try_new(build_router(state)).expect("Could not create test server.")
    }

    #[tokio::test]
    async fn create_list_and_chart_round_trip() {
        let server = get_test_server();

        server
            .post(endpoints::EXPENSES)
            .json(&json!({
                "description": "Almuerzo",
                "amount": 12.5,
                "category": "Alimentación",
                "date": "2024-03-15T13:00:00Z",
            }))
            .await
            .assert_status(StatusCode::CREATED);
        server
            .post(endpoints::EXPENSES)
            .json(&json!({
                "description": "Colectivo",
                "amount": 2.5,
                "category": "Transporte",
                "date": "2024-03-15T08:10:00Z",
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let list_response = server
            .get(endpoints::EXPENSES)
            .add_query_param("period", "daily")
            .add_query_param("date", "2024-03-15T12:00:00Z")
            .await;
        list_response.assert_status_ok();
        let list: Value = list_response.json();
        assert_eq!(list["total"], 15.0);
        assert_eq!(list["expenses"].as_array().unwrap().len(), 2);

        let chart_response = server
            .get(endpoints::EXPENSE_CHARTS)
            .add_query_param("period", "daily")
            .add_query_param("date", "2024-03-15T12:00:00Z")
            .await;
        chart_response.assert_status_ok();
        let charts: Value = chart_response.json();
        assert_eq!(charts["total"], 15.0);
        assert_eq!(charts["categoryData"][0]["category"], "Alimentación");
        assert_eq!(charts["timelineData"][0]["date"], "8:00");
    }

    #[tokio::test]
    async fn unknown_period_is_treated_as_daily() {
        let server = get_test_server();

        let response = server
            .get(endpoints::EXPENSES)
            .add_query_param("period", "fortnightly")
            .add_query_param("date", "2024-03-15T12:00:00Z")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["period"], "daily");
        assert_eq!(body["dateRange"]["startDate"], "2024-03-15T00:00:00Z");
    }

    #[tokio::test]
    async fn create_with_missing_fields_is_a_bad_request() {
        let server = get_test_server();

        let response = server
            .post(endpoints::EXPENSES)
            .json(&json!({ "description": "Almuerzo" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body.get("error").is_some(), "got body: {body}");
    }

    #[tokio::test]
    async fn get_update_delete_by_id() {
        let server = get_test_server();
        server
            .post(endpoints::EXPENSES)
            .json(&json!({
                "description": "Entrada de cine",
                "amount": 8.0,
                "category": "Entretenimiento",
                "date": "2024-03-15T20:00:00Z",
            }))
            .await
            .assert_status(StatusCode::CREATED);

        let fetched: Value = server.get("/api/expenses/1").await.json();
        assert_eq!(fetched["description"], "Entrada de cine");

        let updated_response = server
            .put("/api/expenses/1")
            .json(&json!({
                "description": "Entrada de cine",
                "amount": 10.0,
                "category": "Entretenimiento",
            }))
            .await;
        updated_response.assert_status_ok();
        let updated: Value = updated_response.json();
        assert_eq!(updated["amount"], 10.0);
        // Omitting the date keeps the stored one.
        assert_eq!(updated["date"], "2024-03-15T20:00:00Z");

        server.delete("/api/expenses/1").await.assert_status_ok();
        server
            .get("/api/expenses/1")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_route_is_a_json_404() {
        let server = get_test_server();

        let response = server.get("/api/budgets").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert!(body.get("error").is_some(), "got body: {body}");
    }
}
