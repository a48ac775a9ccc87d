//! The API endpoint URIs.

/// The route to list and create expenses.
pub const EXPENSES: &str = "/api/expenses";
/// The route to access a single expense.
pub const EXPENSE: &str = "/api/expenses/{expense_id}";
/// The route to fetch aggregated chart data.
pub const EXPENSE_CHARTS: &str = "/api/expenses/charts";
