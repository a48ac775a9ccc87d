//! Expense management for the tracking application.
//!
//! This module contains everything related to expense records:
//! - The `Expense` model and `ExpenseDraft` for validating fields
//! - Database functions for storing, querying, and managing expenses
//! - Route handlers for the expense CRUD and listing endpoints

mod core;
mod create_endpoint;
mod delete_endpoint;
mod get_endpoint;
mod list_endpoint;
mod update_endpoint;

pub use core::{
    Expense, ExpenseDraft, create_expense, create_expense_table, get_expenses_in_range,
};
pub use create_endpoint::create_expense_endpoint;
pub use delete_endpoint::delete_expense_endpoint;
pub use get_endpoint::get_expense_endpoint;
pub use list_endpoint::list_expenses_endpoint;
pub use update_endpoint::update_expense_endpoint;
