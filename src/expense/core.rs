//! Defines the core data model and database queries for expenses.

use rusqlite::{Connection, Row};
use serde::Serialize;
use time::{OffsetDateTime, UtcOffset};

use crate::{Error, database_id::ExpenseId, period::DateRange};

/// The maximum number of characters allowed in an expense description.
const MAX_DESCRIPTION_LENGTH: usize = 200;

/// The maximum number of characters allowed in an expense category.
const MAX_CATEGORY_LENGTH: usize = 50;

// ============================================================================
// MODELS
// ============================================================================

/// A single recorded expense.
///
/// To create a new expense, validate the fields with [ExpenseDraft::new] and
/// insert the draft with [create_expense].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// A text description of what the money was spent on.
    pub description: String,
    /// The amount of money spent, in currency units.
    pub amount: f64,
    /// The free-form category the expense belongs to, e.g. "Alimentación".
    pub category: String,
    /// When the expense happened.
    #[serde(with = "time::serde::rfc3339")]
    pub date: OffsetDateTime,
    /// When the expense was first recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the expense was last modified.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The validated fields of an expense, ready to be written to the database.
///
/// Constructing a draft through [ExpenseDraft::new] is the only way to get
/// one, so every draft holds a trimmed, non-empty description and category
/// within their length limits, and a non-negative amount.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    description: String,
    amount: f64,
    category: String,
    date: OffsetDateTime,
}

impl ExpenseDraft {
    /// Validate raw expense fields into a draft.
    ///
    /// Leading and trailing whitespace is trimmed from the description and
    /// category before validation.
    ///
    /// # Errors
    /// Returns an error if the description or category is empty after
    /// trimming or exceeds its length limit, or if the amount is negative.
    pub fn new(
        description: &str,
        amount: f64,
        category: &str,
        date: OffsetDateTime,
    ) -> Result<Self, Error> {
        let description = description.trim();

        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(Error::DescriptionTooLong);
        }

        let category = category.trim();

        if category.is_empty() {
            return Err(Error::EmptyCategory);
        }

        if category.chars().count() > MAX_CATEGORY_LENGTH {
            return Err(Error::CategoryTooLong);
        }

        if amount < 0.0 {
            return Err(Error::NegativeAmount(amount));
        }

        Ok(Self {
            description: description.to_owned(),
            amount,
            category: category.to_owned(),
            date,
        })
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

// Dates are stored in UTC so that the string comparisons SQLite performs on
// them order chronologically.

/// Create a new expense in the database from a validated draft.
///
/// The `created_at` and `updated_at` timestamps are set to the current time.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn create_expense(draft: ExpenseDraft, connection: &Connection) -> Result<Expense, Error> {
    let now = OffsetDateTime::now_utc();

    let expense = connection
        .prepare(
            "INSERT INTO expense (description, amount, category, date, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, description, amount, category, date, created_at, updated_at",
        )?
        .query_row(
            (
                &draft.description,
                draft.amount,
                &draft.category,
                draft.date.to_offset(UtcOffset::UTC),
                now,
                now,
            ),
            map_expense_row,
        )?;

    Ok(expense)
}

/// Retrieve an expense from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn get_expense(id: ExpenseId, connection: &Connection) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "SELECT id, description, amount, category, date, created_at, updated_at
             FROM expense WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_expense_row)?;

    Ok(expense)
}

/// Retrieve the expenses whose date falls within `range`, most recent first.
///
/// Both ends of the range are inclusive. Expenses on the same instant are
/// returned in insertion order to keep the listing stable across updates.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub fn get_expenses_in_range(
    range: &DateRange,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, description, amount, category, date, created_at, updated_at
             FROM expense
             WHERE date BETWEEN ?1 AND ?2
             ORDER BY date DESC, id ASC",
        )?
        .query_map(
            (
                range.start.to_offset(UtcOffset::UTC),
                range.end.to_offset(UtcOffset::UTC),
            ),
            map_expense_row,
        )?
        .map(|expense_result| expense_result.map_err(Error::SqlError))
        .collect()
}

/// Overwrite the fields of the expense `id` with a validated draft.
///
/// The `updated_at` timestamp is refreshed; `created_at` is left untouched.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid expense,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(
    id: ExpenseId,
    draft: ExpenseDraft,
    connection: &Connection,
) -> Result<Expense, Error> {
    let expense = connection
        .prepare(
            "UPDATE expense
             SET description = ?1, amount = ?2, category = ?3, date = ?4, updated_at = ?5
             WHERE id = ?6
             RETURNING id, description, amount, category, date, created_at, updated_at",
        )?
        .query_row(
            (
                &draft.description,
                draft.amount,
                &draft.category,
                draft.date.to_offset(UtcOffset::UTC),
                OffsetDateTime::now_utc(),
                id,
            ),
            map_expense_row,
        )?;

    Ok(expense)
}

/// The number of rows changed by a statement.
pub(crate) type RowsAffected = usize;

/// Delete the expense `id` from the database.
///
/// Returns the number of rows deleted, which is zero when `id` does not refer
/// to an existing expense.
///
/// # Errors
/// This function will return an [Error::SqlError] if there is an SQL error.
pub(crate) fn delete_expense(
    id: ExpenseId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM expense WHERE id = :id", &[(":id", &id)])
        .map_err(|error| error.into())
}

/// Create the expense table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_expense_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS expense (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT NOT NULL,
                amount REAL NOT NULL,
                category TEXT NOT NULL,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('expense', 0)",
        (),
    )?;

    // Indexes used by the period listing and chart queries.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_date ON expense(date);",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_category ON expense(category);",
        (),
    )?;
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_expense_date_category ON expense(date, category);",
        (),
    )?;

    Ok(())
}

/// Map a database row to an [Expense].
pub fn map_expense_row(row: &Row) -> Result<Expense, rusqlite::Error> {
    Ok(Expense {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        date: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
