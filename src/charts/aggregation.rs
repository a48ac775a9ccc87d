//! Expense aggregation for chart data.
//!
//! Provides functions to total expenses, group them by category with
//! percentages, and bucket them along a timeline whose granularity follows
//! the selected period (hour of day, day of week, day of month, or month).
//!
//! Grouping uses insertion-ordered accumulators because the output order is
//! part of the API contract: weekly and yearly timelines list buckets in the
//! order they are first seen in the expense sequence rather than in calendar
//! order, matching the behavior clients already depend on.

use serde::Serialize;
use time::OffsetDateTime;

use crate::{expense::Expense, period::Period};

/// Abbreviated day-of-week names, indexed from Sunday.
const DAY_NAMES: [&str; 7] = ["Dom", "Lun", "Mar", "Mié", "Jue", "Vie", "Sáb"];

/// Abbreviated month names, indexed from January.
const MONTH_NAMES: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

/// A category's share of the spending within a period.
#[derive(Debug, PartialEq, Serialize)]
pub struct CategoryDatum {
    /// The category name, exactly as recorded on the expenses.
    pub category: String,
    /// The total amount spent in this category.
    pub amount: f64,
    /// This category's share of the period total, in percent.
    pub percentage: f64,
}

/// A single bucket of the timeline breakdown.
#[derive(Debug, PartialEq, Serialize)]
pub struct TimelinePoint {
    /// The bucket key, e.g. "9:00", "Lun", "15", or "Ene".
    pub date: String,
    /// The total amount spent in this bucket.
    pub amount: f64,
    /// The label to display for this bucket.
    #[serde(rename = "formattedDate")]
    pub formatted_date: String,
}

impl TimelinePoint {
    fn new(label: String, amount: f64) -> Self {
        Self {
            date: label.clone(),
            amount,
            formatted_date: label,
        }
    }
}

/// Sum the amounts of `expenses`, `0.0` for an empty slice.
pub(crate) fn total_amount(expenses: &[Expense]) -> f64 {
    expenses.iter().map(|expense| expense.amount).sum()
}

/// Group `expenses` by exact category string and compute each group's share
/// of the total.
///
/// Categories are matched case-sensitively with no normalization. The result
/// is sorted by amount in descending order; ties keep the order in which the
/// categories were first seen. When the total is zero every percentage is
/// zero rather than NaN.
pub(crate) fn category_breakdown(expenses: &[Expense]) -> Vec<CategoryDatum> {
    let total = total_amount(expenses);

    let mut groups: Vec<(String, f64)> = Vec::new();

    for expense in expenses {
        match groups
            .iter_mut()
            .find(|(category, _)| *category == expense.category)
        {
            Some((_, amount)) => *amount += expense.amount,
            None => groups.push((expense.category.clone(), expense.amount)),
        }
    }

    let mut breakdown: Vec<CategoryDatum> = groups
        .into_iter()
        .map(|(category, amount)| CategoryDatum {
            category,
            amount,
            percentage: if total > 0.0 {
                amount / total * 100.0
            } else {
                0.0
            },
        })
        .collect();

    // A stable sort keeps first-seen order for equal amounts.
    breakdown.sort_by(|a, b| {
        b.amount
            .partial_cmp(&a.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    breakdown
}

/// Bucket `expenses` along the timeline granularity implied by `period`.
///
/// Bucket keys are derived from each expense's date as given, so callers
/// must shift stored instants into the timezone the timeline should follow
/// before aggregating. Only buckets with at least one expense appear.
///
/// Daily and monthly timelines are sorted by their numeric bucket key;
/// weekly and yearly timelines keep first-occurrence order.
pub(crate) fn timeline_breakdown(expenses: &[Expense], period: Period) -> Vec<TimelinePoint> {
    let mut buckets: Vec<(u8, String, f64)> = Vec::new();

    for expense in expenses {
        let (key, label) = bucket_for(expense.date, period);

        match buckets
            .iter_mut()
            .find(|(existing_key, _, _)| *existing_key == key)
        {
            Some((_, _, amount)) => *amount += expense.amount,
            None => buckets.push((key, label, expense.amount)),
        }
    }

    match period {
        Period::Daily | Period::Monthly => buckets.sort_by_key(|(key, _, _)| *key),
        Period::Weekly | Period::Yearly => {}
    }

    buckets
        .into_iter()
        .map(|(_, label, amount)| TimelinePoint::new(label, amount))
        .collect()
}

fn bucket_for(date: OffsetDateTime, period: Period) -> (u8, String) {
    match period {
        Period::Daily => (date.hour(), format!("{}:00", date.hour())),
        Period::Weekly => {
            let index = date.weekday().number_days_from_sunday();
            (index, DAY_NAMES[index as usize].to_owned())
        }
        Period::Monthly => (date.day(), date.day().to_string()),
        Period::Yearly => {
            let index = u8::from(date.month()) - 1;
            (index, MONTH_NAMES[index as usize].to_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use time::{OffsetDateTime, macros::datetime};

    use crate::{expense::Expense, period::Period};

    use super::{category_breakdown, timeline_breakdown, total_amount};

    fn create_test_expense(amount: f64, date: OffsetDateTime, category: &str) -> Expense {
        Expense {
            id: 1,
            description: "Gasto".to_owned(),
            amount,
            category: category.to_owned(),
            date,
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn total_is_zero_for_no_expenses() {
        assert_eq!(total_amount(&[]), 0.0);
    }

    #[test]
    fn total_sums_amounts() {
        let expenses = vec![
            create_test_expense(10.0, datetime!(2024 - 03 - 15 9:00 UTC), "Alimentación"),
            create_test_expense(30.0, datetime!(2024 - 03 - 15 14:00 UTC), "Transporte"),
        ];

        assert_eq!(total_amount(&expenses), 40.0);
    }

    #[test]
    fn category_breakdown_sorts_by_amount_descending() {
        let expenses = vec![
            create_test_expense(10.0, datetime!(2024 - 03 - 15 9:00 UTC), "Alimentación"),
            create_test_expense(30.0, datetime!(2024 - 03 - 15 14:00 UTC), "Transporte"),
        ];

        let breakdown = category_breakdown(&expenses);

        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown[0].category, "Transporte");
        assert_eq!(breakdown[0].amount, 30.0);
        assert_eq!(breakdown[0].percentage, 75.0);
        assert_eq!(breakdown[1].category, "Alimentación");
        assert_eq!(breakdown[1].amount, 10.0);
        assert_eq!(breakdown[1].percentage, 25.0);
    }

    #[test]
    fn category_breakdown_groups_exact_strings() {
        let expenses = vec![
            create_test_expense(10.0, datetime!(2024 - 03 - 15 9:00 UTC), "Alimentación"),
            create_test_expense(5.0, datetime!(2024 - 03 - 15 10:00 UTC), "alimentación"),
            create_test_expense(2.5, datetime!(2024 - 03 - 15 11:00 UTC), "Alimentación"),
        ];

        let breakdown = category_breakdown(&expenses);

        assert_eq!(breakdown.len(), 2, "got breakdown: {breakdown:#?}");
        assert_eq!(breakdown[0].category, "Alimentación");
        assert_eq!(breakdown[0].amount, 12.5);
    }

    #[test]
    fn category_breakdown_breaks_ties_by_first_seen() {
        let expenses = vec![
            create_test_expense(10.0, datetime!(2024 - 03 - 15 9:00 UTC), "Hogar"),
            create_test_expense(10.0, datetime!(2024 - 03 - 15 10:00 UTC), "Salud"),
            create_test_expense(10.0, datetime!(2024 - 03 - 15 11:00 UTC), "Ropa"),
        ];

        let breakdown = category_breakdown(&expenses);

        let categories: Vec<&str> = breakdown
            .iter()
            .map(|datum| datum.category.as_str())
            .collect();
        assert_eq!(categories, vec!["Hogar", "Salud", "Ropa"]);
    }

    #[test]
    fn category_breakdown_amounts_and_percentages_are_consistent() {
        let expenses = vec![
            create_test_expense(12.5, datetime!(2024 - 03 - 15 9:00 UTC), "Alimentación"),
            create_test_expense(7.25, datetime!(2024 - 03 - 15 10:00 UTC), "Transporte"),
            create_test_expense(80.0, datetime!(2024 - 03 - 15 11:00 UTC), "Hogar"),
        ];
        let total = total_amount(&expenses);

        let breakdown = category_breakdown(&expenses);

        let amount_sum: f64 = breakdown.iter().map(|datum| datum.amount).sum();
        let percentage_sum: f64 = breakdown.iter().map(|datum| datum.percentage).sum();
        assert_eq!(amount_sum, total);
        assert!(
            (percentage_sum - 100.0).abs() < 1e-9,
            "percentages sum to {percentage_sum}"
        );
    }

    #[test]
    fn category_breakdown_avoids_division_by_zero() {
        let expenses = vec![create_test_expense(
            0.0,
            datetime!(2024 - 03 - 15 9:00 UTC),
            "Otros",
        )];

        let breakdown = category_breakdown(&expenses);

        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].percentage, 0.0);
    }

    #[test]
    fn category_breakdown_is_empty_for_no_expenses() {
        assert_eq!(category_breakdown(&[]), vec![]);
    }

    #[test]
    fn daily_timeline_groups_by_hour_ascending() {
        let expenses = vec![
            create_test_expense(5.0, datetime!(2024 - 03 - 15 14:30 UTC), "Otros"),
            create_test_expense(5.0, datetime!(2024 - 03 - 15 9:10 UTC), "Otros"),
            create_test_expense(5.0, datetime!(2024 - 03 - 15 9:45 UTC), "Otros"),
            create_test_expense(15.0, datetime!(2024 - 03 - 15 14:00 UTC), "Otros"),
        ];

        let timeline = timeline_breakdown(&expenses, Period::Daily);

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].date, "9:00");
        assert_eq!(timeline[0].amount, 10.0);
        assert_eq!(timeline[0].formatted_date, "9:00");
        assert_eq!(timeline[1].date, "14:00");
        assert_eq!(timeline[1].amount, 20.0);
    }

    #[test]
    fn weekly_timeline_keeps_first_occurrence_order() {
        // A Wednesday expense listed before a Monday one stays first.
        let expenses = vec![
            create_test_expense(20.0, datetime!(2024 - 03 - 13 10:00 UTC), "Otros"),
            create_test_expense(10.0, datetime!(2024 - 03 - 11 10:00 UTC), "Otros"),
            create_test_expense(5.0, datetime!(2024 - 03 - 13 19:00 UTC), "Otros"),
        ];

        let timeline = timeline_breakdown(&expenses, Period::Weekly);

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].date, "Mié");
        assert_eq!(timeline[0].amount, 25.0);
        assert_eq!(timeline[1].date, "Lun");
        assert_eq!(timeline[1].amount, 10.0);
    }

    #[test]
    fn weekly_timeline_uses_sunday_first_day_names() {
        let expenses = vec![
            create_test_expense(1.0, datetime!(2024 - 03 - 10 10:00 UTC), "Otros"),
            create_test_expense(2.0, datetime!(2024 - 03 - 16 10:00 UTC), "Otros"),
        ];

        let timeline = timeline_breakdown(&expenses, Period::Weekly);

        assert_eq!(timeline[0].date, "Dom");
        assert_eq!(timeline[1].date, "Sáb");
    }

    #[test]
    fn monthly_timeline_groups_by_day_ascending() {
        let expenses = vec![
            create_test_expense(8.0, datetime!(2024 - 03 - 22 10:00 UTC), "Otros"),
            create_test_expense(4.0, datetime!(2024 - 03 - 05 10:00 UTC), "Otros"),
            create_test_expense(2.0, datetime!(2024 - 03 - 22 19:00 UTC), "Otros"),
        ];

        let timeline = timeline_breakdown(&expenses, Period::Monthly);

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].date, "5");
        assert_eq!(timeline[0].amount, 4.0);
        assert_eq!(timeline[1].date, "22");
        assert_eq!(timeline[1].amount, 10.0);
    }

    #[test]
    fn yearly_timeline_keeps_first_occurrence_order() {
        let expenses = vec![
            create_test_expense(50.0, datetime!(2024 - 11 - 02 10:00 UTC), "Otros"),
            create_test_expense(25.0, datetime!(2024 - 02 - 14 10:00 UTC), "Otros"),
            create_test_expense(5.0, datetime!(2024 - 11 - 20 10:00 UTC), "Otros"),
        ];

        let timeline = timeline_breakdown(&expenses, Period::Yearly);

        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].date, "Nov");
        assert_eq!(timeline[0].amount, 55.0);
        assert_eq!(timeline[1].date, "Feb");
        assert_eq!(timeline[1].amount, 25.0);
    }

    #[test]
    fn timeline_bucket_amounts_sum_to_total() {
        let expenses = vec![
            create_test_expense(12.5, datetime!(2024 - 03 - 15 9:00 UTC), "Alimentación"),
            create_test_expense(7.25, datetime!(2024 - 03 - 11 10:00 UTC), "Transporte"),
            create_test_expense(80.0, datetime!(2024 - 03 - 13 11:00 UTC), "Hogar"),
        ];
        let total = total_amount(&expenses);

        for period in [
            Period::Daily,
            Period::Weekly,
            Period::Monthly,
            Period::Yearly,
        ] {
            let timeline = timeline_breakdown(&expenses, period);

            let bucket_sum: f64 = timeline.iter().map(|point| point.amount).sum();
            assert_eq!(bucket_sum, total, "bucket sum mismatch for {period:?}");
        }
    }

    #[test]
    fn timeline_is_empty_for_no_expenses() {
        assert_eq!(timeline_breakdown(&[], Period::Daily), vec![]);
    }
}
