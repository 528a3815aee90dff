// 📊 Summary Engine - filtered totals and spending analysis
//
// Pure functions over a slice of records. Nothing here mutates or reorders
// its input, so results follow insertion order.

use crate::categories::Category;
use crate::dates::{iso_date, month_key, parse_date};
use crate::store::Expense;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

// ============================================================================
// FILTER
// ============================================================================

/// Optional criteria narrowing a summary. Date bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryFilter {
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl SummaryFilter {
    /// Filter covering `start..=end`, with dates given as calendar days
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        SummaryFilter {
            category: None,
            start_date: Some(iso_date(start)),
            end_date: Some(iso_date(end)),
        }
    }

    pub fn for_category(category: &str) -> Self {
        SummaryFilter {
            category: Some(category.to_string()),
            ..Default::default()
        }
    }
}

/// A date bound after parsing. Unreadable bounds match nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Bound {
    Open,
    At(NaiveDate),
    Unreadable,
}

impl Bound {
    fn from_field(field: Option<&str>) -> Bound {
        match non_empty(field) {
            None => Bound::Open,
            Some(s) => parse_date(s).map(Bound::At).unwrap_or(Bound::Unreadable),
        }
    }
}

/// Empty strings count as absent, like an empty query parameter
fn non_empty(field: Option<&str>) -> Option<&str> {
    field.filter(|s| !s.is_empty())
}

// ============================================================================
// RESULTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: f64,
    pub expenses: Vec<Expense>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// One entry per registry category, in registry order
    pub total_by_category: Vec<CategoryTotal>,
    /// "YYYY-MM" -> total, only for months with at least one record
    pub monthly_totals: BTreeMap<String, f64>,
}

// ============================================================================
// ENGINE
// ============================================================================

/// Total and matching records for `filter`.
///
/// A record whose date cannot be parsed is dropped whenever a date bound is
/// set; without date bounds it is kept.
pub fn summarize(records: &[Expense], filter: &SummaryFilter) -> Summary {
    let category = non_empty(filter.category.as_deref());
    let start = Bound::from_field(filter.start_date.as_deref());
    let end = Bound::from_field(filter.end_date.as_deref());
    let date_filtered = start != Bound::Open || end != Bound::Open;

    let expenses: Vec<Expense> = records
        .iter()
        .filter(|e| category.map_or(true, |c| e.category.as_str() == c))
        .filter(|e| !date_filtered || within(&e.date, start, end))
        .cloned()
        .collect();

    let total = sum_amounts(expenses.iter());

    Summary { total, expenses }
}

fn within(date: &str, start: Bound, end: Bound) -> bool {
    let Ok(date) = parse_date(date) else {
        return false;
    };

    let after_start = match start {
        Bound::Open => true,
        Bound::At(s) => date >= s,
        Bound::Unreadable => false,
    };
    let before_end = match end {
        Bound::Open => true,
        Bound::At(e) => date <= e,
        Bound::Unreadable => false,
    };

    after_start && before_end
}

/// Sum of amounts. An empty set totals +0.0, never -0.0.
fn sum_amounts<'a>(expenses: impl Iterator<Item = &'a Expense>) -> f64 {
    expenses.fold(0.0, |acc, e| acc + e.amount)
}

/// Per-category and per-month totals across every record
pub fn analyze(records: &[Expense]) -> Analysis {
    let total_by_category = Category::ALL
        .iter()
        .map(|&category| CategoryTotal {
            category,
            total: sum_amounts(records.iter().filter(|e| e.category == category)),
        })
        .collect();

    let mut monthly_totals: BTreeMap<String, f64> = BTreeMap::new();
    for expense in records {
        if let Ok(date) = parse_date(&expense.date) {
            *monthly_totals.entry(month_key(date)).or_insert(0.0) += expense.amount;
        }
    }

    Analysis {
        total_by_category,
        monthly_totals,
    }
}
