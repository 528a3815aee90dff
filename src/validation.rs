// ✅ Validator - gatekeeper for new expense records
//
// Rules run in a fixed order and the first failure wins:
//   1. category is one of the registry labels
//   2. amount is a finite number > 0
//   3. date parses as a calendar date

use crate::categories::Category;
use crate::dates::parse_date;
use crate::error::ValidationError;

// ============================================================================
// CANDIDATE & ACCEPTED PAYLOAD
// ============================================================================

/// An expense as submitted by a client, before any checks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseCandidate {
    pub category: Option<String>,

    /// NaN when the client sent something non-numeric
    pub amount: Option<f64>,

    pub date: Option<String>,
}

impl ExpenseCandidate {
    /// Build a candidate from raw text fields (query parameters, form input).
    pub fn from_text(
        category: Option<String>,
        amount: Option<&str>,
        date: Option<String>,
    ) -> Self {
        ExpenseCandidate {
            category,
            amount: amount.map(parse_amount),
            date,
        }
    }
}

/// A candidate that passed every rule, ready for the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub category: Category,
    pub amount: f64,
    pub date: String,
}

// ============================================================================
// VALIDATION
// ============================================================================

pub fn validate(candidate: &ExpenseCandidate) -> Result<NewExpense, ValidationError> {
    let category = candidate
        .category
        .as_deref()
        .and_then(Category::from_label)
        .ok_or(ValidationError::InvalidCategory)?;

    let amount = candidate
        .amount
        .filter(|a| a.is_finite() && *a > 0.0)
        .ok_or(ValidationError::InvalidAmount)?;

    let date = candidate.date.as_deref().ok_or(ValidationError::InvalidDate)?;
    parse_date(date)?;

    Ok(NewExpense {
        category,
        amount,
        date: date.to_string(),
    })
}

/// Lenient numeric read: uses the longest leading decimal prefix of the text,
/// so "12.50 EUR" is 12.5. Returns NaN when there is no numeric prefix.
pub fn parse_amount(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if end < bytes.len() && (bytes[end] == b'+' || bytes[end] == b'-') {
        end += 1;
    }
    let int_start = end;
    end = digits_from(end);
    let mut mantissa_digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_end = digits_from(end + 1);
        mantissa_digits += frac_end - (end + 1);
        end = frac_end;
    }
    if mantissa_digits == 0 {
        return f64::NAN;
    }

    // Exponent only counts when digits follow it
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}
