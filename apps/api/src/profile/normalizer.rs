use std::collections::BTreeSet;

use tracing::debug;

use crate::models::profile::{FieldName, UserProfile};
use crate::profile::aliases::{canonical_benefit, canonical_category};

/// Writes one raw answer into `profile` in canonical form.
///
/// - `spending_habits`: comma-separated, trimmed, lowercased, alias-resolved, deduplicated.
///   Empty tokens are dropped.
/// - `preferred_benefit`: same tokenization, but only the first token is kept.
/// - `monthly_income`, `credit_score`: numeric, `0` when unparseable.
/// - anything else: trimmed text stored verbatim in `profile.extra`.
pub fn normalize(raw_answer: &str, field: &FieldName, profile: &mut UserProfile) {
    match field {
        FieldName::SpendingHabits => {
            profile.spending_categories = normalize_categories(raw_answer);
        }
        FieldName::PreferredBenefit => {
            profile.preferred_benefit = normalize_benefit(raw_answer);
        }
        FieldName::MonthlyIncome => {
            profile.monthly_income = parse_number(raw_answer);
        }
        FieldName::CreditScore => {
            profile.credit_score = parse_number(raw_answer);
        }
        FieldName::Other(name) => {
            profile
                .extra
                .insert(name.clone(), raw_answer.trim().to_string());
        }
    }
    debug!(field = %field, "normalized answer");
}

fn tokens(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',').map(|t| t.trim().to_lowercase())
}

fn normalize_categories(raw: &str) -> BTreeSet<String> {
    tokens(raw)
        .filter(|t| !t.is_empty())
        .map(|t| canonical_category(&t).to_string())
        .collect()
}

fn normalize_benefit(raw: &str) -> String {
    // Filtering assumes a single reward type, so extra selections are discarded.
    tokens(raw)
        .next()
        .map(|t| canonical_benefit(&t).to_string())
        .unwrap_or_default()
}

/// Decimal text parses as a float, anything else as an integer. Failure yields 0.
/// Integers too wide for `i64` are still accepted through `f64`.
fn parse_number(raw: &str) -> f64 {
    let raw = raw.trim();
    let parsed = if raw.contains('.') {
        raw.parse::<f64>().ok()
    } else {
        raw.parse::<i64>()
            .ok()
            .map(|n| n as f64)
            .or_else(|| is_integer_text(raw).then(|| raw.parse::<f64>().ok()).flatten())
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Optional sign followed by one or more ASCII digits.
fn is_integer_text(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
