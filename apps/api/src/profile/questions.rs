use serde::Serialize;

use crate::models::profile::FieldName;

/// One step of the guided questionnaire.
#[derive(Debug, Clone, Serialize)]
pub struct Question {
    pub prompt: &'static str,
    pub field: FieldName,
    /// Offered choices for multi-select steps; empty for free text.
    pub options: &'static [&'static str],
}

const SPENDING_OPTIONS: &[&str] = &["Fuel", "Travel", "Groceries", "Dining", "Online Shopping"];
const BENEFIT_OPTIONS: &[&str] = &["Cashback", "Reward Points", "Lounge Access"];

/// The fixed question sequence: income, spending, benefit, credit score.
pub static QUESTIONS: [Question; 4] = [
    Question {
        prompt: "What is your approximate monthly income (in INR)?",
        field: FieldName::MonthlyIncome,
        options: &[],
    },
    Question {
        prompt: "What are your main spending categories? (comma separated: fuel, travel, groceries, dining, online shopping)",
        field: FieldName::SpendingHabits,
        options: SPENDING_OPTIONS,
    },
    Question {
        prompt: "What type of benefits do you prefer? (cashback, reward points, lounge access)",
        field: FieldName::PreferredBenefit,
        options: BENEFIT_OPTIONS,
    },
    Question {
        prompt: "What is your approximate credit score? (or type 'unknown')",
        field: FieldName::CreditScore,
        options: &[],
    },
];
