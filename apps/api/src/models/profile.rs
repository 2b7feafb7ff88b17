use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A session's financial profile. Holds canonical values only once normalization has run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub monthly_income: f64,
    /// 0 means unknown.
    pub credit_score: f64,
    pub spending_categories: BTreeSet<String>,
    /// Empty when no benefit was selected.
    pub preferred_benefit: String,
    /// Trimmed answers to any field the normalizer has no rule for.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

/// Questionnaire field an answer belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    MonthlyIncome,
    SpendingHabits,
    PreferredBenefit,
    CreditScore,
    #[serde(untagged)]
    Other(String),
}

impl FieldName {
    pub fn as_str(&self) -> &str {
        match self {
            FieldName::MonthlyIncome => "monthly_income",
            FieldName::SpendingHabits => "spending_habits",
            FieldName::PreferredBenefit => "preferred_benefit",
            FieldName::CreditScore => "credit_score",
            FieldName::Other(name) => name,
        }
    }
}

impl From<&str> for FieldName {
    fn from(s: &str) -> Self {
        match s.trim() {
            "monthly_income" => FieldName::MonthlyIncome,
            "spending_habits" => FieldName::SpendingHabits,
            "preferred_benefit" => FieldName::PreferredBenefit,
            "credit_score" => FieldName::CreditScore,
            other => FieldName::Other(other.to_string()),
        }
    }
}

impl FromStr for FieldName {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FieldName::from(s))
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
