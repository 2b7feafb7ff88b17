use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Minimum income and credit score a card's issuer requires.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Eligibility {
    /// Annual income floor.
    #[serde(default, deserialize_with = "lenient")]
    pub min_income: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub credit_score: f64,
}

/// One credit card offer from the static catalog. Read-only after load.
///
/// Every field falls back to its zero value when the catalog entry omits it, sets it to
/// `null`, or carries the wrong JSON type, so one sloppy entry never poisons the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub issuer: String,
    #[serde(default, deserialize_with = "lenient")]
    pub annual_fee: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub joining_fee: f64,
    /// e.g. "cashback", "travel_points", "lounge_access"
    #[serde(default, deserialize_with = "lenient")]
    pub reward_type: String,
    /// Percentage, 0 to 100.
    #[serde(default, deserialize_with = "lenient")]
    pub reward_rate: f64,
    #[serde(default, deserialize_with = "lenient")]
    pub reward_categories: Vec<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub eligibility: Eligibility,
    #[serde(default, deserialize_with = "lenient")]
    pub perks: Vec<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Deserializes `T`, substituting `T::default()` for anything that does not fit.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}
