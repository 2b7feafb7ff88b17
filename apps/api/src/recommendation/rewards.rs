/// Share of monthly income assumed to go on the card.
pub const ASSUMED_SPEND_SHARE: f64 = 0.3;

/// Rough yearly reward value for a card at `reward_rate` percent.
pub fn estimate_annual_rewards(monthly_income: f64, reward_rate: f64) -> f64 {
    let monthly_spend = monthly_income * ASSUMED_SPEND_SHARE;
    monthly_spend * (reward_rate / 100.0) * 12.0
}
