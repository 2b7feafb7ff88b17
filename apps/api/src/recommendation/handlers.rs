//! Axum route handlers for the Recommendation API.

use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::card::CardRecord;
use crate::models::profile::{FieldName, UserProfile};
use crate::profile::normalize;
use crate::recommendation::engine::recommend;
use crate::recommendation::rewards::estimate_annual_rewards;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    /// Raw answers keyed by field name, e.g. `{"monthly_income": "50000"}`.
    pub answers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStatus {
    Ok,
    /// Valid request, zero qualifying cards. Not an error.
    NoMatches,
}

#[derive(Debug, Serialize)]
pub struct RecommendedCard {
    pub rank: usize,
    #[serde(flatten)]
    pub card: CardRecord,
    pub estimated_annual_rewards: f64,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub status: RecommendationStatus,
    pub profile: UserProfile,
    pub recommendations: Vec<RecommendedCard>,
}

impl RecommendationResponse {
    pub fn new(profile: UserProfile, cards: Vec<CardRecord>) -> Self {
        let status = if cards.is_empty() {
            RecommendationStatus::NoMatches
        } else {
            RecommendationStatus::Ok
        };
        let recommendations = cards
            .into_iter()
            .enumerate()
            .map(|(i, card)| RecommendedCard {
                rank: i + 1,
                estimated_annual_rewards: estimate_annual_rewards(
                    profile.monthly_income,
                    card.reward_rate,
                ),
                card,
            })
            .collect();

        Self {
            status,
            profile,
            recommendations,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/sessions/:id/recommendations
///
/// Top cards for a session whose questionnaire is complete.
pub async fn handle_session_recommendations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let (profile, cards) = state.sessions.recommendations(id, &state.catalog)?;
    Ok(Json(RecommendationResponse::new(profile, cards)))
}

/// POST /api/v1/recommendations
///
/// One-shot variant: normalizes the supplied raw answers into a fresh profile and
/// recommends against it without creating a session.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<RecommendationResponse>, AppError> {
    let profile = profile_from_answers(&req.answers);
    let cards = recommend(&profile, &state.catalog);
    Ok(Json(RecommendationResponse::new(profile, cards)))
}

fn profile_from_answers(answers: &BTreeMap<String, String>) -> UserProfile {
    let mut profile = UserProfile::default();
    for (field, raw) in answers {
        normalize(raw, &FieldName::from(field.as_str()), &mut profile);
    }
    profile
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(name: &str, reward_rate: f64) -> CardRecord {
        CardRecord {
            name: name.to_string(),
            reward_rate,
            ..Default::default()
        }
    }

    #[test]
    fn test_response_ranks_and_estimates() {
        let profile = UserProfile {
            monthly_income: 50000.0,
            ..Default::default()
        };
        let response = RecommendationResponse::new(profile, vec![card("A", 2.0), card("B", 1.0)]);

        assert_eq!(response.status, RecommendationStatus::Ok);
        assert_eq!(response.recommendations[0].rank, 1);
        assert_eq!(response.recommendations[1].rank, 2);
        assert!((response.recommendations[0].estimated_annual_rewards - 3600.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_result_is_no_matches() {
        let response = RecommendationResponse::new(UserProfile::default(), vec![]);
        assert_eq!(response.status, RecommendationStatus::NoMatches);
        assert!(response.recommendations.is_empty());
    }

    #[test]
    fn test_card_fields_flattened_into_json() {
        let response = RecommendationResponse::new(UserProfile::default(), vec![card("Flat", 1.5)]);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["recommendations"][0]["name"], "Flat");
        assert_eq!(json["recommendations"][0]["reward_rate"], 1.5);
        assert_eq!(json["recommendations"][0]["rank"], 1);
    }

    #[test]
    fn test_profile_from_answers() {
        let answers: BTreeMap<String, String> = [
            ("monthly_income", "60000"),
            ("spending_habits", "Groceries, Fuel"),
            ("preferred_benefit", "Reward Points, Cashback"),
            ("credit_score", "unknown"),
            ("city", " Chennai "),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let profile = profile_from_answers(&answers);
        assert_eq!(profile.monthly_income, 60000.0);
        assert_eq!(profile.credit_score, 0.0);
        assert_eq!(profile.preferred_benefit, "reward points");
        assert!(profile.spending_categories.contains("grocery"));
        assert_eq!(profile.extra.get("city").map(String::as_str), Some("Chennai"));
    }
}
