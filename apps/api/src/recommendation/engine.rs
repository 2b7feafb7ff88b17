//! Filter-then-rank over the card catalog.
//!
//! 1. Build `FilterCriteria` from the profile (income annualized, benefit lowercased).
//! 2. Keep cards that pass every non-empty criterion.
//! 3. Stable sort: `reward_rate` descending, then `annual_fee` ascending.
//! 4. Truncate to `TOP_N`.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::models::card::CardRecord;
use crate::models::profile::UserProfile;
use crate::recommendation::catalog::Catalog;

/// Maximum number of cards returned.
pub const TOP_N: usize = 5;

/// Per-request filter derived from a profile. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterCriteria {
    /// Annualized: monthly income × 12.
    pub min_income: f64,
    /// 0 disables the credit score check.
    pub credit_score: f64,
    /// Empty disables the reward type check.
    pub reward_type: String,
    /// Empty disables the category check.
    pub spending_categories: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            min_income: profile.monthly_income * 12.0,
            credit_score: profile.credit_score,
            reward_type: profile.preferred_benefit.to_lowercase(),
            spending_categories: profile.spending_categories.clone(),
        }
    }

    pub fn matches(&self, card: &CardRecord) -> bool {
        if self.min_income < card.eligibility.min_income {
            return false;
        }

        if self.credit_score > 0.0 && self.credit_score < card.eligibility.credit_score {
            return false;
        }

        if !self.reward_type.is_empty() && card.reward_type.to_lowercase() != self.reward_type {
            return false;
        }

        if !self.spending_categories.is_empty() {
            let overlaps = card
                .reward_categories
                .iter()
                .any(|c| self.spending_categories.contains(&c.to_lowercase()));
            if !overlaps {
                return false;
            }
        }

        true
    }
}

/// Cards passing `criteria`, in catalog order.
pub fn filter_cards<'a>(cards: &'a [CardRecord], criteria: &FilterCriteria) -> Vec<&'a CardRecord> {
    cards.iter().filter(|card| criteria.matches(card)).collect()
}

/// Highest reward rate first, cheaper annual fee on ties, catalog order otherwise.
pub fn rank_cards(mut cards: Vec<&CardRecord>) -> Vec<&CardRecord> {
    // `sort_by` is stable, which keeps catalog order for full ties.
    cards.sort_by(|a, b| {
        b.reward_rate
            .total_cmp(&a.reward_rate)
            .then_with(|| a.annual_fee.total_cmp(&b.annual_fee))
    });
    cards.truncate(TOP_N);
    cards
}

/// Top recommendations for `profile`. An empty result means no card qualified.
pub fn recommend(profile: &UserProfile, catalog: &Catalog) -> Vec<CardRecord> {
    let criteria = FilterCriteria::from_profile(profile);
    debug!(?criteria, "built filter criteria");

    let filtered = filter_cards(catalog.cards(), &criteria);
    debug!("{} of {} cards passed filtering", filtered.len(), catalog.len());

    rank_cards(filtered).into_iter().cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::card::Eligibility;

    fn card(name: &str, reward_rate: f64, annual_fee: f64) -> CardRecord {
        CardRecord {
            name: name.to_string(),
            issuer: "Test Bank".to_string(),
            annual_fee,
            reward_type: "cashback".to_string(),
            reward_rate,
            reward_categories: vec!["travel".to_string(), "dining".to_string()],
            eligibility: Eligibility {
                min_income: 300000.0,
                credit_score: 700.0,
            },
            ..Default::default()
        }
    }

    fn profile(monthly_income: f64, credit_score: f64, categories: &[&str], benefit: &str) -> UserProfile {
        UserProfile {
            monthly_income,
            credit_score,
            spending_categories: categories.iter().map(|s| s.to_string()).collect(),
            preferred_benefit: benefit.to_string(),
            ..Default::default()
        }
    }

    fn names(cards: &[CardRecord]) -> Vec<&str> {
        cards.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_criteria_annualizes_income_and_lowercases_benefit() {
        let criteria = FilterCriteria::from_profile(&profile(50000.0, 750.0, &["travel"], "Cashback"));
        assert_eq!(criteria.min_income, 600000.0);
        assert_eq!(criteria.credit_score, 750.0);
        assert_eq!(criteria.reward_type, "cashback");
        assert!(criteria.spending_categories.contains("travel"));
    }

    #[test]
    fn test_annualized_income_meets_card_floor() {
        let mut c = card("Travel Cashback", 2.0, 500.0);
        c.eligibility = Eligibility {
            min_income: 500000.0,
            credit_score: 700.0,
        };
        c.reward_categories = vec!["travel".to_string()];
        let catalog = Catalog::from_cards(vec![c]);

        let result = recommend(&profile(50000.0, 750.0, &["travel", "dining"], "cashback"), &catalog);
        assert_eq!(names(&result), vec!["Travel Cashback"]);
    }

    #[test]
    fn test_income_below_floor_excluded() {
        let catalog = Catalog::from_cards(vec![card("A", 2.0, 0.0)]);
        // 20000 × 12 = 240000 < 300000
        assert!(recommend(&profile(20000.0, 750.0, &[], ""), &catalog).is_empty());
        // 25000 × 12 = 300000, equal to the floor
        assert_eq!(recommend(&profile(25000.0, 750.0, &[], ""), &catalog).len(), 1);
    }

    #[test]
    fn test_unknown_credit_score_bypasses_check() {
        let mut strict = card("Strict", 3.0, 0.0);
        strict.eligibility.credit_score = 900.0;
        let catalog = Catalog::from_cards(vec![strict, card("Lenient", 2.0, 0.0)]);

        let result = recommend(&profile(100000.0, 0.0, &[], ""), &catalog);
        assert_eq!(names(&result), vec!["Strict", "Lenient"]);
    }

    #[test]
    fn test_low_credit_score_excluded() {
        let catalog = Catalog::from_cards(vec![card("A", 2.0, 0.0)]);
        assert!(recommend(&profile(100000.0, 650.0, &[], ""), &catalog).is_empty());
        assert_eq!(recommend(&profile(100000.0, 700.0, &[], ""), &catalog).len(), 1);
    }

    #[test]
    fn test_reward_type_exact_match_case_insensitive_on_card() {
        let mut lounge = card("Lounge", 4.0, 0.0);
        lounge.reward_type = "Lounge_Access".to_string();
        let mut partial = card("Partial", 5.0, 0.0);
        partial.reward_type = "cashback_plus".to_string();
        let catalog = Catalog::from_cards(vec![lounge, partial, card("Cash", 1.0, 0.0)]);

        let lounge_only = recommend(&profile(100000.0, 0.0, &[], "lounge_access"), &catalog);
        assert_eq!(names(&lounge_only), vec!["Lounge"]);

        let cash_only = recommend(&profile(100000.0, 0.0, &[], "cashback"), &catalog);
        assert_eq!(names(&cash_only), vec!["Cash"]);
    }

    #[test]
    fn test_single_category_overlap_suffices() {
        let mut fuel = card("Fuel", 1.0, 0.0);
        fuel.reward_categories = vec!["FUEL".to_string()];
        let catalog = Catalog::from_cards(vec![fuel, card("Travel", 2.0, 0.0)]);

        let result = recommend(&profile(100000.0, 0.0, &["fuel", "grocery"], ""), &catalog);
        assert_eq!(names(&result), vec!["Fuel"]);
    }

    #[test]
    fn test_no_category_overlap_yields_empty_result() {
        let catalog = Catalog::from_cards(vec![card("A", 2.0, 0.0), card("B", 3.0, 0.0)]);
        let result = recommend(&profile(100000.0, 800.0, &["upi"], ""), &catalog);
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_criteria_only_apply_income() {
        let mut other = card("Other", 1.0, 0.0);
        other.reward_type = "travel_points".to_string();
        other.reward_categories.clear();
        let catalog = Catalog::from_cards(vec![other, card("A", 2.0, 0.0)]);

        let result = recommend(&profile(100000.0, 0.0, &[], ""), &catalog);
        assert_eq!(names(&result), vec!["A", "Other"]);
    }

    #[test]
    fn test_ranking_rate_then_fee_then_catalog_order() {
        let catalog = Catalog::from_cards(vec![
            card("Low rate free", 1.0, 0.0),
            card("High rate pricey", 5.0, 10000.0),
            card("Mid rate pricey", 3.0, 2500.0),
            card("Mid rate cheap", 3.0, 500.0),
            card("Mid rate cheap twin", 3.0, 500.0),
        ]);

        let result = recommend(&profile(100000.0, 750.0, &[], ""), &catalog);
        assert_eq!(
            names(&result),
            vec![
                "High rate pricey",
                "Mid rate cheap",
                "Mid rate cheap twin",
                "Mid rate pricey",
                "Low rate free"
            ]
        );
    }

    #[test]
    fn test_seven_qualifying_cards_truncate_to_five() {
        let catalog = Catalog::from_cards(vec![
            card("c1", 1.0, 0.0),
            card("c2", 2.5, 1000.0),
            card("c3", 5.0, 0.0),
            card("c4", 2.5, 500.0),
            card("c5", 0.5, 0.0),
            card("c6", 4.0, 999.0),
            card("c7", 3.0, 0.0),
        ]);

        let result = recommend(&profile(100000.0, 750.0, &["dining"], "cashback"), &catalog);
        assert_eq!(result.len(), TOP_N);
        assert_eq!(names(&result), vec!["c3", "c6", "c7", "c4", "c2"]);
    }

    #[test]
    fn test_raising_income_never_removes_cards() {
        let mut cards = Vec::new();
        for (i, floor) in [0.0, 150000.0, 300000.0, 600000.0, 1200000.0].into_iter().enumerate() {
            let mut c = card(&format!("floor-{i}"), 1.0, 0.0);
            c.eligibility.min_income = floor;
            cards.push(c);
        }
        let criteria_at = |income: f64| FilterCriteria::from_profile(&profile(income, 750.0, &[], ""));

        let mut previous: Vec<String> = Vec::new();
        for income in [0.0, 10000.0, 25000.0, 50000.0, 100000.0, 200000.0] {
            let survivors: Vec<String> = filter_cards(&cards, &criteria_at(income))
                .into_iter()
                .map(|c| c.name.clone())
                .collect();
            assert!(previous.iter().all(|name| survivors.contains(name)));
            previous = survivors;
        }
        assert_eq!(previous.len(), cards.len());
    }

    #[test]
    fn test_results_carry_display_fields_unchanged() {
        let mut original = card("Display", 2.0, 499.0);
        original.joining_fee = 199.0;
        original.perks = vec!["Movie tickets".to_string(), "Fuel surcharge waiver".to_string()];
        let catalog = Catalog::from_cards(vec![original.clone()]);

        let result = recommend(&profile(100000.0, 0.0, &[], ""), &catalog);
        assert_eq!(result, vec![original]);
    }

    #[test]
    fn test_empty_catalog_is_empty_result() {
        assert!(recommend(&profile(100000.0, 750.0, &[], ""), &Catalog::default()).is_empty());
    }
}
