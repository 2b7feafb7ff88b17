//! Static synonym tables mapping user wording to canonical tokens.
//!
//! Lookups expect input that is already trimmed and lowercased. Tokens missing from a table
//! pass through unchanged.

/// Spending-habit wording → canonical reward category.
pub const CATEGORY_ALIASES: &[(&str, &str)] = &[
    ("online shopping", "online_spends"),
    ("groceries", "grocery"),
    ("grocery", "grocery"),
    ("fuel", "fuel"),
    ("travel", "travel"),
    ("dining", "dining"),
    ("upi", "upi"),
    ("digital payments", "digital_payments"),
    ("food delivery", "food_delivery"),
    ("entertainment", "entertainment"),
    ("supermarkets", "supermarkets"),
];

/// Preferred-benefit wording → canonical reward type.
pub const BENEFIT_ALIASES: &[(&str, &str)] = &[
    ("cashback", "cashback"),
    ("reward points", "reward points"),
    ("lounge access", "lounge_access"),
];

fn lookup<'a>(table: &[(&str, &'static str)], token: &'a str) -> &'a str {
    table
        .iter()
        .find(|(alias, _)| *alias == token)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(token)
}

pub fn canonical_category(token: &str) -> &str {
    lookup(CATEGORY_ALIASES, token)
}

pub fn canonical_benefit(token: &str) -> &str {
    lookup(BENEFIT_ALIASES, token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_aliases_resolve() {
        assert_eq!(canonical_category("online shopping"), "online_spends");
        assert_eq!(canonical_category("groceries"), "grocery");
        assert_eq!(canonical_category("digital payments"), "digital_payments");
        assert_eq!(canonical_category("food delivery"), "food_delivery");
    }

    #[test]
    fn test_unknown_tokens_pass_through() {
        assert_eq!(canonical_category("pharmacy"), "pharmacy");
        assert_eq!(canonical_benefit("travel_points"), "travel_points");
    }

    #[test]
    fn test_benefit_aliases_resolve() {
        assert_eq!(canonical_benefit("lounge access"), "lounge_access");
        assert_eq!(canonical_benefit("reward points"), "reward points");
        assert_eq!(canonical_benefit("cashback"), "cashback");
    }

    #[test]
    fn test_every_canonical_value_is_a_fixed_point() {
        // Canonical categories must not be rewritten again on a second pass.
        for (_, canonical) in CATEGORY_ALIASES {
            assert_eq!(canonical_category(canonical), *canonical);
        }
        for (_, canonical) in BENEFIT_ALIASES {
            assert_eq!(canonical_benefit(canonical), *canonical);
        }
    }

    #[test]
    fn test_alias_keys_are_lowercase_and_trimmed() {
        for (alias, _) in CATEGORY_ALIASES.iter().chain(BENEFIT_ALIASES) {
            assert_eq!(*alias, alias.trim().to_lowercase());
        }
    }
}
