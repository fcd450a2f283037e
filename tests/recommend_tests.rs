// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use spendwise::aggregate::CategoryBreakdown;
use spendwise::recommend::{recommend, RecommendationRules, HEALTHY_MESSAGE};

fn breakdown(items: &[(&str, i64)]) -> CategoryBreakdown {
    let mut b = CategoryBreakdown::default();
    for (c, a) in items {
        b.add(c, Decimal::from(*a));
    }
    b
}

#[test]
fn dominant_food_spending_triggers_share_and_threshold_rules() {
    let b = breakdown(&[("Food", 1500)]);
    let out = recommend(&b, b.total(), &RecommendationRules::default());
    assert_eq!(
        out,
        vec![
            "You're spending a lot on Food (100% of total). Consider reducing this to save money."
                .to_string(),
            "Your food expenses are high. Consider meal planning or cooking at home more often to save money."
                .to_string(),
        ]
    );
}

#[test]
fn nothing_spent_is_healthy() {
    let b = CategoryBreakdown::default();
    let out = recommend(&b, Decimal::ZERO, &RecommendationRules::default());
    assert_eq!(out, vec![HEALTHY_MESSAGE.to_string()]);
}

#[test]
fn evenly_spread_small_spending_is_healthy() {
    let items: Vec<(String, i64)> = (0..6).map(|i| (format!("Cat{}", i), 10)).collect();
    let mut b = CategoryBreakdown::default();
    for (c, a) in &items {
        b.add(c, Decimal::from(*a));
    }
    let out = recommend(&b, b.total(), &RecommendationRules::default());
    assert_eq!(out, vec![HEALTHY_MESSAGE.to_string()]);
}

#[test]
fn share_messages_come_before_threshold_messages() {
    let b = breakdown(&[("Rent", 700), ("Shopping", 300)]);
    let out = recommend(&b, b.total(), &RecommendationRules::default());
    assert_eq!(out.len(), 3);
    assert!(out[0].contains("Rent (70% of total)"));
    assert!(out[1].contains("Shopping (30% of total)"));
    assert!(out[2].starts_with("Your shopping expenses are relatively high."));
}

#[test]
fn share_percentage_rounds_half_up() {
    // 20.5% of total
    let mut b = CategoryBreakdown::default();
    b.add("Books", Decimal::new(205, 1));
    b.add("Misc", Decimal::new(795, 1));
    let out = recommend(&b, b.total(), &RecommendationRules::default());
    assert!(out[0].contains("Books (21% of total)"), "{:?}", out);
}

#[test]
fn threshold_is_case_insensitive() {
    let b = breakdown(&[("food", 401), ("rent", 5000)]);
    let out = recommend(&b, b.total(), &RecommendationRules::default());
    assert!(out.iter().any(|m| m.starts_with("Your food expenses are high.")));
}

#[test]
fn custom_threshold_gets_generic_message() {
    let mut rules = RecommendationRules::default();
    rules.set_threshold("Travel", Decimal::from(50));
    let b = breakdown(&[("Travel", 60), ("Rent", 1000)]);
    let out = recommend(&b, b.total(), &rules);
    assert!(out.contains(
        &"Your Travel expenses are above 50. Review them for possible savings.".to_string()
    ));
}

#[test]
fn tracker_preset_uses_larger_limits() {
    let rules = RecommendationRules::tracker_preset();
    assert_eq!(rules.thresholds.len(), 5);
    let b = breakdown(&[
        ("Food", 1000),
        ("Transportation", 4500),
        ("Rent", 20000),
        ("Utilities", 500),
        ("Health", 5000),
    ]);
    let out = recommend(&b, b.total(), &rules);
    assert!(out.iter().any(|m| m.contains("transportation costs are high")));
    assert!(!out.iter().any(|m| m.contains("food expenses")));
}

#[test]
fn removed_threshold_no_longer_fires() {
    let mut rules = RecommendationRules::default();
    assert!(rules.remove_threshold("FOOD"));
    assert!(!rules.remove_threshold("Food"));
    rules.share_threshold = Decimal::ONE_HUNDRED;
    let b = breakdown(&[("Food", 500)]);
    assert_eq!(recommend(&b, b.total(), &rules), vec![HEALTHY_MESSAGE.to_string()]);
}
