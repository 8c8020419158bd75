//! Property-based tests for the balancing engine.
//!
//! These tests check invariants of `balance` across random groups, using the
//! `proptest` crate for test case generation.

use balancer_core::{balance, summarize, AssetsGroup, NewAsset, NewAssetsGroup};
use proptest::prelude::*;

const EPSILON: f64 = 1e-6;

// =============================================================================
// Generators
// =============================================================================

/// Generates an asset spec with non-negative values.
fn arb_new_asset() -> impl Strategy<Value = NewAsset> {
    (
        "[A-Z]{2,6}",       // label
        0.0f64..100.0,      // score
        0.0f64..100_000.0,  // previous_value
        0.0f64..100_000.0,  // current_value
        any::<bool>(),      // include
    )
        .prop_map(|(label, score, previous_value, current_value, include)| NewAsset {
            label,
            score,
            previous_value,
            current_value,
            include,
        })
}

/// Generates a group of up to `max_assets` assets.
fn arb_group(max_assets: usize) -> impl Strategy<Value = AssetsGroup> {
    (
        0.0f64..50_000.0,
        proptest::collection::vec(arb_new_asset(), 0..=max_assets),
    )
        .prop_map(|(contribution_total, assets)| {
            AssetsGroup::new(NewAssetsGroup {
                label: "generated".to_string(),
                contribution_total,
                assets,
            })
        })
}

/// Generates a group where every asset is included and scores sum to 100.
fn arb_fully_weighted_group(max_assets: usize) -> impl Strategy<Value = AssetsGroup> {
    (
        0.0f64..50_000.0,
        proptest::collection::vec((1.0f64..10.0, 1.0f64..100_000.0), 1..=max_assets),
    )
        .prop_map(|(contribution_total, weights)| {
            let weight_sum: f64 = weights.iter().map(|(w, _)| w).sum();
            let assets = weights
                .into_iter()
                .enumerate()
                .map(|(i, (weight, current_value))| NewAsset {
                    label: format!("asset-{}", i),
                    score: weight / weight_sum * 100.0,
                    previous_value: current_value,
                    current_value,
                    include: true,
                })
                .collect();
            AssetsGroup::new(NewAssetsGroup {
                label: "weighted".to_string(),
                contribution_total,
                assets,
            })
        })
}

fn close_enough(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= EPSILON * expected.abs().max(1.0)
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Balancing an already balanced group changes nothing.
    #[test]
    fn prop_balance_is_idempotent(group in arb_group(20)) {
        let mut balanced = group.clone();
        balance(&mut balanced);

        prop_assert_eq!(balanced.assets, group.assets);
    }

    /// Excluded assets are never recomputed, whatever the group context.
    #[test]
    fn prop_excluded_assets_keep_derived_values(
        group in arb_group(20),
        contribution_total in 0.0f64..50_000.0,
    ) {
        let mut changed = group.clone();
        changed.contribution_total = contribution_total;
        balance(&mut changed);

        for (before, after) in group.assets.iter().zip(&changed.assets) {
            if !before.include {
                prop_assert_eq!(before, after);
            }
        }
    }

    /// Included percentages add up to the whole whenever there is a total.
    #[test]
    fn prop_included_percentages_sum_to_one(group in arb_group(20)) {
        let current_total = group.current_total();
        let sum: f64 = group
            .assets
            .iter()
            .filter(|a| a.include)
            .map(|a| a.percentage_from_total)
            .sum();

        if current_total > 0.0 {
            prop_assert!(close_enough(sum, 1.0), "percentages summed to {}", sum);
        } else {
            prop_assert_eq!(sum, 0.0);
        }
    }

    /// With scores covering 100%, the final contributions distribute exactly
    /// the contribution total.
    #[test]
    fn prop_final_contributions_distribute_contribution(group in arb_fully_weighted_group(15)) {
        let summary = summarize(&group);

        prop_assert!(
            close_enough(summary.total_final_contribution, group.contribution_total),
            "distributed {} of {}",
            summary.total_final_contribution,
            group.contribution_total
        );
    }

    /// The summary total only counts included assets.
    #[test]
    fn prop_summary_counts_included_assets(group in arb_group(20)) {
        let summary = summarize(&group);
        let included: Vec<_> = group.assets.iter().filter(|a| a.include).collect();

        prop_assert_eq!(summary.included_assets, included.len());
        prop_assert_eq!(summary.current_total, group.current_total());
    }
}
