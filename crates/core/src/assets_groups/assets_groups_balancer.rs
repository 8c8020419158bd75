//! Balancing engine - re-derives asset metrics from the group context.

use serde::Serialize;

use super::assets_groups_model::AssetsGroup;

/// Recomputes the derived fields of every included asset.
///
/// The group total is computed once, before any asset is touched. Excluded
/// assets are skipped and keep their previous derived values.
pub fn balance(group: &mut AssetsGroup) {
    let current_total = group.current_total();
    let contribution_total = group.contribution_total;

    for asset in group.assets.iter_mut().filter(|a| a.include) {
        asset.recalculate(current_total, contribution_total);
    }
}

/// Aggregated view of a balanced group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub current_total: f64,
    pub contribution_total: f64,
    pub included_assets: usize,
    pub total_score: f64,
    pub total_final_contribution: f64,
}

pub fn summarize(group: &AssetsGroup) -> BalanceSummary {
    let included = group.assets.iter().filter(|a| a.include);

    BalanceSummary {
        current_total: group.current_total(),
        contribution_total: group.contribution_total,
        included_assets: included.clone().count(),
        total_score: included.clone().map(|a| a.score).sum(),
        total_final_contribution: included.map(|a| a.final_contribution).sum(),
    }
}
