//! Assets groups domain models.

use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::assets_groups_balancer::balance;
use crate::constants::{INITIAL_VERSION, SCORE_SCALE};
use crate::repository::Aggregate;
use crate::{errors::ValidationError, Error, Result};

/// A tracked instrument inside a group.
///
/// `value_variation`, `percentage_from_total` and `final_contribution` are
/// derived: they are recomputed on every balance pass while `include` is set,
/// and keep their last values otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub label: String,
    /// Target weight on a 0-100 scale
    pub score: f64,
    pub previous_value: f64,
    pub current_value: f64,
    pub value_variation: f64,
    pub percentage_from_total: f64,
    pub final_contribution: f64,
    pub include: bool,
}

impl Asset {
    /// Builds a new asset, computing its derived fields against the group
    /// context when it is included.
    pub fn new(new_asset: NewAsset, current_total: f64, contribution_total: f64) -> Self {
        let mut asset = Self {
            id: Uuid::new_v4().to_string(),
            label: new_asset.label,
            score: new_asset.score,
            previous_value: new_asset.previous_value,
            current_value: new_asset.current_value,
            include: new_asset.include,
            ..Default::default()
        };
        if asset.include {
            asset.recalculate(current_total, contribution_total);
        }
        asset
    }

    /// Relative change against the previous snapshot, 0 without a baseline.
    pub fn calculate_value_variation(&self) -> f64 {
        if self.previous_value == 0.0 {
            return 0.0;
        }
        (self.current_value - self.previous_value) / self.previous_value
    }

    pub fn calculate_percentage_from_total(&self, current_total: f64) -> f64 {
        if current_total == 0.0 {
            return 0.0;
        }
        self.current_value / current_total
    }

    /// Money to move into (positive) or out of (negative) the asset so that it
    /// reaches its target weight once the contribution is invested.
    pub fn calculate_final_contribution(&self, contribution_total: f64, current_total: f64) -> f64 {
        (current_total + contribution_total) * (self.score / SCORE_SCALE) - self.current_value
    }

    pub(crate) fn recalculate(&mut self, current_total: f64, contribution_total: f64) {
        self.value_variation = self.calculate_value_variation();
        self.percentage_from_total = self.calculate_percentage_from_total(current_total);
        self.final_contribution =
            self.calculate_final_contribution(contribution_total, current_total);
    }

    /// Overwrites every provided field of the update.
    pub fn apply_update(&mut self, update: &AssetUpdate) {
        if let Some(label) = &update.label {
            self.label = label.clone();
        }
        if let Some(score) = update.score {
            self.score = score;
        }
        if let Some(previous_value) = update.previous_value {
            self.previous_value = previous_value;
        }
        if let Some(current_value) = update.current_value {
            self.current_value = current_value;
        }
        if let Some(include) = update.include {
            self.include = include;
        }
    }
}

/// Aggregate root owning an ordered collection of assets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetsGroup {
    pub id: String,
    pub label: String,
    /// New money to distribute across the group at the next balance
    pub contribution_total: f64,
    pub assets: Vec<Asset>,
    pub version: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl AssetsGroup {
    /// Builds a new group with all its assets and balances it.
    pub fn new(new_group: NewAssetsGroup) -> Self {
        let current_total = new_group.current_total();
        let contribution_total = new_group.contribution_total;
        let assets = new_group
            .assets
            .into_iter()
            .map(|a| Asset::new(a, current_total, contribution_total))
            .collect();
        let now = Utc::now().naive_utc();

        let mut group = Self {
            id: Uuid::new_v4().to_string(),
            label: new_group.label,
            contribution_total,
            assets,
            version: INITIAL_VERSION,
            created_at: now,
            updated_at: now,
        };
        balance(&mut group);
        group
    }

    /// Sum of the current values of included assets.
    pub fn current_total(&self) -> f64 {
        self.assets
            .iter()
            .filter(|a| a.include)
            .map(|a| a.current_value)
            .sum()
    }

    pub fn find_asset(&self, asset_id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == asset_id)
    }

    pub fn asset_index(&self, asset_id: &str) -> Option<usize> {
        self.assets.iter().position(|a| a.id == asset_id)
    }

    /// Whether an asset other than `except_asset_id` already uses `label`.
    pub fn is_label_taken(&self, label: &str, except_asset_id: &str) -> bool {
        self.assets
            .iter()
            .any(|a| a.label == label && a.id != except_asset_id)
    }

    pub fn apply_update(&mut self, update: &AssetsGroupUpdate) {
        if let Some(label) = &update.label {
            self.label = label.clone();
        }
        if let Some(contribution_total) = update.contribution_total {
            self.contribution_total = contribution_total;
        }
    }
}

impl Aggregate for AssetsGroup {
    const CHILDREN_FIELD: &'static str = "assets";

    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn owns(&self, child_id: &str) -> bool {
        self.find_asset(child_id).is_some()
    }

    /// Every stored amount, derived ones included, must be finite.
    fn validate(&self) -> Result<()> {
        validate_amount(self.contribution_total, "contributionTotal")?;
        for asset in &self.assets {
            validate_amount(asset.score, "score")?;
            validate_amount(asset.previous_value, "previousValue")?;
            validate_amount(asset.current_value, "currentValue")?;
            validate_amount(asset.value_variation, "valueVariation")?;
            validate_amount(asset.percentage_from_total, "percentageFromTotal")?;
            validate_amount(asset.final_contribution, "finalContribution")?;
        }
        Ok(())
    }
}

/// Input model for creating a new asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    pub label: String,
    pub score: f64,
    pub previous_value: f64,
    pub current_value: f64,
    pub include: bool,
}

/// Input model for creating a new group together with its assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssetsGroup {
    pub label: String,
    pub contribution_total: f64,
    pub assets: Vec<NewAsset>,
}

impl NewAsset {
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.score, "score")?;
        validate_amount(self.previous_value, "previousValue")?;
        validate_amount(self.current_value, "currentValue")
    }
}

impl NewAssetsGroup {
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.contribution_total, "contributionTotal")?;
        self.assets.iter().try_for_each(NewAsset::validate)
    }

    /// Sum of the current values of the included asset specs.
    pub fn current_total(&self) -> f64 {
        self.assets
            .iter()
            .filter(|a| a.include)
            .map(|a| a.current_value)
            .sum()
    }
}

/// Input model for updating an asset.
///
/// `None` leaves the stored value untouched; `Some` overwrites it, zero and
/// `false` included.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AssetUpdate {
    pub label: Option<String>,
    pub score: Option<f64>,
    pub previous_value: Option<f64>,
    pub current_value: Option<f64>,
    pub include: Option<bool>,
}

impl AssetUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_label(self.label.as_deref(), "Asset label cannot be empty")?;
        validate_optional_amount(self.score, "score")?;
        validate_optional_amount(self.previous_value, "previousValue")?;
        validate_optional_amount(self.current_value, "currentValue")
    }
}

/// Input model for updating a group's own fields.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AssetsGroupUpdate {
    pub label: Option<String>,
    pub contribution_total: Option<f64>,
}

impl AssetsGroupUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_label(self.label.as_deref(), "Assets group label cannot be empty")?;
        validate_optional_amount(self.contribution_total, "contributionTotal")
    }
}

fn validate_label(label: Option<&str>, message: &str) -> Result<()> {
    match label {
        Some(label) if label.trim().is_empty() => Err(Error::Validation(
            ValidationError::InvalidInput(message.to_string()),
        )),
        _ => Ok(()),
    }
}

// JSON has no representation for NaN or infinity
fn validate_amount(value: f64, field: &str) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::Validation(ValidationError::InvalidInput(format!(
            "{} must be a finite number, got {}",
            field, value
        ))))
    }
}

fn validate_optional_amount(value: Option<f64>, field: &str) -> Result<()> {
    value.map_or(Ok(()), |v| validate_amount(v, field))
}
