//! Tests for assets groups domain models.

use crate::assets_groups::{
    Asset, AssetUpdate, AssetsGroup, AssetsGroupUpdate, NewAsset, NewAssetsGroup,
};
use crate::errors::{Error, ValidationError};
use crate::repository::{Aggregate, Filter};

fn new_asset(label: &str, score: f64, previous: f64, current: f64, include: bool) -> NewAsset {
    NewAsset {
        label: label.to_string(),
        score,
        previous_value: previous,
        current_value: current,
        include,
    }
}

// ==================== Formula Tests ====================

#[test]
fn test_calculate_value_variation() {
    let asset = Asset::new(new_asset("test", 100.0, 100.0, 70.0, true), 100.0, 100.0);
    assert_eq!(asset.calculate_value_variation(), -0.3);
}

#[test]
fn test_value_variation_without_baseline_is_zero() {
    for current in [0.0, 70.0, 1_000_000.0, -5.0] {
        let asset = Asset::new(new_asset("test", 10.0, 0.0, current, true), 100.0, 0.0);
        assert_eq!(asset.calculate_value_variation(), 0.0);
        assert_eq!(asset.value_variation, 0.0);
    }
}

#[test]
fn test_calculate_percentage_from_total() {
    let total = 100.0;
    let asset = Asset::new(new_asset("test", 100.0, 100.0, 70.0, true), total, 100.0);

    assert_eq!(asset.calculate_percentage_from_total(total), 0.7);
    assert_eq!(asset.calculate_percentage_from_total(0.0), 0.0);
}

#[test]
fn test_calculate_final_contribution() {
    let total = 100.0;
    let contribution = 100.0;
    let asset = Asset::new(new_asset("test", 50.0, 100.0, 70.0, true), total, contribution);

    assert_eq!(asset.calculate_final_contribution(contribution, total), 30.0);
    assert_eq!(asset.final_contribution, 30.0);
}

#[test]
fn test_final_contribution_negative_when_over_target() {
    let asset = Asset::new(new_asset("test", 10.0, 100.0, 90.0, true), 100.0, 0.0);
    assert_eq!(asset.final_contribution, -80.0);
}

// ==================== Construction Tests ====================

#[test]
fn test_new_excluded_asset_keeps_zero_derived_fields() {
    let asset = Asset::new(new_asset("cash", 20.0, 100.0, 50.0, false), 500.0, 100.0);

    assert!(!asset.id.is_empty());
    assert_eq!(asset.value_variation, 0.0);
    assert_eq!(asset.percentage_from_total, 0.0);
    assert_eq!(asset.final_contribution, 0.0);
}

#[test]
fn test_new_assets_group_builds_every_asset() {
    let group = AssetsGroup::new(NewAssetsGroup {
        label: "retirement".to_string(),
        contribution_total: 0.0,
        assets: vec![
            new_asset("RF", 60.0, 3732.87, 3730.87, false),
            new_asset("Stocks", 10.0, 619.57, 519.32, true),
            new_asset("REITs", 30.0, 1220.44, 1500.0, true),
        ],
    });

    assert!(!group.id.is_empty());
    assert_eq!(group.assets.len(), 3);
    assert_eq!(group.version, 1);
    assert_eq!(group.created_at, group.updated_at);

    // Excluded assets do not count in the total
    assert!((group.current_total() - 2019.32).abs() < 1e-9);
    assert_eq!(group.assets[0].percentage_from_total, 0.0);
    assert!((group.assets[2].percentage_from_total - 1500.0 / 2019.32).abs() < 1e-12);

    // Every asset gets its own id
    assert_ne!(group.assets[1].id, group.assets[2].id);
}

#[test]
fn test_new_assets_group_input_total() {
    let input = NewAssetsGroup {
        label: "g".to_string(),
        contribution_total: 0.0,
        assets: vec![
            new_asset("a", 50.0, 0.0, 30.0, true),
            new_asset("b", 50.0, 0.0, 70.0, true),
            new_asset("c", 0.0, 0.0, 900.0, false),
        ],
    };
    assert_eq!(input.current_total(), 100.0);
}

// ==================== Update Tests ====================

#[test]
fn test_apply_update_only_overwrites_provided_fields() {
    let mut asset = Asset::new(new_asset("RF", 60.0, 100.0, 110.0, true), 110.0, 0.0);
    asset.apply_update(&AssetUpdate {
        current_value: Some(120.0),
        ..Default::default()
    });

    assert_eq!(asset.label, "RF");
    assert_eq!(asset.score, 60.0);
    assert_eq!(asset.previous_value, 100.0);
    assert_eq!(asset.current_value, 120.0);
    assert!(asset.include);
}

#[test]
fn test_apply_update_can_reset_to_zero() {
    let mut asset = Asset::new(new_asset("RF", 60.0, 100.0, 110.0, true), 110.0, 0.0);
    asset.apply_update(&AssetUpdate {
        score: Some(0.0),
        previous_value: Some(0.0),
        include: Some(false),
        ..Default::default()
    });

    assert_eq!(asset.score, 0.0);
    assert_eq!(asset.previous_value, 0.0);
    assert!(!asset.include);
}

#[test]
fn test_update_validation_rejects_blank_labels() {
    let update = AssetUpdate {
        label: Some("   ".to_string()),
        ..Default::default()
    };
    assert!(matches!(
        update.validate(),
        Err(Error::Validation(ValidationError::InvalidInput(_)))
    ));

    let update = AssetsGroupUpdate {
        label: Some(String::new()),
        contribution_total: Some(10.0),
    };
    assert!(update.validate().is_err());

    assert!(AssetUpdate::default().validate().is_ok());
    assert!(AssetsGroupUpdate::default().validate().is_ok());
}

#[test]
fn test_validation_rejects_non_finite_amounts() {
    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let update = AssetUpdate {
            current_value: Some(value),
            ..Default::default()
        };
        assert!(matches!(
            update.validate(),
            Err(Error::Validation(ValidationError::InvalidInput(_)))
        ));

        let update = AssetsGroupUpdate {
            contribution_total: Some(value),
            ..Default::default()
        };
        assert!(update.validate().is_err());

        assert!(new_asset("RF", value, 0.0, 10.0, true).validate().is_err());

        let new_group = NewAssetsGroup {
            label: "g".to_string(),
            contribution_total: 0.0,
            assets: vec![new_asset("RF", 50.0, value, 10.0, false)],
        };
        assert!(new_group.validate().is_err());
    }

    assert!(new_asset("RF", 50.0, 0.0, 10.0, true).validate().is_ok());
}

#[test]
fn test_group_validation_covers_derived_fields() {
    let mut group = AssetsGroup::new(NewAssetsGroup {
        label: "g".to_string(),
        contribution_total: 100.0,
        assets: vec![new_asset("RF", 50.0, 10.0, 10.0, true)],
    });
    assert!(group.validate().is_ok());

    group.assets[0].value_variation = f64::NAN;
    assert!(matches!(
        group.validate(),
        Err(Error::Validation(ValidationError::InvalidInput(_)))
    ));
}

#[test]
fn test_is_label_taken_ignores_the_asset_itself() {
    let group = AssetsGroup::new(NewAssetsGroup {
        label: "g".to_string(),
        contribution_total: 0.0,
        assets: vec![
            new_asset("RF", 50.0, 0.0, 10.0, true),
            new_asset("Stocks", 50.0, 0.0, 10.0, false),
        ],
    });
    let rf_id = group.assets[0].id.clone();
    let stocks_id = group.assets[1].id.clone();

    assert!(!group.is_label_taken("RF", &rf_id));
    // Uniqueness does not depend on the include flag
    assert!(group.is_label_taken("Stocks", &rf_id));
    assert!(group.is_label_taken("RF", &stocks_id));
    assert!(!group.is_label_taken("Gold", &rf_id));
}

// ==================== Aggregate / Serialization Tests ====================

#[test]
fn test_aggregate_filters_match_group() {
    let group = AssetsGroup::new(NewAssetsGroup {
        label: "g".to_string(),
        contribution_total: 0.0,
        assets: vec![new_asset("RF", 100.0, 0.0, 10.0, true)],
    });
    let asset_id = group.assets[0].id.clone();

    assert!(Filter::All.matches(&group));
    assert!(Filter::by_id(&group.id).matches(&group));
    assert!(!Filter::by_id("missing").matches(&group));
    assert!(Filter::by_id_and_version(&group.id, 1).matches(&group));
    assert!(!Filter::by_id_and_version(&group.id, 2).matches(&group));
    assert!(Filter::by_child_id(&group.id, &asset_id).matches(&group));
    assert!(!Filter::by_child_id(&group.id, "missing").matches(&group));
    assert!(group.owns(&asset_id));
}

#[test]
fn test_assets_group_serializes_camel_case() {
    let group = AssetsGroup::new(NewAssetsGroup {
        label: "g".to_string(),
        contribution_total: 25.0,
        assets: vec![new_asset("RF", 100.0, 0.0, 10.0, true)],
    });
    let json = serde_json::to_value(&group).unwrap();

    assert_eq!(json["contributionTotal"], 25.0);
    assert!(json[AssetsGroup::CHILDREN_FIELD].is_array());
    assert_eq!(json["assets"][0]["finalContribution"], 25.0);
    assert!(json["assets"][0]["percentageFromTotal"].is_number());

    let decoded: AssetsGroup = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, group);
}

#[test]
fn test_asset_update_deserializes_missing_fields_as_absent() {
    let update: AssetUpdate = serde_json::from_str(r#"{"currentValue": 0}"#).unwrap();

    assert_eq!(update.current_value, Some(0.0));
    assert!(update.label.is_none());
    assert!(update.score.is_none());
    assert!(update.include.is_none());
}
