use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use std::sync::Arc;

use super::assets_groups_balancer::{balance, summarize};
use super::assets_groups_errors::AssetsGroupError;
use super::assets_groups_model::{
    Asset, AssetUpdate, AssetsGroup, AssetsGroupUpdate, NewAsset, NewAssetsGroup,
};
use super::assets_groups_traits::AssetsBalancerServiceTrait;
use crate::errors::{Error, Result};
use crate::repository::{Aggregate, Filter, RepositoryTrait};

/// Service orchestrating the assets groups use cases.
pub struct AssetsBalancerService {
    repository: Arc<dyn RepositoryTrait<AssetsGroup>>,
}

impl AssetsBalancerService {
    pub fn new(repository: Arc<dyn RepositoryTrait<AssetsGroup>>) -> Self {
        Self { repository }
    }

    fn load_group(&self, filter: &Filter, group_id: &str) -> Result<AssetsGroup> {
        self.repository
            .get_first(filter)?
            .ok_or_else(|| AssetsGroupError::GroupNotFound(group_id.to_string()).into())
    }

    /// Rebalances the group and replaces the stored copy, guarded by the
    /// version the group was loaded with.
    async fn save_group(&self, mut group: AssetsGroup) -> Result<AssetsGroup> {
        balance(&mut group);
        // Finite inputs can still overflow once balanced
        group.validate()?;

        let loaded_version = group.version;
        group.version = loaded_version + 1;
        group.updated_at = Utc::now().naive_utc();

        let matched = self
            .repository
            .replace(
                &Filter::by_id_and_version(&group.id, loaded_version),
                group.clone(),
            )
            .await?;

        if matched == 0 {
            warn!(
                "Assets group {} changed since version {}, update rejected",
                group.id, loaded_version
            );
            return Err(Error::ConcurrentModification(format!(
                "assets group {} is no longer at version {}",
                group.id, loaded_version
            )));
        }

        debug!("Balanced assets group {}: {:?}", group.id, summarize(&group));
        Ok(group)
    }
}

#[async_trait]
impl AssetsBalancerServiceTrait for AssetsBalancerService {
    fn get_assets_groups(&self) -> Result<Vec<AssetsGroup>> {
        self.repository.get_all(&Filter::All)
    }

    fn get_assets_groups_page(&self, skip: usize, take: usize) -> Result<Vec<AssetsGroup>> {
        self.repository.get_all_skip_take(&Filter::All, skip, take)
    }

    fn get_assets_group(&self, group_id: &str) -> Result<Option<AssetsGroup>> {
        self.repository.get_first(&Filter::by_id(group_id))
    }

    async fn create_assets_group(&self, new_group: NewAssetsGroup) -> Result<AssetsGroup> {
        new_group.validate()?;
        let group = AssetsGroup::new(new_group);
        group.validate()?;
        info!(
            "Creating assets group {} with {} assets",
            group.id,
            group.assets.len()
        );
        self.repository.insert(group).await
    }

    async fn create_asset(&self, group_id: &str, new_asset: NewAsset) -> Result<AssetsGroup> {
        new_asset.validate()?;
        let mut group = self.load_group(&Filter::by_id(group_id), group_id)?;

        let mut current_total = group.current_total();
        if new_asset.include {
            current_total += new_asset.current_value;
        }
        let asset = Asset::new(new_asset, current_total, group.contribution_total);
        debug!("Adding asset {} to assets group {}", asset.id, group_id);
        group.assets.push(asset);

        self.save_group(group).await
    }

    async fn update_assets_group(
        &self,
        group_id: &str,
        update: AssetsGroupUpdate,
    ) -> Result<AssetsGroup> {
        update.validate()?;
        let mut group = self.load_group(&Filter::by_id(group_id), group_id)?;

        group.apply_update(&update);
        self.save_group(group).await
    }

    async fn update_asset(
        &self,
        group_id: &str,
        asset_id: &str,
        update: AssetUpdate,
    ) -> Result<AssetsGroup> {
        update.validate()?;
        let mut group = self.load_group(&Filter::by_child_id(group_id, asset_id), group_id)?;

        if let Some(label) = &update.label {
            if group.is_label_taken(label, asset_id) {
                warn!(
                    "Rejected update of asset {}: label '{}' is taken in group {}",
                    asset_id, label, group_id
                );
                return Err(AssetsGroupError::LabelAlreadyTaken(label.clone()).into());
            }
        }

        let idx = group
            .asset_index(asset_id)
            .ok_or_else(|| AssetsGroupError::GroupNotFound(group_id.to_string()))?;
        group.assets[idx].apply_update(&update);

        self.save_group(group).await
    }

    async fn delete_asset(&self, group_id: &str, asset_id: &str) -> Result<AssetsGroup> {
        let mut group = self.load_group(&Filter::by_child_id(group_id, asset_id), group_id)?;

        let idx = group
            .asset_index(asset_id)
            .ok_or_else(|| AssetsGroupError::GroupNotFound(group_id.to_string()))?;
        group.assets.remove(idx);
        debug!("Removed asset {} from assets group {}", asset_id, group_id);

        self.save_group(group).await
    }

    async fn delete_assets_group(&self, group_id: &str) -> Result<()> {
        let filter = Filter::by_id(group_id);
        self.load_group(&filter, group_id)?;

        let deleted = self.repository.delete_all(&filter).await?;
        info!("Deleted assets group {} ({} document(s))", group_id, deleted);
        Ok(())
    }
}
