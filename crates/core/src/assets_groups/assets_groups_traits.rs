use async_trait::async_trait;

use super::assets_groups_model::{
    AssetUpdate, AssetsGroup, AssetsGroupUpdate, NewAsset, NewAssetsGroup,
};
use crate::errors::Result;

/// Trait defining the contract for assets balancer use cases.
///
/// Every mutation is a single read-modify-write against the repository: the
/// group is loaded, mutated, rebalanced and replaced as a whole.
#[async_trait]
pub trait AssetsBalancerServiceTrait: Send + Sync {
    fn get_assets_groups(&self) -> Result<Vec<AssetsGroup>>;

    fn get_assets_groups_page(&self, skip: usize, take: usize) -> Result<Vec<AssetsGroup>>;

    /// Retrieves a group by ID, `None` when it does not exist.
    fn get_assets_group(&self, group_id: &str) -> Result<Option<AssetsGroup>>;

    async fn create_assets_group(&self, new_group: NewAssetsGroup) -> Result<AssetsGroup>;

    /// Appends an asset to an existing group.
    async fn create_asset(&self, group_id: &str, new_asset: NewAsset) -> Result<AssetsGroup>;

    async fn update_assets_group(
        &self,
        group_id: &str,
        update: AssetsGroupUpdate,
    ) -> Result<AssetsGroup>;

    /// Overwrites the provided fields of an asset.
    ///
    /// Fails with `LabelAlreadyTaken` when the new label belongs to another
    /// asset of the same group.
    async fn update_asset(
        &self,
        group_id: &str,
        asset_id: &str,
        update: AssetUpdate,
    ) -> Result<AssetsGroup>;

    async fn delete_asset(&self, group_id: &str, asset_id: &str) -> Result<AssetsGroup>;

    /// Deletes a group and all its assets.
    async fn delete_assets_group(&self, group_id: &str) -> Result<()>;
}
