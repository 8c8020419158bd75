//! Assets groups module - domain models, balancing engine, services, and traits.

mod assets_groups_balancer;
mod assets_groups_errors;
mod assets_groups_model;
mod assets_groups_service;
mod assets_groups_traits;

#[cfg(test)]
mod assets_groups_model_tests;


// Re-export the public interface
pub use assets_groups_balancer::{balance, summarize, BalanceSummary};
pub use assets_groups_errors::AssetsGroupError;
pub use assets_groups_model::{
    Asset, AssetUpdate, AssetsGroup, AssetsGroupUpdate, NewAsset, NewAssetsGroup,
};
pub use assets_groups_service::AssetsBalancerService;
pub use assets_groups_traits::AssetsBalancerServiceTrait;
