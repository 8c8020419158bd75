use thiserror::Error;

/// Expected, recoverable failures of the assets groups use cases.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AssetsGroupError {
    /// The referenced group, or group and asset pair, does not exist.
    #[error("Assets group not found: {0}")]
    GroupNotFound(String),

    /// Another asset of the same group already uses the label.
    #[error("Asset label '{0}' is already taken in this group")]
    LabelAlreadyTaken(String),
}
