use thiserror::Error;

/// Error enum for `pdsstac-transform`.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// `Transform.Records` was asked to process a collection for which no
    /// dataset node exists, or could be synthesized, in the built tree.
    #[error("no STAC collection node resolved for {0}")]
    NoCollectionNode(String),

    /// [pdsstac_core::Error]
    #[error(transparent)]
    Core(#[from] pdsstac_core::Error),

    /// [pdsstac_models::Error]
    #[error(transparent)]
    Models(#[from] pdsstac_models::Error),

    /// [pdsstac_pds3::Error]
    #[error(transparent)]
    Pds3(#[from] pdsstac_pds3::Error),

    /// [pdsstac_storage::Error]
    #[error(transparent)]
    Storage(#[from] pdsstac_storage::Error),

    /// [pdsstac_extract::Error]
    #[error(transparent)]
    Extract(#[from] pdsstac_extract::Error),

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// [std::io::Error]
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
