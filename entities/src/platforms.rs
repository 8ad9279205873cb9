use serde::{Deserialize, Serialize};
use shared_kernel::string_key;
use strum::{Display, EnumIter, EnumString};

string_key!(PlatformCode);

/// Broadcast tier of a platform. Variant order is the display order of grouped results.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlatformCategory {
    LocalTv,
    NationalTv,
    Streaming,
    Radio,
}

impl PlatformCategory {
    /// Streaming and radio options are the only ones that may carry a direct link.
    pub fn links_directly(&self) -> bool {
        match self {
            PlatformCategory::Streaming | PlatformCategory::Radio => true,
            PlatformCategory::LocalTv | PlatformCategory::NationalTv => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub code: PlatformCode,
    pub name: String,
    pub category: PlatformCategory,
}
