use crate::games::GameId;
use crate::locations::RegionCode;
use crate::platforms::{PlatformCategory, PlatformCode};
use itertools::Itertools;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashSet;
use url::Url;

/// A viewing option exactly as the rights catalog stores it. Nothing here has been checked
/// against the platform or region catalogs yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewingOptionRecord {
    pub game_id: GameId,
    pub platform: PlatformCode,
    /// Denormalized copy of the platform's category. Absent in older records.
    #[serde(default)]
    pub category: Option<String>,
    pub provider: String,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// `None` when the catalog has no coverage record for this option at all.
    #[serde(default)]
    pub blackout_regions: Option<Vec<RegionCode>>,
}

/// Where a platform is restricted for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coverage {
    Recorded(HashSet<RegionCode>),
    Unrecorded,
}

impl Coverage {
    pub fn blacks_out(&self, region: &RegionCode) -> bool {
        match self {
            Coverage::Recorded(blackout_regions) => blackout_regions.contains(region),
            Coverage::Unrecorded => false,
        }
    }
}

impl Serialize for Coverage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Coverage::Recorded(regions) => serializer.collect_seq(regions.iter().sorted()),
            Coverage::Unrecorded => serializer.serialize_none(),
        }
    }
}

/// A validated viewing option. Field names on the wire follow the rights catalog contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewingOption {
    pub game_id: GameId,
    #[serde(rename = "platform")]
    pub platform_code: PlatformCode,
    pub category: PlatformCategory,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Url>,
    pub blackout_regions: Coverage,
}

impl ViewingOption {
    pub fn is_blacked_out_in(&self, region: &RegionCode) -> bool {
        self.blackout_regions.blacks_out(region)
    }
}
