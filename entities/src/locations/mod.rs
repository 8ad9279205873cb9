use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use shared_kernel::string_key;

lazy_static! {
    static ref ZIP_PATTERN: Regex = Regex::new(r"^[0-9]{5}$").expect("ZIP pattern is valid");
}

string_key!(RegionCode);
string_key!(ZipCodeValue);

/// A broadcast market. ZIP codes map many-to-one onto regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub code: RegionCode,
    pub description: String,
    /// Opaque GeoJSON passed through to map renderers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZipCode {
    pub code: ZipCodeValue,
    /// `None` means no market has been assigned to this ZIP.
    #[serde(default)]
    pub region_code: Option<RegionCode>,
    pub latitude: f64,
    pub longitude: f64,
}

/// The market a viewer was placed in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "region", rename_all = "snake_case")]
pub enum RegionAssignment {
    Resolved(Region),
    Unresolved,
}

impl RegionAssignment {
    pub fn code(&self) -> Option<&RegionCode> {
        match self {
            RegionAssignment::Resolved(region) => Some(&region.code),
            RegionAssignment::Unresolved => None,
        }
    }
}

/// Only checks the shape of the input: exactly five ASCII digits.
pub fn is_well_formed_zip(zip: &str) -> bool {
    ZIP_PATTERN.is_match(zip)
}
