use entities::locations::RegionCode;
use entities::viewing_options::ViewingOption;

/// Whether `option` may be shown to a viewer in `region`.
///
/// A viewer without a region (`None`) is never blacked out. Otherwise the option is available
/// unless the region is listed in its blackout set.
pub fn is_available(option: &ViewingOption, region: Option<&RegionCode>) -> bool {
    match region {
        None => true,
        Some(region) => !option.is_blacked_out_in(region),
    }
}
