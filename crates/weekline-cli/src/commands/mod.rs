pub mod config;
pub mod gesture;
pub mod layout;

use std::path::Path;

use weekline_core::TimelineConfig;

/// Load the config from `path` if given, otherwise from the default location.
///
/// A `path` that does not exist yet yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<TimelineConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) if p.exists() => Ok(TimelineConfig::load_from(p)?),
        Some(_) => Ok(TimelineConfig::default()),
        None => Ok(TimelineConfig::load_or_default()),
    }
}
