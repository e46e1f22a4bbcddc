//! String tables compiled into the binary.
use crate::catalog::Catalog;
use crate::error::LoadError;
use crate::table::StringTable;

pub const COMMON_STRINGS_JSON: &str = include_str!("../strings/common.json");
pub const FYTA_STRINGS_JSON: &str = include_str!("../strings/fyta.json");

/// Domain of the bundled plant-sensor integration.
pub const FYTA_DOMAIN: &str = "fyta";

/// Catalog with the shared table and the FYTA component table.
pub fn bundled_catalog() -> Result<Catalog, LoadError> {
    let common = StringTable::from_json_str(COMMON_STRINGS_JSON)?;
    let fyta = StringTable::from_json_str(FYTA_STRINGS_JSON)?;
    Ok(Catalog::new()
        .with_common(common)
        .with_component(FYTA_DOMAIN, fyta))
}
