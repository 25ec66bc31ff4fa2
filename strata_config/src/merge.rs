//! Priority merging of flattened configuration maps.

use crate::value::ConfigMap;

/// Merges flat maps ordered from highest to lowest priority.
///
/// The first map defining a key wins; later maps only contribute keys no
/// earlier map claimed. Merging is a flat-key overwrite with no deep merge of
/// composite values: a higher-priority source defining `database.host` leaves
/// a lower-priority source's `database.port` intact, because the two are
/// distinct flat keys.
///
/// [`crate::Manager::load`] feeds this engine with the incoming source as the
/// higher-priority layer, so repeated loads override earlier ones.
///
/// # Examples
///
/// ```
/// use strata_config::{ConfigMap, ConfigValue, merge};
///
/// let overrides: ConfigMap = [("port", ConfigValue::Int(9000))].into_iter().collect();
/// let defaults: ConfigMap = [
///     ("host", ConfigValue::from("localhost")),
///     ("port", ConfigValue::Int(5432)),
/// ]
/// .into_iter()
/// .collect();
///
/// let merged = merge([overrides, defaults]);
/// assert_eq!(merged.get("port"), Some(&ConfigValue::Int(9000)));
/// assert_eq!(merged.get("host"), Some(&ConfigValue::from("localhost")));
/// ```
#[must_use]
pub fn merge<I>(maps: I) -> ConfigMap
where
    I: IntoIterator<Item = ConfigMap>,
{
    let mut merged = ConfigMap::new();
    for map in maps {
        for (key, value) in map {
            merged.entries.entry(key).or_insert(value);
        }
    }
    merged
}
