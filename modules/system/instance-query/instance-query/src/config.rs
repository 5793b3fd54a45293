//! Configuration for the instance query module.

use std::time::Duration;

use figment::Figment;
use serde::Deserialize;

/// Key under which the module reads its configuration.
pub const CONFIG_KEY: &str = "instance_query";

/// Module configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstanceQueryConfig {
    /// Database schema holding the projection tables, if any.
    pub schema: Option<String>,
    /// Instance projection table.
    pub instances_table: String,
    /// Domain-binding projection table.
    pub instance_domains_table: String,
    /// Upper bound for a single statement unless the request sets its own.
    #[serde(with = "humantime_serde")]
    pub query_timeout: Duration,
}

impl Default for InstanceQueryConfig {
    fn default() -> Self {
        Self {
            schema: None,
            instances_table: "instances".to_owned(),
            instance_domains_table: "instance_domains".to_owned(),
            query_timeout: Duration::from_secs(30),
        }
    }
}

impl InstanceQueryConfig {
    /// Extract the module section from a merged configuration.
    ///
    /// A missing section yields the defaults.
    ///
    /// # Errors
    /// Returns the figment error if the section exists but is malformed.
    pub fn from_figment(figment: &Figment) -> Result<Self, Box<figment::Error>> {
        if !figment.contains(CONFIG_KEY) {
            return Ok(Self::default());
        }
        figment.extract_inner(CONFIG_KEY).map_err(Box::new)
    }
}
