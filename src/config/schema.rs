use serde::{Deserialize, Serialize};

use crate::scoring::PointsPolicy;

/// Contents of `config.yaml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Default log filter, e.g. `info` or `crs_check=debug`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,

    /// Replaces the built-in points policy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<PointsPolicy>,
}

impl Config {
    /// The policy in effect: the configured one, or the built-in epoch.
    pub fn effective_policy(&self) -> PointsPolicy {
        self.policy.clone().unwrap_or_default()
    }
}
