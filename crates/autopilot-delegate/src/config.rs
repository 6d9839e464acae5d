//! Delegate configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use steward_autopilot::Config;

use crate::Error;

/// Default time since last leader contact before a server is unhealthy
const DEFAULT_LAST_CONTACT_THRESHOLD: Duration = Duration::from_millis(200);

/// Default number of log entries a server may trail by
const DEFAULT_MAX_TRAILING_LOGS: u64 = 250;

/// Default time a server must be healthy before promotion
const DEFAULT_SERVER_STABILIZATION_TIME: Duration = Duration::from_secs(10);

/// Operator-facing autopilot policy, as stored in durable cluster state.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    /// Remove dead servers when a replacement joins.
    pub cleanup_dead_servers: bool,

    /// Maximum time since last leader contact before a server is unhealthy.
    pub last_contact_threshold: Duration,

    /// Maximum number of log entries a server may trail the leader by.
    pub max_trailing_logs: u64,

    /// Minimum number of voters to keep when pruning.
    pub min_quorum: u32,

    /// Time a server must be healthy before it is promoted to voter.
    pub server_stabilization_time: Duration,

    /// Member tag holding a server's redundancy zone. Empty disables zones.
    pub redundancy_zone_tag: String,

    /// Disable staged upgrade migrations.
    pub disable_upgrade_migration: bool,

    /// Member tag holding a server's upgrade version. Empty means the build
    /// version is used.
    pub upgrade_version_tag: String,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            cleanup_dead_servers: true,
            last_contact_threshold: DEFAULT_LAST_CONTACT_THRESHOLD,
            max_trailing_logs: DEFAULT_MAX_TRAILING_LOGS,
            min_quorum: 0,
            server_stabilization_time: DEFAULT_SERVER_STABILIZATION_TIME,
            redundancy_zone_tag: String::new(),
            disable_upgrade_migration: false,
            upgrade_version_tag: String::new(),
        }
    }
}

impl AutopilotConfig {
    /// Converts to the policy the control loop consumes.
    #[must_use]
    pub fn to_autopilot_config(&self) -> Config {
        Config {
            cleanup_dead_servers: self.cleanup_dead_servers,
            last_contact_threshold: self.last_contact_threshold,
            max_trailing_logs: self.max_trailing_logs,
            min_quorum: self.min_quorum,
            server_stabilization_time: self.server_stabilization_time,
        }
    }
}

/// Configuration for `ServerDelegate`
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct DelegateConfig {
    /// Datacenter (region) of the local process. Wide-area member names are
    /// suffixed with it.
    pub datacenter: String,

    /// Policy used until an operator stores one.
    #[serde(default)]
    pub autopilot: AutopilotConfig,
}

impl DelegateConfig {
    /// Create a configuration for a datacenter with the default policy
    #[must_use]
    pub fn new(datacenter: impl Into<String>) -> Self {
        Self {
            datacenter: datacenter.into(),
            autopilot: AutopilotConfig::default(),
        }
    }

    /// Checks the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the datacenter is empty or contains a
    /// `.`, either of which would corrupt wide-area member names.
    pub fn validate(&self) -> Result<(), Error> {
        if self.datacenter.is_empty() {
            return Err(Error::Configuration("datacenter must not be empty".to_string()));
        }

        if self.datacenter.contains('.') {
            return Err(Error::Configuration(format!(
                "datacenter '{}' must not contain '.'",
                self.datacenter
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let config = AutopilotConfig::default().to_autopilot_config();

        assert!(config.cleanup_dead_servers);
        assert_eq!(config.last_contact_threshold, Duration::from_millis(200));
        assert_eq!(config.max_trailing_logs, 250);
        assert_eq!(config.min_quorum, 0);
        assert_eq!(config.server_stabilization_time, Duration::from_secs(10));
    }

    #[test]
    fn test_validate() {
        assert!(DelegateConfig::new("dc1").validate().is_ok());
        assert!(DelegateConfig::new("").validate().is_err());
        assert!(DelegateConfig::new("dc1.east").validate().is_err());
    }

    #[test]
    fn test_partial_policy_deserializes_with_defaults() {
        let json = r#"{"datacenter":"dc2","autopilot":{"min_quorum":3,"redundancy_zone_tag":"zone"}}"#;
        let config: DelegateConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.datacenter, "dc2");
        assert_eq!(config.autopilot.min_quorum, 3);
        assert_eq!(config.autopilot.redundancy_zone_tag, "zone");
        assert_eq!(config.autopilot.max_trailing_logs, 250);
        assert!(config.autopilot.cleanup_dead_servers);
    }
}
