//! Prometheus gauges for cluster health

use prometheus::{IntGauge, Registry, register_int_gauge_with_registry};
use steward_autopilot::State;

/// Cluster health gauges
#[derive(Clone)]
pub struct AutopilotMetrics {
    /// Voter failures the cluster can sustain
    failure_tolerance: IntGauge,

    /// 1 when every voter is healthy, 0 otherwise
    healthy: IntGauge,
}

impl AutopilotMetrics {
    /// Registers the gauges with `registry`.
    ///
    /// # Errors
    ///
    /// Fails if gauges with the same names are already registered.
    pub fn new(registry: &Registry) -> Result<Self, prometheus::Error> {
        let failure_tolerance = register_int_gauge_with_registry!(
            "autopilot_failure_tolerance",
            "Number of voting servers the cluster can lose while continuing to function",
            registry
        )?;

        let healthy = register_int_gauge_with_registry!(
            "autopilot_healthy",
            "Overall health of the servers (1 = healthy, 0 = unhealthy)",
            registry
        )?;

        Ok(Self {
            failure_tolerance,
            healthy,
        })
    }

    /// Sets both gauges from a health state.
    pub fn record(&self, state: &State) {
        self.failure_tolerance.set(i64::from(state.failure_tolerance));
        self.healthy.set(i64::from(state.healthy));
    }

    /// Current failure tolerance gauge value
    #[must_use]
    pub fn failure_tolerance(&self) -> i64 {
        self.failure_tolerance.get()
    }

    /// Current healthy gauge value
    #[must_use]
    pub fn healthy(&self) -> i64 {
        self.healthy.get()
    }
}

impl std::fmt::Debug for AutopilotMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutopilotMetrics")
            .field("failure_tolerance", &self.failure_tolerance.get())
            .field("healthy", &self.healthy.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record() {
        let registry = Registry::new();
        let metrics = AutopilotMetrics::new(&registry).unwrap();

        metrics.record(&State {
            healthy: true,
            failure_tolerance: 2,
            ..State::default()
        });
        assert_eq!(metrics.failure_tolerance(), 2);
        assert_eq!(metrics.healthy(), 1);

        metrics.record(&State {
            healthy: false,
            failure_tolerance: 0,
            ..State::default()
        });
        assert_eq!(metrics.failure_tolerance(), 0);
        assert_eq!(metrics.healthy(), 0);

        assert_eq!(registry.gather().len(), 2);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let registry = Registry::new();
        AutopilotMetrics::new(&registry).unwrap();

        assert!(AutopilotMetrics::new(&registry).is_err());
    }
}
