//! Prometheus metrics for the campaign service.
//!
//! Exposes counters and gauges covering campaign lifecycle, voting, and
//! whitelist activity.  The [`ServiceMetrics`] struct owns a dedicated
//! [`Registry`] that a host can encode into the Prometheus text exposition
//! format.

use prometheus::{
    register_int_counter_with_registry, register_int_gauge_with_registry, IntCounter, IntGauge,
    Opts, Registry,
};

/// Central collection of all service-level Prometheus metrics.
pub struct ServiceMetrics {
    /// The Prometheus registry that owns every metric below.
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Total number of campaigns created.
    pub campaigns_created: IntCounter,
    /// Total number of campaigns explicitly stopped by their admin.
    pub campaigns_stopped: IntCounter,
    /// Total number of vote operations applied (casts and replacements).
    pub votes_cast: IntCounter,
    /// Total voter-set entries retracted (replacements, unvotes, and
    /// whitelist cascades).
    pub votes_retracted: IntCounter,
    /// Total identities removed from whitelists.
    pub whitelist_removals: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Current number of active (not stopped, not expired) campaigns.
    pub active_campaigns: IntGauge,
}

impl ServiceMetrics {
    /// Create a fresh set of metrics, all registered under a new
    /// [`Registry`].
    pub fn new() -> Self {
        let registry = Registry::new();

        let campaigns_created = register_int_counter_with_registry!(
            Opts::new("tally_campaigns_created_total", "Total campaigns created"),
            registry
        )
        .expect("failed to register campaigns_created counter");

        let campaigns_stopped = register_int_counter_with_registry!(
            Opts::new(
                "tally_campaigns_stopped_total",
                "Total campaigns explicitly stopped"
            ),
            registry
        )
        .expect("failed to register campaigns_stopped counter");

        let votes_cast = register_int_counter_with_registry!(
            Opts::new("tally_votes_cast_total", "Total vote operations applied"),
            registry
        )
        .expect("failed to register votes_cast counter");

        let votes_retracted = register_int_counter_with_registry!(
            Opts::new(
                "tally_votes_retracted_total",
                "Total voter-set entries retracted"
            ),
            registry
        )
        .expect("failed to register votes_retracted counter");

        let whitelist_removals = register_int_counter_with_registry!(
            Opts::new(
                "tally_whitelist_removals_total",
                "Total identities removed from whitelists"
            ),
            registry
        )
        .expect("failed to register whitelist_removals counter");

        let active_campaigns = register_int_gauge_with_registry!(
            Opts::new(
                "tally_active_campaigns",
                "Current number of active campaigns"
            ),
            registry
        )
        .expect("failed to register active_campaigns gauge");

        Self {
            registry,
            campaigns_created,
            campaigns_stopped,
            votes_cast,
            votes_retracted,
            whitelist_removals,
            active_campaigns,
        }
    }
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_register_and_count() {
        let metrics = ServiceMetrics::new();
        metrics.campaigns_created.inc();
        metrics.votes_cast.inc_by(3);
        metrics.active_campaigns.set(2);
        assert_eq!(metrics.campaigns_created.get(), 1);
        assert_eq!(metrics.votes_cast.get(), 3);
        assert_eq!(metrics.active_campaigns.get(), 2);
        assert!(!metrics.registry.gather().is_empty());
    }
}
