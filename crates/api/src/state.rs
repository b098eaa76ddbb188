//! Application state

use std::sync::Arc;

use achievingcoach_billing::{
    EntitlementResolver, FeatureGate, InvariantCheckSummary, InvariantChecker,
};

use crate::config::Config;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub gate: FeatureGate,
    /// Invariant results from startup; the tables are static so this never changes
    pub invariants: Arc<InvariantCheckSummary>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let resolver = EntitlementResolver::new(config.entitlements);

        let invariants = InvariantChecker::builtin().run_all_checks();
        if invariants.healthy {
            tracing::info!(
                checks = invariants.checks_run,
                "Entitlement tables passed all invariant checks"
            );
        } else {
            tracing::error!(
                failed = invariants.checks_failed,
                violations = invariants.violations.len(),
                "Entitlement tables failed invariant checks"
            );
        }

        tracing::info!(
            fallback_tier = ?config.entitlements.fallback_tier,
            self_hosted = config.entitlements.self_hosted,
            "Entitlement resolver configured"
        );

        Self {
            config,
            gate: FeatureGate::new(resolver),
            invariants: Arc::new(invariants),
        }
    }

    pub fn resolver(&self) -> &EntitlementResolver {
        self.gate.resolver()
    }
}
