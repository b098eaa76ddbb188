//! Entitlement Invariants Module
//!
//! Provides runnable consistency checks for the entitlement tables.
//! These can be run at startup, in CI, or after any edit to the catalog or
//! plan lists to ensure the tables are in a valid state.
//!
//! ## Design Principles
//!
//! 1. **Executable**: Each invariant is a real check over the tables in use
//! 2. **Explanatory**: Violations include enough context to debug
//! 3. **Non-destructive**: Checks only read, never write
//! 4. **Complete**: Covers every rule the gating model depends on

use std::collections::{HashMap, HashSet};

use achievingcoach_shared::{
    catalog, features_for, FeatureDefinition, FeatureSku, LimitKey, PlanLimits, PlanTier,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Result of running a single invariant check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvariantViolation {
    /// Which invariant was violated
    pub invariant: String,
    /// SKU(s) affected
    pub skus: Vec<String>,
    /// Tier(s) affected
    pub tiers: Vec<PlanTier>,
    /// Human-readable description of the violation
    pub description: String,
    /// Additional context for debugging
    pub context: serde_json::Value,
    /// Severity level
    pub severity: ViolationSeverity,
}

/// Severity of an invariant violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationSeverity {
    /// Critical - gates may grant or deny the wrong thing
    Critical,
    /// High - upgrade paths are inconsistent
    High,
    /// Medium - display or grouping is wrong
    Medium,
    /// Low - minor inconsistency, informational
    Low,
}

impl std::fmt::Display for ViolationSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationSeverity::Critical => write!(f, "CRITICAL"),
            ViolationSeverity::High => write!(f, "HIGH"),
            ViolationSeverity::Medium => write!(f, "MEDIUM"),
            ViolationSeverity::Low => write!(f, "LOW"),
        }
    }
}

/// Summary of all invariant checks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvariantCheckSummary {
    /// When the check was run
    #[serde(with = "time::serde::rfc3339")]
    pub checked_at: OffsetDateTime,
    /// Total number of checks run
    pub checks_run: usize,
    /// Number of checks that passed
    pub checks_passed: usize,
    /// Number of checks that failed
    pub checks_failed: usize,
    /// List of all violations found
    pub violations: Vec<InvariantViolation>,
    /// Overall health status
    pub healthy: bool,
}

/// One tier's row in the tables under check
#[derive(Debug, Clone)]
pub struct TierTable {
    pub tier: PlanTier,
    pub features: Vec<FeatureSku>,
    pub limits: PlanLimits,
}

/// The tables the checker runs over
#[derive(Debug, Clone)]
pub struct EntitlementTables {
    pub catalog: Vec<FeatureDefinition>,
    pub tiers: Vec<TierTable>,
}

impl EntitlementTables {
    /// The compiled-in tables
    pub fn builtin() -> Self {
        Self {
            catalog: catalog::all().to_vec(),
            tiers: PlanTier::ALL
                .into_iter()
                .map(|tier| TierTable {
                    tier,
                    features: features_for(tier).iter().collect(),
                    limits: PlanLimits::for_tier(tier),
                })
                .collect(),
        }
    }

    /// Tier rows sorted lowest first
    fn ordered_tiers(&self) -> Vec<&TierTable> {
        let mut tiers: Vec<&TierTable> = self.tiers.iter().collect();
        tiers.sort_by_key(|t| t.tier);
        tiers
    }
}

const CHECKS_RUN: usize = 7;

/// Service for running entitlement invariant checks
pub struct InvariantChecker {
    tables: EntitlementTables,
}

impl InvariantChecker {
    pub fn new(tables: EntitlementTables) -> Self {
        Self { tables }
    }

    /// Checker over the compiled-in tables
    pub fn builtin() -> Self {
        Self::new(EntitlementTables::builtin())
    }

    /// Run all invariant checks and return summary
    pub fn run_all_checks(&self) -> InvariantCheckSummary {
        let now = OffsetDateTime::now_utc();
        let mut violations = Vec::new();

        // Run all checks
        violations.extend(self.check_unique_skus());
        violations.extend(self.check_plan_skus_defined());
        violations.extend(self.check_sku_namespaces());
        violations.extend(self.check_tier_monotonic());
        violations.extend(self.check_limits_positive());
        violations.extend(self.check_limits_monotonic());
        violations.extend(self.check_catalog_reachable());

        let checks_failed = violations
            .iter()
            .map(|v| &v.invariant)
            .collect::<HashSet<_>>()
            .len();
        let checks_passed = CHECKS_RUN - checks_failed;

        for violation in &violations {
            tracing::warn!(
                invariant = %violation.invariant,
                severity = %violation.severity,
                skus = ?violation.skus,
                "{}",
                violation.description
            );
        }

        InvariantCheckSummary {
            checked_at: now,
            checks_run: CHECKS_RUN,
            checks_passed,
            checks_failed,
            healthy: violations.is_empty(),
            violations,
        }
    }

    /// Invariant 1: Exactly one definition per SKU
    ///
    /// Duplicate definitions make display metadata depend on lookup order.
    fn check_unique_skus(&self) -> Vec<InvariantViolation> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for def in &self.tables.catalog {
            *counts.entry(def.sku.as_str()).or_default() += 1;
        }

        let mut duplicates: Vec<_> = counts.into_iter().filter(|(_, n)| *n > 1).collect();
        duplicates.sort();

        duplicates
            .into_iter()
            .map(|(sku, count)| InvariantViolation {
                invariant: "unique_skus".to_string(),
                skus: vec![sku.to_string()],
                tiers: vec![],
                description: format!("SKU {} is defined {} times (expected 1)", sku, count),
                context: serde_json::json!({ "definition_count": count }),
                severity: ViolationSeverity::Medium,
            })
            .collect()
    }

    /// Invariant 2: Every SKU a tier grants has a catalog definition
    fn check_plan_skus_defined(&self) -> Vec<InvariantViolation> {
        let defined: HashSet<&str> = self.tables.catalog.iter().map(|d| d.sku.as_str()).collect();

        let mut missing: HashMap<&str, Vec<PlanTier>> = HashMap::new();
        for row in self.tables.ordered_tiers() {
            for sku in &row.features {
                if !defined.contains(sku.as_str()) {
                    missing.entry(sku.as_str()).or_default().push(row.tier);
                }
            }
        }

        let mut missing: Vec<_> = missing.into_iter().collect();
        missing.sort();

        missing
            .into_iter()
            .map(|(sku, tiers)| InvariantViolation {
                invariant: "plan_skus_defined".to_string(),
                skus: vec![sku.to_string()],
                description: format!("SKU {} is granted by a plan but missing from the catalog", sku),
                context: serde_json::json!({ "granted_by": tiers }),
                tiers,
                severity: ViolationSeverity::High,
            })
            .collect()
    }

    /// Invariant 3: SKUs are `<category>.<capability>` with a matching prefix
    fn check_sku_namespaces(&self) -> Vec<InvariantViolation> {
        self.tables
            .catalog
            .iter()
            .filter_map(|def| {
                let namespace = def.sku.namespace();
                if namespace == Some(def.category.as_str()) {
                    return None;
                }
                Some(InvariantViolation {
                    invariant: "sku_namespaced".to_string(),
                    skus: vec![def.sku.to_string()],
                    tiers: vec![],
                    description: format!(
                        "SKU {} does not match its category {}",
                        def.sku, def.category
                    ),
                    context: serde_json::json!({
                        "namespace": namespace,
                        "category": def.category,
                    }),
                    severity: ViolationSeverity::Medium,
                })
            })
            .collect()
    }

    /// Invariant 4: A higher tier grants everything a lower tier grants
    ///
    /// A violation means upgrading would take a feature away.
    fn check_tier_monotonic(&self) -> Vec<InvariantViolation> {
        let tiers = self.tables.ordered_tiers();
        let mut violations = Vec::new();

        for pair in tiers.windows(2) {
            let (lower, higher) = (pair[0], pair[1]);
            let granted: HashSet<&str> = higher.features.iter().map(|s| s.as_str()).collect();
            let lost: Vec<String> = lower
                .features
                .iter()
                .filter(|sku| !granted.contains(sku.as_str()))
                .map(|sku| sku.to_string())
                .collect();

            if !lost.is_empty() {
                violations.push(InvariantViolation {
                    invariant: "tier_monotonic".to_string(),
                    description: format!(
                        "{} lacks {} feature(s) that {} grants",
                        higher.tier,
                        lost.len(),
                        lower.tier
                    ),
                    context: serde_json::json!({
                        "lower_tier": lower.tier,
                        "higher_tier": higher.tier,
                    }),
                    skus: lost,
                    tiers: vec![lower.tier, higher.tier],
                    severity: ViolationSeverity::Critical,
                });
            }
        }

        violations
    }

    /// Invariant 5: Finite limits are positive
    ///
    /// A zero ceiling is indistinguishable from "no plan"; use a missing
    /// feature instead.
    fn check_limits_positive(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();
        for row in self.tables.ordered_tiers() {
            for key in LimitKey::ALL {
                if row.limits.get(key) == Some(0) {
                    violations.push(InvariantViolation {
                        invariant: "limits_positive".to_string(),
                        skus: vec![],
                        tiers: vec![row.tier],
                        description: format!("{} has a zero {} limit", row.tier, key),
                        context: serde_json::json!({ "limit": key }),
                        severity: ViolationSeverity::High,
                    });
                }
            }
        }
        violations
    }

    /// Invariant 6: A higher tier never has a lower ceiling
    fn check_limits_monotonic(&self) -> Vec<InvariantViolation> {
        let tiers = self.tables.ordered_tiers();
        let mut violations = Vec::new();

        for pair in tiers.windows(2) {
            let (lower, higher) = (pair[0], pair[1]);
            for key in LimitKey::ALL {
                let (low, high) = (lower.limits.get(key), higher.limits.get(key));
                let shrinks = match (low, high) {
                    (None, Some(_)) => true,
                    (Some(l), Some(h)) => l > h,
                    _ => false,
                };
                if shrinks {
                    violations.push(InvariantViolation {
                        invariant: "limits_monotonic".to_string(),
                        skus: vec![],
                        tiers: vec![lower.tier, higher.tier],
                        description: format!(
                            "{} {} limit is below {}'s",
                            higher.tier, key, lower.tier
                        ),
                        context: serde_json::json!({
                            "limit": key,
                            "lower_value": low,
                            "higher_value": high,
                        }),
                        severity: ViolationSeverity::High,
                    });
                }
            }
        }

        violations
    }

    /// Invariant 7: Every catalog feature is sold on some tier
    fn check_catalog_reachable(&self) -> Vec<InvariantViolation> {
        let granted: HashSet<&str> = self
            .tables
            .tiers
            .iter()
            .flat_map(|row| row.features.iter().map(|s| s.as_str()))
            .collect();

        self.tables
            .catalog
            .iter()
            .filter(|def| !granted.contains(def.sku.as_str()))
            .map(|def| InvariantViolation {
                invariant: "catalog_reachable".to_string(),
                skus: vec![def.sku.to_string()],
                tiers: vec![],
                description: format!("{} is in the catalog but no tier grants it", def.sku),
                context: serde_json::json!({ "category": def.category }),
                severity: ViolationSeverity::Low,
            })
            .collect()
    }
}
