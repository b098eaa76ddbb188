//! Entitlement check routes
//!
//! `check` and `gate` fail soft like the resolver: a bad plan string or SKU
//! is answered with "not allowed", never an error.

use achievingcoach_billing::{Entitlement, GateDecision, InvariantCheckSummary, LimitCheck};
use achievingcoach_shared::{LimitKey, PlanTier, Subscription};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    pub plan: Option<String>,
    pub feature: String,
}

#[derive(Debug, Serialize)]
pub struct CheckResponse {
    pub feature: String,
    pub allowed: bool,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub plan: Option<String>,
    pub limit: String,
}

#[derive(Debug, Serialize)]
pub struct LimitResponse {
    pub limit: LimitKey,
    /// Ceiling; `null` means unlimited
    pub value: Option<u64>,
    pub unlimited: bool,
}

#[derive(Debug, Deserialize)]
pub struct GateRequest {
    pub plan: Option<String>,
    pub feature: String,
}

#[derive(Debug, Deserialize)]
pub struct LimitCheckRequest {
    pub plan: Option<PlanTier>,
    pub limit: LimitKey,
    pub usage: u64,
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    #[serde(default)]
    pub subscription: Option<Subscription>,
}

pub async fn check_feature(
    State(state): State<AppState>,
    Query(query): Query<CheckQuery>,
) -> Json<CheckResponse> {
    let allowed = state
        .resolver()
        .has_feature_raw(query.plan.as_deref(), &query.feature);
    tracing::debug!(plan = ?query.plan, feature = %query.feature, allowed, "Feature check");

    Json(CheckResponse {
        feature: query.feature,
        allowed,
    })
}

pub async fn plan_limit(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<LimitResponse>> {
    let limit: LimitKey = query.limit.parse()?;
    let value = state
        .resolver()
        .get_plan_limit_raw(query.plan.as_deref(), limit);

    Ok(Json(LimitResponse {
        limit,
        value,
        unlimited: value.is_none(),
    }))
}

pub async fn gate(
    State(state): State<AppState>,
    Json(req): Json<GateRequest>,
) -> Json<GateDecision> {
    Json(state.gate.evaluate_raw(req.plan.as_deref(), &req.feature))
}

pub async fn limit_check(
    State(state): State<AppState>,
    Json(req): Json<LimitCheckRequest>,
) -> Json<LimitCheck> {
    Json(state.gate.check_limit(req.plan, req.limit, req.usage))
}

pub async fn resolve(
    State(state): State<AppState>,
    Json(req): Json<ResolveRequest>,
) -> Json<Entitlement> {
    let entitlement = state
        .resolver()
        .compute_entitlement(req.subscription.as_ref(), OffsetDateTime::now_utc());
    Json(entitlement)
}

pub async fn invariants(State(state): State<AppState>) -> Json<InvariantCheckSummary> {
    Json(state.invariants.as_ref().clone())
}
