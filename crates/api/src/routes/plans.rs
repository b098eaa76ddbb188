//! Plan browsing routes

use achievingcoach_shared::{
    catalog, features_for, plans, FeatureCategory, FeatureDefinition, FeatureSku, PlanLimits,
    PlanTier,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;

use crate::{error::ApiResult, routes::features::CategoryQuery, state::AppState};

#[derive(Debug, Serialize)]
pub struct PlanSummary {
    pub tier: PlanTier,
    pub name: &'static str,
    pub limits: PlanLimits,
    pub feature_count: usize,
    /// Features this tier adds over the one below it
    pub additions: Vec<FeatureSku>,
}

#[derive(Debug, Serialize)]
pub struct UpgradePreview {
    pub from: PlanTier,
    pub to: PlanTier,
    pub features: Vec<FeatureDefinition>,
}

pub async fn list_plans() -> Json<Vec<PlanSummary>> {
    let summaries = PlanTier::ALL
        .into_iter()
        .map(|tier| PlanSummary {
            tier,
            name: tier.display_name(),
            limits: PlanLimits::for_tier(tier),
            feature_count: features_for(tier).len(),
            additions: plans::additions_for(tier).to_vec(),
        })
        .collect();
    Json(summaries)
}

/// Features a tier unlocks, optionally within one category
pub async fn plan_features(
    State(state): State<AppState>,
    Path(tier): Path<String>,
    Query(query): Query<CategoryQuery>,
) -> ApiResult<Json<Vec<FeatureDefinition>>> {
    let tier: PlanTier = tier.parse()?;

    let features = match query.category.as_deref() {
        Some(raw) => {
            let category: FeatureCategory = raw.parse()?;
            state
                .resolver()
                .get_features_by_category(tier, category)
                .into_iter()
                .copied()
                .collect()
        }
        None => features_for(tier)
            .iter()
            .map(|sku| *catalog::definition_or_placeholder(sku.as_str()))
            .collect(),
    };

    Ok(Json(features))
}

pub async fn upgrade_preview(
    State(state): State<AppState>,
    Path((from, to)): Path<(String, String)>,
) -> ApiResult<Json<UpgradePreview>> {
    let from: PlanTier = from.parse()?;
    let to: PlanTier = to.parse()?;

    let features = state
        .resolver()
        .get_missing_features(from, to)
        .into_iter()
        .map(|sku| *catalog::definition_or_placeholder(sku.as_str()))
        .collect();

    Ok(Json(UpgradePreview { from, to, features }))
}
