//! Feature catalog routes

use achievingcoach_shared::{catalog, minimum_tier_for, FeatureCategory, FeatureDefinition, PlanTier};
use axum::{
    extract::{Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiResult;

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeatureDetail {
    #[serde(flatten)]
    pub definition: FeatureDefinition,
    /// Lowest plan that unlocks the feature
    pub minimum_plan: Option<PlanTier>,
}

/// List the catalog, optionally narrowed to one category
pub async fn list_features(
    Query(query): Query<CategoryQuery>,
) -> ApiResult<Json<Vec<FeatureDefinition>>> {
    let features = match query.category.as_deref() {
        Some(raw) => {
            let category: FeatureCategory = raw.parse()?;
            catalog::by_category(category).copied().collect()
        }
        None => catalog::all().to_vec(),
    };
    Ok(Json(features))
}

pub async fn get_feature(Path(sku): Path<String>) -> ApiResult<Json<FeatureDetail>> {
    let definition = catalog::definition(&sku)?;
    Ok(Json(FeatureDetail {
        definition: *definition,
        minimum_plan: minimum_tier_for(&sku),
    }))
}
