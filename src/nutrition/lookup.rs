use std::time::Duration;

use anyhow::Context;
use axum::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::Nutrient;
use crate::config::UsdaConfig;
use crate::error::MealError;

/// External nutrient lookup boundary: food name in, unordered
/// `(name, value)` pairs out, `None` when the upstream knows nothing
/// about the food.
#[async_trait]
pub trait NutrientLookup: Send + Sync {
    async fn lookup(&self, food_name: &str) -> anyhow::Result<Option<Vec<Nutrient>>>;
}

/// USDA FoodData Central search client. One request per food name,
/// bounded by the client-level timeout; retries belong to the caller.
pub struct UsdaLookup {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl UsdaLookup {
    pub fn new(cfg: &UsdaConfig, timeout_secs: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("build usda http client")?;
        Ok(Self {
            http,
            api_key: cfg.api_key.clone(),
            base_url: cfg.base_url.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<FoodHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodHit {
    #[serde(default)]
    food_nutrients: Vec<RawNutrient>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNutrient {
    nutrient_name: String,
    #[serde(default)]
    value: f64,
}

#[async_trait]
impl NutrientLookup for UsdaLookup {
    async fn lookup(&self, food_name: &str) -> anyhow::Result<Option<Vec<Nutrient>>> {
        let url = format!("{}/foods/search", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", food_name),
                ("dataType", "Survey (FNDDS)"),
                ("pageSize", "1"),
            ])
            .send()
            .await
            .context("usda search request")?
            .error_for_status()
            .context("usda search status")?;

        // A response that is not the documented search shape is a contract
        // violation upstream, not something we can recover per item.
        let body: SearchResponse = resp
            .json()
            .await
            .map_err(|e| MealError::InvalidPayload(e.to_string()))?;

        let Some(hit) = body.foods.into_iter().next() else {
            debug!(food = food_name, "no usda match");
            return Ok(None);
        };
        let nutrients = hit
            .food_nutrients
            .into_iter()
            .map(|n| Nutrient::new(n.nutrient_name, n.value))
            .collect();
        Ok(Some(nutrients))
    }
}
