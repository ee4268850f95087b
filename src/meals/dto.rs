use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo::{FoodItem, MealRecord, MealType};
use crate::error::ItemResolutionWarning;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    pub user_id: String,
    pub meal_type: String,
    pub image_b64: String,
    #[serde(default)]
    pub content_type: Option<String>,
    /// Defaults to now (UTC) when omitted.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize)]
pub struct MealResponse {
    pub id: Uuid,
    pub user_id: String,
    pub meal_type: MealType,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    #[serde(with = "iso_date")]
    pub date: Date,
    pub image_ref: String,
    pub items: Vec<FoodItem>,
}

impl From<MealRecord> for MealResponse {
    fn from(m: MealRecord) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            meal_type: m.meal_type,
            timestamp: m.ts,
            date: m.meal_date,
            image_ref: m.image_key,
            items: m.items,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CreatedMealResponse {
    #[serde(flatten)]
    pub meal: MealResponse,
    pub warnings: Vec<ItemResolutionWarning>,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub user_id: String,
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub user_id: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub key: String,
}
