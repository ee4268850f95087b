use anyhow::Context;
use axum::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::error::MealError;
use crate::nutrition::normalize::NutrientProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    /// Validates caller input; anything outside the fixed set is rejected.
    pub fn parse(s: &str) -> Result<Self, MealError> {
        match s {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => Err(MealError::InvalidMealType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub confidence: f64,
    pub nutrition: NutrientProfile,
}

impl FoodItem {
    /// The recognizer emits no per-item score, so every recognized item
    /// carries this fixed value. A known approximation, not a measurement.
    pub const PLACEHOLDER_CONFIDENCE: f64 = 0.95;

    pub fn recognized(name: String, nutrition: NutrientProfile) -> Self {
        Self {
            name,
            confidence: Self::PLACEHOLDER_CONFIDENCE,
            nutrition,
        }
    }
}

/// Immutable once persisted; `meal_date` always equals the calendar date
/// of `ts` (both UTC), kept redundantly for range queries.
#[derive(Debug, Clone)]
pub struct MealRecord {
    pub id: Uuid,
    pub user_id: String,
    pub meal_type: MealType,
    pub ts: OffsetDateTime,
    pub meal_date: Date,
    pub image_key: String,
    pub items: Vec<FoodItem>,
}

#[derive(Debug, Clone)]
pub struct NewMeal {
    pub user_id: String,
    pub meal_type: MealType,
    pub ts: OffsetDateTime,
    pub meal_date: Date,
    pub image_key: String,
    pub items: Vec<FoodItem>,
}

impl NewMeal {
    pub fn new(
        user_id: impl Into<String>,
        meal_type: MealType,
        ts: OffsetDateTime,
        image_key: String,
        items: Vec<FoodItem>,
    ) -> Self {
        let ts = ts.to_offset(time::UtcOffset::UTC);
        Self {
            user_id: user_id.into(),
            meal_type,
            meal_date: ts.date(),
            ts,
            image_key,
            items,
        }
    }
}

/// Append-only meal persistence. Queries are half of the contract: every
/// `list_between` result is scoped to one user, bounded inclusively on
/// both ends and sorted ascending by `ts`.
#[async_trait]
pub trait MealStore: Send + Sync {
    async fn insert(&self, meal: NewMeal) -> Result<MealRecord, MealError>;
    async fn list_between(
        &self,
        user_id: &str,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<MealRecord>, MealError>;
}

#[derive(Clone)]
pub struct PgMealStore {
    db: PgPool,
}

impl PgMealStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[derive(Debug, FromRow)]
struct MealRow {
    id: Uuid,
    user_id: String,
    meal_type: String,
    ts: OffsetDateTime,
    meal_date: Date,
    image_key: String,
    items: sqlx::types::Json<Vec<FoodItem>>,
}

impl TryFrom<MealRow> for MealRecord {
    type Error = MealError;

    fn try_from(row: MealRow) -> Result<Self, MealError> {
        Ok(MealRecord {
            id: row.id,
            user_id: row.user_id,
            meal_type: MealType::parse(&row.meal_type)?,
            ts: row.ts,
            meal_date: row.meal_date,
            image_key: row.image_key,
            items: row.items.0,
        })
    }
}

#[async_trait]
impl MealStore for PgMealStore {
    async fn insert(&self, meal: NewMeal) -> Result<MealRecord, MealError> {
        let row = sqlx::query_as::<_, MealRow>(
            r#"
            INSERT INTO meals (id, user_id, meal_type, ts, meal_date, image_key, items)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, meal_type, ts, meal_date, image_key, items
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&meal.user_id)
        .bind(meal.meal_type.as_str())
        .bind(meal.ts)
        .bind(meal.meal_date)
        .bind(&meal.image_key)
        .bind(sqlx::types::Json(&meal.items))
        .fetch_one(&self.db)
        .await
        .context("insert meal")?;
        row.try_into()
    }

    async fn list_between(
        &self,
        user_id: &str,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<MealRecord>, MealError> {
        let rows = sqlx::query_as::<_, MealRow>(
            r#"
            SELECT id, user_id, meal_type, ts, meal_date, image_key, items
            FROM meals
            WHERE user_id = $1 AND ts >= $2 AND ts <= $3
            ORDER BY ts ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await
        .context("list meals in range")?;
        rows.into_iter().map(MealRecord::try_from).collect()
    }
}
