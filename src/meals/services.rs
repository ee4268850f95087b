use std::time::Duration;

use bytes::Bytes;
use time::{Date, OffsetDateTime};
use tracing::{debug, warn};

use super::ranges;
use super::repo::{FoodItem, MealRecord, MealType, NewMeal};
use crate::error::{ItemResolutionWarning, MealError};
use crate::nutrition::normalize::normalize;
use crate::recognition::parse_food_lines;
use crate::state::AppState;

#[derive(Debug)]
pub struct CreateMealOutcome {
    pub meal: MealRecord,
    /// One entry per recognized item that was dropped because its
    /// nutrient profile could not be resolved. Observability only.
    pub warnings: Vec<ItemResolutionWarning>,
}

/// Builds and persists one meal record: store the image, recognize food
/// names, resolve nutrients per item, insert. Validation happens before
/// any I/O; a recognition failure after the blob write leaves an orphaned
/// blob behind, which is accepted and not cleaned up here.
pub async fn create_meal(
    st: &AppState,
    user_id: &str,
    meal_type: &str,
    image: Bytes,
    content_type: &str,
    at: Option<OffsetDateTime>,
) -> Result<CreateMealOutcome, MealError> {
    let meal_type = MealType::parse(meal_type)?;
    let deadline = Duration::from_secs(st.config.request_timeout_secs);

    let image_key = tokio::time::timeout(deadline, st.blobs.put(image.clone(), content_type))
        .await
        .map_err(|e| MealError::ImageStoreFailed(anyhow::Error::from(e)))??;
    debug!(%image_key, "meal image stored");

    let text = tokio::time::timeout(
        deadline,
        st.recognizer.describe_foods(image, content_type),
    )
    .await
    .map_err(|e| MealError::RecognitionFailed(anyhow::Error::from(e)))??;
    let names = parse_food_lines(&text);
    debug!(count = names.len(), "foods recognized");

    let mut items = Vec::with_capacity(names.len());
    let mut warnings = Vec::new();
    for name in names {
        // One unresolved ingredient never fails the whole meal; the item
        // is dropped and the caller sees a warning.
        match st.lookup.lookup(&name).await {
            Ok(Some(nutrients)) => items.push(FoodItem::recognized(name, normalize(&nutrients))),
            Ok(None) => {
                warnings.push(ItemResolutionWarning {
                    item: name,
                    reason: "no nutrient data found".into(),
                });
            }
            Err(e) => {
                warn!(item = %name, error = %e, "nutrient lookup failed, dropping item");
                warnings.push(ItemResolutionWarning {
                    item: name,
                    reason: format!("lookup failed: {e}"),
                });
            }
        }
    }

    let ts = at.unwrap_or_else(OffsetDateTime::now_utc);
    let meal = st
        .meals
        .insert(NewMeal::new(user_id, meal_type, ts, image_key, items))
        .await?;
    Ok(CreateMealOutcome { meal, warnings })
}

pub async fn daily_meals(
    st: &AppState,
    user_id: &str,
    date: Option<Date>,
) -> Result<Vec<MealRecord>, MealError> {
    let date = date.unwrap_or_else(|| OffsetDateTime::now_utc().date());
    let (start, end) = ranges::day_range(date);
    st.meals.list_between(user_id, start, end).await
}

pub async fn weekly_meals(
    st: &AppState,
    user_id: &str,
    date: Option<Date>,
) -> Result<Vec<MealRecord>, MealError> {
    let date = date.unwrap_or_else(|| OffsetDateTime::now_utc().date());
    let (start, end) = ranges::week_range(date);
    st.meals.list_between(user_id, start, end).await
}

pub async fn monthly_meals(
    st: &AppState,
    user_id: &str,
    year: Option<i32>,
    month: Option<u8>,
) -> Result<Vec<MealRecord>, MealError> {
    let now = OffsetDateTime::now_utc();
    let year = year.unwrap_or_else(|| now.year());
    let month = month.unwrap_or_else(|| u8::from(now.month()));
    let (start, end) = ranges::month_range(year, month)?;
    st.meals.list_between(user_id, start, end).await
}
