use axum::{
    extract::{DefaultBodyLimit, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use base64ct::{Base64, Encoding};
use bytes::Bytes;
use tracing::instrument;

use super::dto::{CreateMealRequest, CreatedMealResponse, DayQuery, ImageQuery, MealResponse, MonthQuery};
use super::{ranges, services};
use crate::error::MealError;
use crate::state::AppState;
use crate::storage::mime_from_key;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals/daily", get(daily_meals))
        .route("/meals/weekly", get(weekly_meals))
        .route("/meals/monthly", get(monthly_meals))
        .route("/images", get(get_image))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create_meal))
        .layer(DefaultBodyLimit::max(20 * 1024 * 1024)) // 20MB
}

#[instrument(skip(state, body), fields(user_id = %body.user_id, meal_type = %body.meal_type))]
pub async fn create_meal(
    State(state): State<AppState>,
    Json(body): Json<CreateMealRequest>,
) -> Result<(StatusCode, Json<CreatedMealResponse>), MealError> {
    let image = Base64::decode_vec(&body.image_b64)
        .map(Bytes::from)
        .map_err(|_| MealError::InvalidPayload("image_b64 is not valid base64".into()))?;
    let content_type = body.content_type.as_deref().unwrap_or("image/jpeg");

    let out = services::create_meal(
        &state,
        &body.user_id,
        &body.meal_type,
        image,
        content_type,
        body.timestamp,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedMealResponse {
            meal: out.meal.into(),
            warnings: out.warnings,
        }),
    ))
}

#[instrument(skip(state))]
pub async fn daily_meals(
    State(state): State<AppState>,
    Query(q): Query<DayQuery>,
) -> Result<Json<Vec<MealResponse>>, MealError> {
    let date = q.date.as_deref().map(ranges::parse_date).transpose()?;
    let meals = services::daily_meals(&state, &q.user_id, date).await?;
    Ok(Json(meals.into_iter().map(MealResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn weekly_meals(
    State(state): State<AppState>,
    Query(q): Query<DayQuery>,
) -> Result<Json<Vec<MealResponse>>, MealError> {
    let date = q.date.as_deref().map(ranges::parse_date).transpose()?;
    let meals = services::weekly_meals(&state, &q.user_id, date).await?;
    Ok(Json(meals.into_iter().map(MealResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn monthly_meals(
    State(state): State<AppState>,
    Query(q): Query<MonthQuery>,
) -> Result<Json<Vec<MealResponse>>, MealError> {
    let meals = services::monthly_meals(&state, &q.user_id, q.year, q.month).await?;
    Ok(Json(meals.into_iter().map(MealResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_image(
    State(state): State<AppState>,
    Query(q): Query<ImageQuery>,
) -> Result<impl IntoResponse, MealError> {
    let bytes = state.blobs.get(&q.key).await?;
    Ok(([(header::CONTENT_TYPE, mime_from_key(&q.key))], bytes))
}
