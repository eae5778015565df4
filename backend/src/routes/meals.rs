//! Meal API routes

use crate::error::ApiError;
use crate::services::meal::{CreateMealInput, FoodItemInput, MealRecord, MealService};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use meal_journal_shared::types::{
    CreateMealRequest, FoodItemResponse, HistoryQuery, MealRecordResponse,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use validator::Validate;

/// Create meal routes
pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/record", post(create_meal_record))
        .route("/today", get(get_today_meals))
        .route("/history", get(get_meal_history))
}

/// Helper to convert Decimal to f64
fn dec_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Helper to convert f64 to Decimal
fn f64_to_dec(f: f64) -> Decimal {
    Decimal::try_from(f).unwrap_or(Decimal::ZERO)
}

/// POST /api/v1/meals/record - Create a meal record with its food items
async fn create_meal_record(
    State(state): State<AppState>,
    Json(req): Json<CreateMealRequest>,
) -> Result<(StatusCode, Json<MealRecordResponse>), ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let input = CreateMealInput {
        meal_type: req.meal_type,
        eaten_at: req.eaten_at,
        notes: req.notes,
        food_items: req
            .food_items
            .into_iter()
            .map(|item| FoodItemInput {
                name: item.name,
                quantity: item.quantity.map(f64_to_dec),
                unit: item.unit,
                calories: f64_to_dec(item.calories),
                protein: f64_to_dec(item.protein),
                carbs: f64_to_dec(item.carbs),
                fat: f64_to_dec(item.fat),
            })
            .collect(),
    };

    let meal = MealService::create_meal(state.db(), input).await?;

    Ok((StatusCode::CREATED, Json(to_response(meal))))
}

/// GET /api/v1/meals/today - Meal records eaten today, newest first
async fn get_today_meals(
    State(state): State<AppState>,
) -> Result<Json<Vec<MealRecordResponse>>, ApiError> {
    let meals = MealService::today(state.db()).await?;

    Ok(Json(meals.into_iter().map(to_response).collect()))
}

/// GET /api/v1/meals/history?days=N - Meal records from the last N days
async fn get_meal_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<MealRecordResponse>>, ApiError> {
    let meals = MealService::history(state.db(), query.days).await?;

    Ok(Json(meals.into_iter().map(to_response).collect()))
}

fn to_response(meal: MealRecord) -> MealRecordResponse {
    MealRecordResponse {
        id: meal.id.to_string(),
        meal_type: meal.meal_type,
        eaten_at: meal.eaten_at,
        notes: meal.notes,
        total_calories: dec_to_f64(meal.total_calories),
        total_protein: dec_to_f64(meal.total_protein),
        total_carbs: dec_to_f64(meal.total_carbs),
        total_fat: dec_to_f64(meal.total_fat),
        food_items: meal
            .food_items
            .into_iter()
            .map(|item| FoodItemResponse {
                id: item.id.to_string(),
                name: item.name,
                quantity: item.quantity.map(dec_to_f64),
                unit: item.unit,
                calories: dec_to_f64(item.calories),
                protein: dec_to_f64(item.protein),
                carbs: dec_to_f64(item.carbs),
                fat: dec_to_f64(item.fat),
            })
            .collect(),
        created_at: meal.created_at,
        updated_at: meal.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_conversion_round_trip() {
        let value = Decimal::new(3505, 1); // 350.5
        assert_eq!(dec_to_f64(value), 350.5);
        assert_eq!(f64_to_dec(350.5), value);
    }

    #[test]
    fn test_f64_to_dec_handles_non_finite() {
        assert_eq!(f64_to_dec(f64::NAN), Decimal::ZERO);
        assert_eq!(f64_to_dec(f64::INFINITY), Decimal::ZERO);
    }
}
