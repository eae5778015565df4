//! API request and response types

use crate::models::MealType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One food item in a meal creation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FoodItemRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    /// Amount eaten, in `unit`
    #[serde(default)]
    #[validate(range(min = 0.0, message = "quantity cannot be negative"))]
    pub quantity: Option<f64>,
    #[serde(default)]
    #[validate(length(max = 20, message = "unit must be at most 20 characters"))]
    pub unit: Option<String>,
    #[validate(range(min = 0.0, max = 50000.0, message = "calories must be a non-negative number"))]
    pub calories: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 50000.0, message = "protein must be a non-negative number"))]
    pub protein: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 50000.0, message = "carbs must be a non-negative number"))]
    pub carbs: f64,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 50000.0, message = "fat must be a non-negative number"))]
    pub fat: f64,
}

/// Meal record creation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateMealRequest {
    pub meal_type: MealType,
    /// Consumption time; defaults to the time of the request when absent
    #[serde(default)]
    pub eaten_at: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(max = 255, message = "notes must be at most 255 characters"))]
    pub notes: Option<String>,
    #[validate(length(min = 1, message = "food_items must not be empty"), nested)]
    pub food_items: Vec<FoodItemRequest>,
}

/// Query parameters for the meal history endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_history_days")]
    pub days: i64,
}

fn default_history_days() -> i64 {
    7
}

/// One food item in a meal record response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodItemResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// A complete meal record with its food items and nutrition totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRecordResponse {
    pub id: String,
    pub meal_type: String,
    pub eaten_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub total_calories: f64,
    pub total_protein: f64,
    pub total_carbs: f64,
    pub total_fat: f64,
    pub food_items: Vec<FoodItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
