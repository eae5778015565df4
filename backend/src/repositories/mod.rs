//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod meal;

pub use meal::{CreateFoodItem, CreateMealRecord, FoodItemRow, MealRecordRow, MealRepository};
