//! Meal service - business logic for recording meals and querying history

use crate::error::ApiError;
use crate::repositories::{CreateFoodItem, CreateMealRecord, FoodItemRow, MealRecordRow, MealRepository};
use chrono::{DateTime, Days, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use meal_journal_shared::models::MealType;
use meal_journal_shared::validation;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// One food item going into a meal record
#[derive(Debug, Clone)]
pub struct FoodItemInput {
    pub name: String,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fat: Decimal,
}

/// Meal record creation input
#[derive(Debug, Clone)]
pub struct CreateMealInput {
    pub meal_type: MealType,
    /// Consumption time; resolved to the current time at the moment of
    /// the call when absent
    pub eaten_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub food_items: Vec<FoodItemInput>,
}

/// Aggregate nutrition totals for one meal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealTotals {
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fat: Decimal,
}

/// A food item belonging to a persisted meal record
#[derive(Debug, Clone)]
pub struct FoodItem {
    pub id: Uuid,
    pub name: String,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fat: Decimal,
}

/// A persisted meal record with its food items attached
#[derive(Debug, Clone)]
pub struct MealRecord {
    pub id: Uuid,
    pub meal_type: String,
    pub eaten_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub total_calories: Decimal,
    pub total_protein: Decimal,
    pub total_carbs: Decimal,
    pub total_fat: Decimal,
    pub food_items: Vec<FoodItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sums each nutrient field independently across the given items and
/// rounds each total to one decimal place.
///
/// Rounding is `Decimal::round_dp`, which rounds half to even
/// (banker's rounding). An empty slice yields all-zero totals.
pub fn meal_totals(items: &[FoodItemInput]) -> MealTotals {
    let (calories, protein, carbs, fat) = items.iter().fold(
        (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        |(cal, pro, carb, fat), item| {
            (
                cal + item.calories,
                pro + item.protein,
                carb + item.carbs,
                fat + item.fat,
            )
        },
    );

    MealTotals {
        calories: calories.round_dp(1),
        protein: protein.round_dp(1),
        carbs: carbs.round_dp(1),
        fat: fat.round_dp(1),
    }
}

/// UTC bounds of the calendar day containing `now`, read in `now`'s
/// timezone: `[start of day, start of next day)`
pub fn day_bounds<Tz: TimeZone>(now: &DateTime<Tz>) -> (DateTime<Utc>, DateTime<Utc>) {
    let tz = now.timezone();
    let today = now.date_naive();
    (
        start_of_day(&tz, today),
        start_of_day(&tz, today + Days::new(1)),
    )
}

/// Start of `day` in `tz`, as a UTC instant.
///
/// Midnight can be doubled or skipped by a DST transition; the earliest
/// valid reading wins, stepping forward one hour when midnight itself
/// does not exist on the local clock.
fn start_of_day<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

/// UTC window covering the last `days` days: `[now - days, now]`,
/// upper bound inclusive
pub fn history_window(now: DateTime<Utc>, days: i64) -> (DateTime<Utc>, DateTime<Utc>) {
    (now - Duration::days(days), now)
}

/// Meal service
pub struct MealService;

impl MealService {
    /// Create a meal record with its food items.
    ///
    /// Totals are computed from the items once, here; they are never
    /// recomputed afterwards. The record and its items are persisted
    /// atomically.
    pub async fn create_meal(pool: &PgPool, input: CreateMealInput) -> Result<MealRecord, ApiError> {
        if input.food_items.is_empty() {
            return Err(ApiError::Validation(
                "A meal record requires at least one food item".to_string(),
            ));
        }

        for item in &input.food_items {
            validation::validate_food_name(&item.name).map_err(ApiError::Validation)?;
            if item.calories < Decimal::ZERO
                || item.protein < Decimal::ZERO
                || item.carbs < Decimal::ZERO
                || item.fat < Decimal::ZERO
            {
                return Err(ApiError::Validation(
                    "Nutrient values cannot be negative".to_string(),
                ));
            }
            if let Some(quantity) = item.quantity {
                if quantity < Decimal::ZERO {
                    return Err(ApiError::Validation("Quantity cannot be negative".to_string()));
                }
            }
        }

        let totals = meal_totals(&input.food_items);
        // each call resolves its own default; no shared "now"
        let eaten_at = input.eaten_at.unwrap_or_else(Utc::now);

        let create = CreateMealRecord {
            meal_type: input.meal_type.as_str().to_string(),
            eaten_at,
            notes: input.notes,
            total_calories: totals.calories,
            total_protein: totals.protein,
            total_carbs: totals.carbs,
            total_fat: totals.fat,
            food_items: input
                .food_items
                .into_iter()
                .map(|item| CreateFoodItem {
                    name: item.name,
                    quantity: item.quantity,
                    unit: item.unit,
                    calories: item.calories,
                    protein: item.protein,
                    carbs: item.carbs,
                    fat: item.fat,
                })
                .collect(),
        };

        let (meal, items) = MealRepository::create(pool, create)
            .await
            .map_err(ApiError::Internal)?;

        Ok(Self::assemble(meal, items))
    }

    /// Meal records eaten today (local calendar day), newest first
    pub async fn today(pool: &PgPool) -> Result<Vec<MealRecord>, ApiError> {
        let (start, end) = day_bounds(&Local::now());

        let rows = MealRepository::list_for_day(pool, start, end)
            .await
            .map_err(ApiError::Internal)?;

        Ok(rows
            .into_iter()
            .map(|(meal, items)| Self::assemble(meal, items))
            .collect())
    }

    /// Meal records eaten within the last `days` days, newest first.
    ///
    /// `days` must be in `[1, 30]`; the window's upper bound is the
    /// current instant, not the end of the current day.
    pub async fn history(pool: &PgPool, days: i64) -> Result<Vec<MealRecord>, ApiError> {
        validation::validate_history_days(days).map_err(ApiError::Validation)?;

        let (start, end) = history_window(Utc::now(), days);

        let rows = MealRepository::list_between(pool, start, end)
            .await
            .map_err(ApiError::Internal)?;

        Ok(rows
            .into_iter()
            .map(|(meal, items)| Self::assemble(meal, items))
            .collect())
    }

    fn assemble(meal: MealRecordRow, items: Vec<FoodItemRow>) -> MealRecord {
        MealRecord {
            id: meal.id,
            meal_type: meal.meal_type,
            eaten_at: meal.eaten_at,
            notes: meal.notes,
            total_calories: meal.total_calories,
            total_protein: meal.total_protein,
            total_carbs: meal.total_carbs,
            total_fat: meal.total_fat,
            food_items: items
                .into_iter()
                .map(|item| FoodItem {
                    id: item.id,
                    name: item.name,
                    quantity: item.quantity,
                    unit: item.unit,
                    calories: item.calories,
                    protein: item.protein,
                    carbs: item.carbs,
                    fat: item.fat,
                })
                .collect(),
            created_at: meal.created_at,
            updated_at: meal.updated_at,
        }
    }
}
