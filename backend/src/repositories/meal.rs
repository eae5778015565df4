//! Meal repository - database operations for meal records and food items

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

/// Meal record from the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MealRecordRow {
    pub id: Uuid,
    pub meal_type: String,
    pub eaten_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub total_calories: Decimal,
    pub total_protein: Decimal,
    pub total_carbs: Decimal,
    pub total_fat: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Food item from the database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FoodItemRow {
    pub id: Uuid,
    pub meal_record_id: Uuid,
    pub name: String,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fat: Decimal,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a food item as part of a meal record
#[derive(Debug, Clone)]
pub struct CreateFoodItem {
    pub name: String,
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub calories: Decimal,
    pub protein: Decimal,
    pub carbs: Decimal,
    pub fat: Decimal,
}

/// Input for creating a meal record with its food items
#[derive(Debug, Clone)]
pub struct CreateMealRecord {
    pub meal_type: String,
    pub eaten_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub total_calories: Decimal,
    pub total_protein: Decimal,
    pub total_carbs: Decimal,
    pub total_fat: Decimal,
    pub food_items: Vec<CreateFoodItem>,
}

const MEAL_COLUMNS: &str = "id, meal_type, eaten_at, notes, total_calories, total_protein, \
                            total_carbs, total_fat, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, meal_record_id, name, quantity, unit, calories, protein, \
                            carbs, fat, sort_order, created_at";

/// Meal repository
pub struct MealRepository;

impl MealRepository {
    /// Create a meal record and its food items in a single transaction.
    ///
    /// Either the record and all of its items become visible together,
    /// or the transaction rolls back and nothing is persisted.
    pub async fn create(
        pool: &PgPool,
        input: CreateMealRecord,
    ) -> Result<(MealRecordRow, Vec<FoodItemRow>)> {
        let mut tx = pool.begin().await?;

        let meal = sqlx::query_as::<_, MealRecordRow>(&format!(
            r#"
            INSERT INTO meal_records (
                meal_type, eaten_at, notes,
                total_calories, total_protein, total_carbs, total_fat
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {MEAL_COLUMNS}
            "#,
        ))
        .bind(&input.meal_type)
        .bind(input.eaten_at)
        .bind(&input.notes)
        .bind(input.total_calories)
        .bind(input.total_protein)
        .bind(input.total_carbs)
        .bind(input.total_fat)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(input.food_items.len());
        for (idx, item) in input.food_items.iter().enumerate() {
            let row = sqlx::query_as::<_, FoodItemRow>(&format!(
                r#"
                INSERT INTO food_items (
                    meal_record_id, name, quantity, unit,
                    calories, protein, carbs, fat, sort_order
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING {ITEM_COLUMNS}
                "#,
            ))
            .bind(meal.id)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(&item.unit)
            .bind(item.calories)
            .bind(item.protein)
            .bind(item.carbs)
            .bind(item.fat)
            .bind(idx as i32)
            .fetch_one(&mut *tx)
            .await?;
            items.push(row);
        }

        tx.commit().await?;

        Ok((meal, items))
    }

    /// Meal records with `eaten_at` in `[start, end)`, newest first,
    /// each with its food items attached
    pub async fn list_for_day(
        pool: &PgPool,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<(MealRecordRow, Vec<FoodItemRow>)>> {
        let meals = sqlx::query_as::<_, MealRecordRow>(&format!(
            r#"
            SELECT {MEAL_COLUMNS}
            FROM meal_records
            WHERE eaten_at >= $1 AND eaten_at < $2
            ORDER BY eaten_at DESC
            "#,
        ))
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        Self::attach_items(pool, meals).await
    }

    /// Meal records with `eaten_at` in `[start, end]` (both bounds
    /// inclusive), newest first, each with its food items attached
    pub async fn list_between(
        pool: &PgPool,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<(MealRecordRow, Vec<FoodItemRow>)>> {
        let meals = sqlx::query_as::<_, MealRecordRow>(&format!(
            r#"
            SELECT {MEAL_COLUMNS}
            FROM meal_records
            WHERE eaten_at >= $1 AND eaten_at <= $2
            ORDER BY eaten_at DESC
            "#,
        ))
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        Self::attach_items(pool, meals).await
    }

    /// Delete a meal record by id; its food items follow through the
    /// cascading foreign key. Returns false if no such record existed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM meal_records WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Eager-load the food items for a batch of meal records with a single
    /// query, preserving the meal ordering and each meal's item order.
    async fn attach_items(
        pool: &PgPool,
        meals: Vec<MealRecordRow>,
    ) -> Result<Vec<(MealRecordRow, Vec<FoodItemRow>)>> {
        if meals.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = meals.iter().map(|meal| meal.id).collect();
        let rows = sqlx::query_as::<_, FoodItemRow>(&format!(
            r#"
            SELECT {ITEM_COLUMNS}
            FROM food_items
            WHERE meal_record_id = ANY($1)
            ORDER BY sort_order ASC
            "#,
        ))
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let mut by_meal: HashMap<Uuid, Vec<FoodItemRow>> = HashMap::new();
        for row in rows {
            by_meal.entry(row.meal_record_id).or_default().push(row);
        }

        Ok(meals
            .into_iter()
            .map(|meal| {
                let items = by_meal.remove(&meal.id).unwrap_or_default();
                (meal, items)
            })
            .collect())
    }
}
