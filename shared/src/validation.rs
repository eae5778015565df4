//! Input validation functions
//!
//! This module provides validation utilities shared by the request DTOs
//! (which also use the `validator` crate's derive macros) and the
//! backend services, which re-check their preconditions.

/// Smallest accepted history window, in days
pub const HISTORY_DAYS_MIN: i64 = 1;

/// Largest accepted history window, in days
pub const HISTORY_DAYS_MAX: i64 = 30;

/// Longest accepted food item name
pub const FOOD_NAME_MAX_LEN: usize = 100;

/// Validate the history window size (in days)
pub fn validate_history_days(days: i64) -> Result<(), String> {
    if days < HISTORY_DAYS_MIN {
        return Err(format!("days must be at least {}", HISTORY_DAYS_MIN));
    }
    if days > HISTORY_DAYS_MAX {
        return Err(format!("days must be at most {}", HISTORY_DAYS_MAX));
    }
    Ok(())
}

/// Validate a food item name
pub fn validate_food_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Food name cannot be empty".to_string());
    }
    if name.chars().count() > FOOD_NAME_MAX_LEN {
        return Err(format!(
            "Food name must be at most {} characters",
            FOOD_NAME_MAX_LEN
        ));
    }
    Ok(())
}
