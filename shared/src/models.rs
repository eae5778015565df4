//! Data models for the Meal Journal application

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The eating occasion a meal record belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    /// All valid meal types, in canonical order
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    /// The lowercase string form used in storage and on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => Err(format!("Invalid meal type: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_type_round_trip() {
        for meal_type in MealType::ALL {
            let parsed: MealType = meal_type.as_str().parse().unwrap();
            assert_eq!(parsed, meal_type);
        }
    }

    #[test]
    fn test_meal_type_rejects_unknown() {
        assert!("brunch".parse::<MealType>().is_err());
        assert!("Breakfast".parse::<MealType>().is_err());
        assert!("".parse::<MealType>().is_err());
    }

    #[test]
    fn test_meal_type_serde_lowercase() {
        let json = serde_json::to_string(&MealType::Lunch).unwrap();
        assert_eq!(json, "\"lunch\"");

        let parsed: MealType = serde_json::from_str("\"snack\"").unwrap();
        assert_eq!(parsed, MealType::Snack);

        assert!(serde_json::from_str::<MealType>("\"supper\"").is_err());
    }
}
