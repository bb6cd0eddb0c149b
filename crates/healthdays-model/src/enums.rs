//! Categorical predictors derived from the survey answers.
//!
//! Each category has a label (used in labelled output and reports) and a
//! numeric code (its position in declaration order, used in the coded CSV and
//! XPT output).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Generation bucket derived from the five-year age group.
///
/// Only age groups 1 through 10 (ages 18 to 69) map to a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Generation {
    /// Age groups 1-3 (18-34).
    Millennial,
    /// Age groups 4-6 (35-49).
    GenerationX,
    /// Age groups 7-10 (50-69).
    BabyBoomer,
}

impl Generation {
    pub const ALL: [Generation; 3] = [
        Generation::Millennial,
        Generation::GenerationX,
        Generation::BabyBoomer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Generation::Millennial => "Millennial",
            Generation::GenerationX => "GenerationX",
            Generation::BabyBoomer => "BabyBoomer",
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Generation::Millennial => 0,
            Generation::GenerationX => 1,
            Generation::BabyBoomer => 2,
        }
    }

    /// Maps an age group code to its generation, `None` outside 1..=10.
    pub fn from_age_group(age_group: u16) -> Option<Self> {
        match age_group {
            1..=3 => Some(Generation::Millennial),
            4..=6 => Some(Generation::GenerationX),
            7..=10 => Some(Generation::BabyBoomer),
            _ => None,
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Generation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        match normalized.as_str() {
            "MILLENNIAL" => Ok(Generation::Millennial),
            "GENERATIONX" | "GENERATION X" | "GENX" => Ok(Generation::GenerationX),
            "BABYBOOMER" | "BABY BOOMER" => Ok(Generation::BabyBoomer),
            _ => Err(format!("Unknown generation: {s}")),
        }
    }
}

/// Drinking level from estimated weekly drinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DrinkingCategory {
    /// No drinks in a typical week.
    None,
    /// 1 to 8 drinks a week.
    Moderate,
    /// 9 or more drinks a week.
    Heavy,
}

impl DrinkingCategory {
    pub const ALL: [DrinkingCategory; 3] = [
        DrinkingCategory::None,
        DrinkingCategory::Moderate,
        DrinkingCategory::Heavy,
    ];

    /// Weekly drinks at which drinking counts as heavy.
    pub const HEAVY_THRESHOLD: u32 = 9;

    pub fn as_str(&self) -> &'static str {
        match self {
            DrinkingCategory::None => "None",
            DrinkingCategory::Moderate => "Moderate",
            DrinkingCategory::Heavy => "Heavy",
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            DrinkingCategory::None => 0,
            DrinkingCategory::Moderate => 1,
            DrinkingCategory::Heavy => 2,
        }
    }

    /// Buckets an estimated number of drinks per week.
    pub fn from_weekly_drinks(weekly: u32) -> Self {
        match weekly {
            0 => DrinkingCategory::None,
            w if w < Self::HEAVY_THRESHOLD => DrinkingCategory::Moderate,
            _ => DrinkingCategory::Heavy,
        }
    }
}

impl fmt::Display for DrinkingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DrinkingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        match normalized.as_str() {
            "NONE" => Ok(DrinkingCategory::None),
            "MODERATE" => Ok(DrinkingCategory::Moderate),
            "HEAVY" => Ok(DrinkingCategory::Heavy),
            _ => Err(format!("Unknown drinking category: {s}")),
        }
    }
}

/// Smoking level on an ascending intensity scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SmokingCategory {
    None,
    SomeDays,
    EveryDay,
}

impl SmokingCategory {
    pub const ALL: [SmokingCategory; 3] = [
        SmokingCategory::None,
        SmokingCategory::SomeDays,
        SmokingCategory::EveryDay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SmokingCategory::None => "None",
            SmokingCategory::SomeDays => "SomeDays",
            SmokingCategory::EveryDay => "EveryDay",
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            SmokingCategory::None => 0,
            SmokingCategory::SomeDays => 1,
            SmokingCategory::EveryDay => 2,
        }
    }

    /// Maps an intensity code (0 none, 1 some days, 2 every day).
    pub fn from_intensity(intensity: u8) -> Option<Self> {
        match intensity {
            0 => Some(SmokingCategory::None),
            1 => Some(SmokingCategory::SomeDays),
            2 => Some(SmokingCategory::EveryDay),
            _ => None,
        }
    }
}

impl fmt::Display for SmokingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SmokingCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase();
        match normalized.as_str() {
            "NONE" => Ok(SmokingCategory::None),
            "SOMEDAYS" | "SOME DAYS" => Ok(SmokingCategory::SomeDays),
            "EVERYDAY" | "EVERY DAY" => Ok(SmokingCategory::EveryDay),
            _ => Err(format!("Unknown smoking category: {s}")),
        }
    }
}
