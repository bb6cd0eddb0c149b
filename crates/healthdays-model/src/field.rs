//! The five survey questions the pipeline reads.
//!
//! Each field carries its own answer domain: the codes that are real answers
//! and the sentinel codes the survey uses for "don't know", "refused", or an
//! out-of-scope respondent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A survey question read from the source extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyField {
    /// Average drinks per drinking day in the last 30 days.
    AvgDrinksPerDay,
    /// Days (or weekly frequency) with at least one drink in the last 30 days.
    DaysDrankLast30,
    /// How often the respondent currently smokes.
    SmokingFrequency,
    /// Five-year age bucket.
    AgeGroup,
    /// Days in the last 30 with poor physical health.
    UnhealthyDaysLast30,
}

impl SurveyField {
    /// All fields in source order.
    pub const ALL: [SurveyField; 5] = [
        SurveyField::AvgDrinksPerDay,
        SurveyField::DaysDrankLast30,
        SurveyField::SmokingFrequency,
        SurveyField::AgeGroup,
        SurveyField::UnhealthyDaysLast30,
    ];

    /// Key used in column map files and log output.
    pub fn as_str(&self) -> &'static str {
        match self {
            SurveyField::AvgDrinksPerDay => "avg_drinks_per_day",
            SurveyField::DaysDrankLast30 => "days_drank_last_30",
            SurveyField::SmokingFrequency => "smoking_frequency",
            SurveyField::AgeGroup => "age_group",
            SurveyField::UnhealthyDaysLast30 => "unhealthy_days_last_30",
        }
    }

    /// Column name in the BRFSS extract.
    pub fn default_column(&self) -> &'static str {
        match self {
            SurveyField::AvgDrinksPerDay => "AVEDRNK2",
            SurveyField::DaysDrankLast30 => "ALCDAY5",
            SurveyField::SmokingFrequency => "SMOKDAY2",
            SurveyField::AgeGroup => "_AGEG5YR",
            SurveyField::UnhealthyDaysLast30 => "PHYSHLTH",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SurveyField::AvgDrinksPerDay => "Average drinks per day when drinking",
            SurveyField::DaysDrankLast30 => "Days with a drink in the past 30 days",
            SurveyField::SmokingFrequency => "Current smoking frequency",
            SurveyField::AgeGroup => "Five-year age group",
            SurveyField::UnhealthyDaysLast30 => "Days of poor physical health",
        }
    }

    /// Human-readable description of the codes accepted as answers.
    pub fn accepted_codes(&self) -> &'static str {
        match self {
            SurveyField::AvgDrinksPerDay => "1-76 drinks; blank = not asked",
            SurveyField::DaysDrankLast30 => "101-107 per week; 201-230 per month; 888 none",
            SurveyField::SmokingFrequency => "1 every day; 2 some days; 3 not at all",
            SurveyField::AgeGroup => "1-3 18-34; 4-6 35-49; 7-10 50-69",
            SurveyField::UnhealthyDaysLast30 => "1-30 days; 88 none",
        }
    }

    /// Sentinel codes that cause a row to be dropped.
    pub fn sentinels(&self) -> &'static [u16] {
        match self {
            SurveyField::AvgDrinksPerDay => &[77, 99],
            SurveyField::DaysDrankLast30 => &[777, 999],
            SurveyField::SmokingFrequency => &[7, 9],
            SurveyField::AgeGroup => &[14],
            SurveyField::UnhealthyDaysLast30 => &[77, 99],
        }
    }

    /// Whether an absent answer drops the row.
    pub fn is_required(&self) -> bool {
        !matches!(self, SurveyField::AvgDrinksPerDay)
    }

    pub fn is_sentinel(&self, value: u16) -> bool {
        self.sentinels().contains(&value)
    }
}

impl fmt::Display for SurveyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SurveyField {
    type Err = String;

    /// Accepts either the field key or the BRFSS column name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        SurveyField::ALL
            .into_iter()
            .find(|field| {
                field.as_str().eq_ignore_ascii_case(trimmed)
                    || field.default_column().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| format!("Unknown survey field: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_round_trip() {
        for field in SurveyField::ALL {
            assert_eq!(field.as_str().parse::<SurveyField>(), Ok(field));
            assert_eq!(field.default_column().parse::<SurveyField>(), Ok(field));
        }
    }

    #[test]
    fn test_field_parse_case_insensitive() {
        assert_eq!("physhlth".parse(), Ok(SurveyField::UnhealthyDaysLast30));
        assert_eq!(" Age_Group ".parse(), Ok(SurveyField::AgeGroup));
        assert!("SEX".parse::<SurveyField>().is_err());
    }

    #[test]
    fn test_only_avg_drinks_is_optional() {
        let optional: Vec<_> = SurveyField::ALL
            .into_iter()
            .filter(|f| !f.is_required())
            .collect();
        assert_eq!(optional, vec![SurveyField::AvgDrinksPerDay]);
    }

    #[test]
    fn test_sentinels() {
        assert!(SurveyField::DaysDrankLast30.is_sentinel(777));
        assert!(!SurveyField::DaysDrankLast30.is_sentinel(888));
        assert!(SurveyField::AgeGroup.is_sentinel(14));
        assert!(!SurveyField::AgeGroup.is_sentinel(13));
    }
}
