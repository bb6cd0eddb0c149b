use serde::{Deserialize, Serialize};

use crate::enums::{DrinkingCategory, Generation, SmokingCategory};
use crate::field::SurveyField;

/// One respondent as read from the extract.
///
/// `None` means the question was left blank, which is different from a
/// coded answer of 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawRecord {
    /// Zero-based row index in the source file.
    pub row: usize,
    pub avg_drinks_per_day: Option<u16>,
    pub days_drank_last_30: Option<u16>,
    pub smoking_frequency: Option<u16>,
    pub age_group: Option<u16>,
    pub unhealthy_days_last_30: Option<u16>,
}

impl RawRecord {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            ..Self::default()
        }
    }

    pub fn with(mut self, field: SurveyField, value: Option<u16>) -> Self {
        self.set(field, value);
        self
    }

    pub fn get(&self, field: SurveyField) -> Option<u16> {
        match field {
            SurveyField::AvgDrinksPerDay => self.avg_drinks_per_day,
            SurveyField::DaysDrankLast30 => self.days_drank_last_30,
            SurveyField::SmokingFrequency => self.smoking_frequency,
            SurveyField::AgeGroup => self.age_group,
            SurveyField::UnhealthyDaysLast30 => self.unhealthy_days_last_30,
        }
    }

    pub fn set(&mut self, field: SurveyField, value: Option<u16>) {
        let slot = match field {
            SurveyField::AvgDrinksPerDay => &mut self.avg_drinks_per_day,
            SurveyField::DaysDrankLast30 => &mut self.days_drank_last_30,
            SurveyField::SmokingFrequency => &mut self.smoking_frequency,
            SurveyField::AgeGroup => &mut self.age_group,
            SurveyField::UnhealthyDaysLast30 => &mut self.unhealthy_days_last_30,
        };
        *slot = value;
    }
}

/// A respondent after filtering and recoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanRecord {
    /// Row index of the source record.
    pub row: usize,
    /// Days in the last 30 with good physical health (0..=30).
    pub healthy_days: u8,
    pub generation: Generation,
    pub drinking: DrinkingCategory,
    pub smoking: SmokingCategory,
}
