//! Source column names for the survey fields.
//!
//! Defaults to the BRFSS names. A TOML file can override any subset:
//!
//! ```toml
//! avg_drinks_per_day = "AVEDRNK3"
//! age_group = "AGEG5YR"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::field::SurveyField;

/// Maps each survey field to the column it is read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnMap {
    pub avg_drinks_per_day: String,
    pub days_drank_last_30: String,
    pub smoking_frequency: String,
    pub age_group: String,
    pub unhealthy_days_last_30: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            avg_drinks_per_day: SurveyField::AvgDrinksPerDay.default_column().to_string(),
            days_drank_last_30: SurveyField::DaysDrankLast30.default_column().to_string(),
            smoking_frequency: SurveyField::SmokingFrequency.default_column().to_string(),
            age_group: SurveyField::AgeGroup.default_column().to_string(),
            unhealthy_days_last_30: SurveyField::UnhealthyDaysLast30
                .default_column()
                .to_string(),
        }
    }
}

impl ColumnMap {
    /// Loads a column map from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let map: ColumnMap = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        map.validate()?;
        Ok(map)
    }

    pub fn column(&self, field: SurveyField) -> &str {
        match field {
            SurveyField::AvgDrinksPerDay => &self.avg_drinks_per_day,
            SurveyField::DaysDrankLast30 => &self.days_drank_last_30,
            SurveyField::SmokingFrequency => &self.smoking_frequency,
            SurveyField::AgeGroup => &self.age_group,
            SurveyField::UnhealthyDaysLast30 => &self.unhealthy_days_last_30,
        }
    }

    /// Fields paired with their column names, in source order.
    pub fn iter(&self) -> impl Iterator<Item = (SurveyField, &str)> {
        SurveyField::ALL
            .into_iter()
            .map(move |field| (field, self.column(field)))
    }

    /// Rejects empty names and columns mapped to more than one field.
    ///
    /// Column names compare case-insensitively, matching how they are looked
    /// up in the source frame.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: Vec<(SurveyField, &str)> = Vec::with_capacity(SurveyField::ALL.len());
        for (field, column) in self.iter() {
            let column = column.trim();
            if column.is_empty() {
                return Err(ConfigError::EmptyColumn { field });
            }
            if let Some((first, _)) = seen
                .iter()
                .find(|(_, other)| other.eq_ignore_ascii_case(column))
            {
                return Err(ConfigError::DuplicateColumn {
                    column: column.to_string(),
                    first: *first,
                    second: field,
                });
            }
            seen.push((field, column));
        }
        Ok(())
    }
}
