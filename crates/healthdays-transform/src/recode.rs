//! Field recoder.
//!
//! Turns the survey's overloaded numeric answers into one semantic scale.
//! Every function here expects a record that passed
//! [`screen`](crate::filter::screen); a value the filter should have removed
//! is reported as [`RecodeError::InvariantViolation`].

use healthdays_model::{
    CleanRecord, DrinkingCategory, Generation, RawRecord, RecodeError, Result, SmokingCategory,
    SurveyField,
};

/// Answer code for "no days" in both day-count questions.
const NONE_CODE: u16 = 88;
const NO_DRINKING_DAYS: u16 = 888;
const DAYS_IN_PERIOD: u8 = 30;
const WEEKS_IN_PERIOD: u32 = 4;
const MAX_DRINKS_PER_DAY: u16 = 76;

/// Smoking frequency code to intensity (0 none, 1 some days, 2 every day).
///
/// The survey orders the answers from most to least frequent, so the table
/// reverses them.
pub const SMOKING_REMAP: [(u16, u8); 3] = [(1, 2), (2, 1), (3, 0)];

/// Converts a days-drank answer to times drank in 30 days.
///
/// 101-107 are per-week answers and are scaled by four, 201-230 are
/// per-month answers, 888 means none. Anything else is returned as is;
/// [`is_days_passthrough`] tells the caller when that happened.
pub fn normalize_days_drank(value: u16) -> u16 {
    match value {
        NO_DRINKING_DAYS => 0,
        100..=199 => (value - 100) * 4,
        200..=299 => value - 200,
        other => other,
    }
}

/// True when [`normalize_days_drank`] returns its input unchanged because
/// the code is in none of the known unit ranges.
pub fn is_days_passthrough(value: u16) -> bool {
    !matches!(value, NO_DRINKING_DAYS | 100..=299)
}

/// Estimated drinks per week from normalized drinking days.
///
/// A blank drinks-per-day answer counts as zero drinks.
pub fn weekly_drinks(days_normalized: u16, drinks_per_day: Option<u16>) -> u32 {
    let monthly = u32::from(days_normalized) * u32::from(drinks_per_day.unwrap_or(0));
    monthly / WEEKS_IN_PERIOD
}

/// Looks up the intensity for a smoking frequency code.
pub fn remap_smoking(code: u16) -> Option<u8> {
    SMOKING_REMAP
        .iter()
        .find(|(from, _)| *from == code)
        .map(|(_, to)| *to)
}

/// Days in the last 30 with good physical health.
pub fn healthy_days(record: &RawRecord) -> Result<u8> {
    let field = SurveyField::UnhealthyDaysLast30;
    match record.unhealthy_days_last_30 {
        Some(NONE_CODE) => Ok(DAYS_IN_PERIOD),
        Some(days @ 0..=30) => Ok(DAYS_IN_PERIOD - days as u8),
        other => Err(RecodeError::invariant(
            record.row,
            field,
            other,
            "unhealthy days must be 0-30 or 88",
        )),
    }
}

pub fn generation(record: &RawRecord) -> Result<Generation> {
    record
        .age_group
        .and_then(Generation::from_age_group)
        .ok_or_else(|| {
            RecodeError::invariant(
                record.row,
                SurveyField::AgeGroup,
                record.age_group,
                "age group must be 1-10",
            )
        })
}

/// Drinking level from weekly drinks, derived from both drinking answers.
pub fn drinking_category(record: &RawRecord) -> Result<DrinkingCategory> {
    let days = match record.days_drank_last_30 {
        Some(days) if !SurveyField::DaysDrankLast30.is_sentinel(days) => days,
        other => {
            return Err(RecodeError::invariant(
                record.row,
                SurveyField::DaysDrankLast30,
                other,
                "days drank must be answered",
            ));
        }
    };

    let drinks = match record.avg_drinks_per_day {
        None => None,
        Some(drinks @ 1..=MAX_DRINKS_PER_DAY) => Some(drinks),
        other => {
            return Err(RecodeError::invariant(
                record.row,
                SurveyField::AvgDrinksPerDay,
                other,
                "drinks per day must be 1-76 or blank",
            ));
        }
    };

    let weekly = weekly_drinks(normalize_days_drank(days), drinks);
    Ok(DrinkingCategory::from_weekly_drinks(weekly))
}

pub fn smoking_category(record: &RawRecord) -> Result<SmokingCategory> {
    record
        .smoking_frequency
        .and_then(remap_smoking)
        .and_then(SmokingCategory::from_intensity)
        .ok_or_else(|| {
            RecodeError::invariant(
                record.row,
                SurveyField::SmokingFrequency,
                record.smoking_frequency,
                "smoking frequency must be 1-3",
            )
        })
}

/// Derives the clean record. Fails on the first field out of its domain.
pub fn recode(record: &RawRecord) -> Result<CleanRecord> {
    Ok(CleanRecord {
        row: record.row,
        healthy_days: healthy_days(record)?,
        generation: generation(record)?,
        drinking: drinking_category(record)?,
        smoking: smoking_category(record)?,
    })
}
