//! Record filter.
//!
//! Drops respondents that cannot be scored: a required answer is blank, an
//! answer is a "don't know" or "refused" sentinel, or the age group is
//! outside the 18-69 range. Every applicable reason is reported so the run
//! summary can tally them.

use std::fmt;

use healthdays_model::{RawRecord, SurveyField};

/// Age groups that map to a generation.
const AGE_GROUPS_IN_SCOPE: std::ops::RangeInclusive<u16> = 1..=10;

/// Why a record was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RejectReason {
    /// A required question was left blank.
    MissingAnswer(SurveyField),
    /// The answer is a don't-know, refused, or unknown-age code.
    Sentinel(SurveyField),
    /// Age group 11-13 (70 and over) or any other code outside 1-10.
    AgeOutOfScope,
}

impl RejectReason {
    pub fn field(&self) -> SurveyField {
        match self {
            RejectReason::MissingAnswer(field) | RejectReason::Sentinel(field) => *field,
            RejectReason::AgeOutOfScope => SurveyField::AgeGroup,
        }
    }

    /// Stable label used in summaries and the JSON report.
    pub fn label(&self) -> String {
        match self {
            RejectReason::MissingAnswer(field) => format!("missing {}", field.as_str()),
            RejectReason::Sentinel(field) => format!("sentinel {}", field.as_str()),
            RejectReason::AgeOutOfScope => "age out of scope".to_string(),
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// A dropped record and every reason that applied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub row: usize,
    pub reasons: Vec<RejectReason>,
}

impl Rejection {
    pub fn has(&self, reason: RejectReason) -> bool {
        self.reasons.contains(&reason)
    }
}

/// Accepts or rejects a raw record.
///
/// An accepted record is safe to hand to [`recode`](crate::recode::recode):
/// all required answers are present, no answer is a sentinel, and the age
/// group is 1 through 10. A blank drinks-per-day answer is accepted since
/// it means the question was skipped for a non-drinker.
pub fn screen(record: &RawRecord) -> Result<(), Rejection> {
    let mut reasons = Vec::new();

    for field in SurveyField::ALL {
        match record.get(field) {
            None if field.is_required() => reasons.push(RejectReason::MissingAnswer(field)),
            Some(value) if field.is_sentinel(value) => {
                reasons.push(RejectReason::Sentinel(field));
            }
            _ => {}
        }
    }

    if let Some(age) = record.age_group
        && !SurveyField::AgeGroup.is_sentinel(age)
        && !AGE_GROUPS_IN_SCOPE.contains(&age)
    {
        reasons.push(RejectReason::AgeOutOfScope);
    }

    if reasons.is_empty() {
        Ok(())
    } else {
        Err(Rejection {
            row: record.row,
            reasons,
        })
    }
}
