//! Rule-based menstrual cycle irregularity classifier.
//!
//! [`analyze_cycle`] is pure and total: it derives cycle lengths from the
//! recorded period start dates, then walks a fixed sequence of rules that can
//! only ever raise the risk tier. Recommendations depend on the final tier
//! alone, never on which rule fired.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of period start dates a single entry may carry.
pub const MAX_PERIODS: usize = 6;

/// Symptom vocabulary offered by the tracking form.
pub const KNOWN_SYMPTOMS: &[&str] = &[
    "Cramps",
    "Bloating",
    "Mood swings",
    "Headache",
    "Back pain",
    "Breast tenderness",
    "Fatigue",
    "Nausea",
    "Acne",
    "Food cravings",
    "Irregular bleeding",
    "Spotting",
    "Heavy bleeding",
    "Prolonged bleeding",
];

const CONCERNING_SYMPTOMS: &[&str] = &[
    "Irregular bleeding",
    "Spotting",
    "Heavy bleeding",
    "Prolonged bleeding",
];

const HEAVY_BLEEDING: &str = "Heavy bleeding";

const VERY_SHORT_CYCLE_DAYS: i64 = 14;
const SHORT_CYCLE_DAYS: i64 = 21;
const LONG_CYCLE_DAYS: i64 = 35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flow {
    Light,
    Medium,
    Heavy,
}

impl std::fmt::Display for Flow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Flow::Light => write!(f, "light"),
            Flow::Medium => write!(f, "medium"),
            Flow::Heavy => write!(f, "heavy"),
        }
    }
}

impl std::str::FromStr for Flow {
    type Err = CycleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Flow::Light),
            "medium" => Ok(Flow::Medium),
            "heavy" => Ok(Flow::Heavy),
            other => Err(CycleError::InvalidFlow(other.to_string())),
        }
    }
}

/// Irregularity risk tier. Ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// One tier up, saturating at [`RiskLevel::High`].
    #[must_use]
    pub fn escalate(self) -> Self {
        match self {
            RiskLevel::Low => RiskLevel::Medium,
            RiskLevel::Medium | RiskLevel::High => RiskLevel::High,
        }
    }

    /// Raises `self` to `floor` if it is currently lower.
    #[must_use]
    pub fn at_least(self, floor: Self) -> Self {
        self.max(floor)
    }

    fn recommendations(self) -> &'static [&'static str] {
        match self {
            RiskLevel::High => &[
                "Consult with a healthcare provider or gynecologist immediately",
                "Keep detailed tracking of symptoms and cycle patterns",
                "Consider discussing hormonal evaluation with your doctor",
                "Track additional factors like stress, weight changes, and medications",
            ],
            RiskLevel::Medium => &[
                "Continue monitoring for 2-3 more cycles",
                "Note any lifestyle changes, stress, or dietary factors",
                "Consider tracking basal body temperature",
                "Schedule a routine gynecological check-up",
            ],
            RiskLevel::Low => &[
                "Your cycle patterns appear within normal variation",
                "Continue regular tracking for overall health monitoring",
                "Maintain healthy lifestyle habits",
            ],
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CycleError {
    #[error("at most {max} period dates can be analyzed, got {count}")]
    TooManyDates { count: usize, max: usize },

    #[error("invalid flow \"{0}\": expected light, medium, or heavy")]
    InvalidFlow(String),
}

/// One tracking submission: recent period start dates plus the symptoms
/// reported alongside them.
///
/// Dates are kept sorted and free of duplicates; symptoms are deduplicated
/// in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodEntry {
    period_dates: Vec<NaiveDate>,
    pub flow: Flow,
    symptoms: Vec<String>,
    pub missed_periods: bool,
}

impl PeriodEntry {
    /// Builds an entry, sorting and deduplicating `period_dates`.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError::TooManyDates`] if more than [`MAX_PERIODS`]
    /// distinct dates are supplied.
    pub fn new<I, S>(
        mut period_dates: Vec<NaiveDate>,
        flow: Flow,
        symptoms: I,
        missed_periods: bool,
    ) -> Result<Self, CycleError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        period_dates.sort_unstable();
        period_dates.dedup();
        if period_dates.len() > MAX_PERIODS {
            return Err(CycleError::TooManyDates {
                count: period_dates.len(),
                max: MAX_PERIODS,
            });
        }

        let mut unique: Vec<String> = Vec::new();
        for symptom in symptoms {
            let symptom = symptom.into();
            if !unique.contains(&symptom) {
                unique.push(symptom);
            }
        }

        Ok(Self {
            period_dates,
            flow,
            symptoms: unique,
            missed_periods,
        })
    }

    #[must_use]
    pub fn period_dates(&self) -> &[NaiveDate] {
        &self.period_dates
    }

    #[must_use]
    pub fn symptoms(&self) -> &[String] {
        &self.symptoms
    }

    fn has_symptom(&self, name: &str) -> bool {
        self.symptoms.iter().any(|s| s == name)
    }
}

/// Result of [`analyze_cycle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleAnalysis {
    /// Days between consecutive period start dates.
    pub cycle_lengths: Vec<i64>,
    /// Rounded mean of `cycle_lengths`; `0` when fewer than two dates exist.
    pub average_cycle_length: i64,
    pub irregularity_risk: RiskLevel,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Classifies cycle irregularity for a single [`PeriodEntry`].
///
/// Rules run in a fixed order and never lower the risk tier:
///
/// | # | Condition                                   | Effect            |
/// |---|---------------------------------------------|-------------------|
/// | 1 | any cycle < 14 days                         | high              |
/// | 2 | otherwise any cycle < 21 days               | at least medium   |
/// | 3 | any cycle > 35 days                         | at least medium   |
/// | 4 | missed periods reported                     | escalate one tier |
/// | 5 | two or more dates in one calendar month     | high              |
/// | 6 | heavy flow with "Heavy bleeding"            | high              |
/// | 7 | any concerning bleeding symptom             | escalate one tier |
#[must_use]
pub fn analyze_cycle(entry: &PeriodEntry) -> CycleAnalysis {
    let mut dates = entry.period_dates.clone();
    dates.sort_unstable();

    if dates.len() < 2 {
        return CycleAnalysis {
            cycle_lengths: Vec::new(),
            average_cycle_length: 0,
            irregularity_risk: RiskLevel::Low,
            warnings: vec!["Need at least 2 period dates to analyze cycle patterns".to_string()],
            recommendations: vec!["Continue tracking your periods for better analysis".to_string()],
        };
    }

    let cycle_lengths: Vec<i64> = dates
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_days())
        .collect();

    let mut warnings = Vec::new();
    let mut risk = RiskLevel::Low;

    let very_short = count_where(&cycle_lengths, |d| d < VERY_SHORT_CYCLE_DAYS);
    let short = count_where(&cycle_lengths, |d| d < SHORT_CYCLE_DAYS);
    let long = count_where(&cycle_lengths, |d| d > LONG_CYCLE_DAYS);

    if very_short > 0 {
        warnings.push(format!(
            "{very_short} cycle(s) shorter than 14 days detected - this may indicate serious hormonal imbalances"
        ));
        risk = RiskLevel::High;
    } else if short > 0 {
        warnings.push(format!(
            "{short} cycle(s) shorter than 21 days detected - may indicate hormonal irregularities"
        ));
        risk = risk.at_least(RiskLevel::Medium);
    }

    if long > 0 {
        warnings.push(format!(
            "{long} cycle(s) longer than 35 days detected - may indicate irregular ovulation"
        ));
        risk = risk.at_least(RiskLevel::Medium);
    }

    if entry.missed_periods {
        warnings.push(
            "Recent missed periods detected - this could indicate hormonal changes or other health factors"
                .to_string(),
        );
        risk = risk.escalate();
    }

    if has_repeated_month(&dates) {
        warnings.push(
            "Multiple periods within the same month detected - this may indicate hormonal fluctuations"
                .to_string(),
        );
        risk = RiskLevel::High;
    }

    if entry.flow == Flow::Heavy && entry.has_symptom(HEAVY_BLEEDING) {
        warnings.push(
            "Heavy flow with concerning bleeding patterns detected - may require medical attention"
                .to_string(),
        );
        risk = RiskLevel::High;
    }

    if CONCERNING_SYMPTOMS.iter().any(|s| entry.has_symptom(s)) {
        warnings.push("Irregular bleeding patterns detected - monitor closely".to_string());
        risk = risk.escalate();
    }

    CycleAnalysis {
        average_cycle_length: rounded_mean(&cycle_lengths),
        cycle_lengths,
        irregularity_risk: risk,
        warnings,
        recommendations: risk
            .recommendations()
            .iter()
            .map(|s| (*s).to_string())
            .collect(),
    }
}

fn count_where(lengths: &[i64], predicate: impl Fn(i64) -> bool) -> usize {
    lengths.iter().filter(|&&d| predicate(d)).count()
}

fn has_repeated_month(dates: &[NaiveDate]) -> bool {
    let mut per_month: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for date in dates {
        *per_month.entry((date.year(), date.month())).or_insert(0) += 1;
    }
    per_month.values().any(|&count| count > 1)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn rounded_mean(lengths: &[i64]) -> i64 {
    if lengths.is_empty() {
        return 0;
    }
    let sum: i64 = lengths.iter().sum();
    (sum as f64 / lengths.len() as f64).round() as i64
}

#[cfg(test)]
#[path = "cycle_test.rs"]
mod tests;
