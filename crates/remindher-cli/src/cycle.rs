//! `cycle` and `symptoms` command handlers.

use chrono::NaiveDate;
use remindher_core::{analyze_cycle, Flow, PeriodEntry, KNOWN_SYMPTOMS};

/// Returns the symptoms that no classifier rule recognises.
fn unknown_symptoms(symptoms: &[String]) -> Vec<&str> {
    symptoms
        .iter()
        .map(String::as_str)
        .filter(|s| !KNOWN_SYMPTOMS.contains(s))
        .collect()
}

/// Analyzes the given period history and prints the result as JSON.
///
/// # Errors
///
/// Returns an error if more than six distinct dates are given.
pub(crate) fn run_cycle(
    dates: Vec<NaiveDate>,
    flow: Flow,
    symptoms: Vec<String>,
    missed: bool,
) -> anyhow::Result<()> {
    for symptom in unknown_symptoms(&symptoms) {
        tracing::warn!(symptom, "unrecognised symptom; it will not affect the analysis");
    }

    let entry = PeriodEntry::new(dates, flow, symptoms, missed)?;
    let analysis = analyze_cycle(&entry);
    tracing::debug!(
        dates = entry.period_dates().len(),
        risk = %analysis.irregularity_risk,
        "cycle analysis complete"
    );

    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

pub(crate) fn run_symptoms() {
    for symptom in KNOWN_SYMPTOMS {
        println!("{symptom}");
    }
}
