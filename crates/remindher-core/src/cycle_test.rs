use super::*;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date must be valid")
}

fn entry(dates: &[&str], flow: Flow, symptoms: &[&str], missed: bool) -> PeriodEntry {
    PeriodEntry::new(
        dates.iter().map(|d| date(d)).collect(),
        flow,
        symptoms.iter().copied(),
        missed,
    )
    .expect("test entry must be valid")
}

// ---------------------------------------------------------------------------
// PeriodEntry construction
// ---------------------------------------------------------------------------

#[test]
fn new_sorts_and_deduplicates_dates() {
    let e = entry(
        &["2024-03-01", "2024-01-01", "2024-03-01", "2024-02-01"],
        Flow::Medium,
        &[],
        false,
    );
    assert_eq!(
        e.period_dates(),
        &[date("2024-01-01"), date("2024-02-01"), date("2024-03-01")]
    );
}

#[test]
fn new_deduplicates_symptoms_in_first_seen_order() {
    let e = entry(&[], Flow::Light, &["Cramps", "Acne", "Cramps"], false);
    assert_eq!(e.symptoms(), &["Cramps".to_string(), "Acne".to_string()]);
}

#[test]
fn new_rejects_more_than_six_dates() {
    let dates: Vec<NaiveDate> = (1..=7)
        .map(|m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap())
        .collect();
    let err = PeriodEntry::new(dates, Flow::Medium, Vec::<String>::new(), false).unwrap_err();
    assert_eq!(err, CycleError::TooManyDates { count: 7, max: 6 });
}

#[test]
fn new_counts_duplicates_once_toward_limit() {
    let mut dates: Vec<NaiveDate> = (1..=6)
        .map(|m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap())
        .collect();
    dates.push(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    assert!(PeriodEntry::new(dates, Flow::Medium, Vec::<String>::new(), false).is_ok());
}

#[test]
fn flow_parses_case_insensitively() {
    assert_eq!("Heavy".parse::<Flow>().unwrap(), Flow::Heavy);
    assert_eq!(" light ".parse::<Flow>().unwrap(), Flow::Light);
    assert!(matches!(
        "torrential".parse::<Flow>(),
        Err(CycleError::InvalidFlow(ref s)) if s == "torrential"
    ));
}

// ---------------------------------------------------------------------------
// RiskLevel
// ---------------------------------------------------------------------------

#[test]
fn escalate_moves_one_tier_and_saturates() {
    assert_eq!(RiskLevel::Low.escalate(), RiskLevel::Medium);
    assert_eq!(RiskLevel::Medium.escalate(), RiskLevel::High);
    assert_eq!(RiskLevel::High.escalate(), RiskLevel::High);
}

#[test]
fn at_least_never_lowers() {
    assert_eq!(RiskLevel::High.at_least(RiskLevel::Medium), RiskLevel::High);
    assert_eq!(RiskLevel::Low.at_least(RiskLevel::Medium), RiskLevel::Medium);
}

// ---------------------------------------------------------------------------
// analyze_cycle
// ---------------------------------------------------------------------------

#[test]
fn fewer_than_two_dates_is_degenerate_low() {
    let analysis = analyze_cycle(&entry(&["2024-01-01"], Flow::Heavy, &["Spotting"], true));
    assert!(analysis.cycle_lengths.is_empty());
    assert_eq!(analysis.average_cycle_length, 0);
    assert_eq!(analysis.irregularity_risk, RiskLevel::Low);
    assert_eq!(
        analysis.warnings,
        vec!["Need at least 2 period dates to analyze cycle patterns"]
    );
    assert_eq!(
        analysis.recommendations,
        vec!["Continue tracking your periods for better analysis"]
    );
}

#[test]
fn no_dates_is_degenerate_low() {
    let analysis = analyze_cycle(&entry(&[], Flow::Medium, &[], false));
    assert_eq!(analysis.irregularity_risk, RiskLevel::Low);
    assert_eq!(analysis.warnings.len(), 1);
}

#[test]
fn regular_28_day_cycle_is_low() {
    let analysis = analyze_cycle(&entry(&["2024-01-05", "2024-02-02"], Flow::Medium, &[], false));
    assert_eq!(analysis.cycle_lengths, vec![28]);
    assert_eq!(analysis.average_cycle_length, 28);
    assert_eq!(analysis.irregularity_risk, RiskLevel::Low);
    assert!(analysis.warnings.is_empty());
    assert_eq!(
        analysis.recommendations[0],
        "Your cycle patterns appear within normal variation"
    );
    assert_eq!(analysis.recommendations.len(), 3);
}

#[test]
fn jan_first_and_twenty_ninth_share_a_month_so_risk_is_high() {
    // A regular 28-day gap, but both dates fall in January 2024.
    let analysis = analyze_cycle(&entry(&["2024-01-01", "2024-01-29"], Flow::Medium, &[], false));
    assert_eq!(analysis.cycle_lengths, vec![28]);
    assert_eq!(analysis.average_cycle_length, 28);
    assert_eq!(analysis.irregularity_risk, RiskLevel::High);
    assert_eq!(
        analysis.warnings,
        vec!["Multiple periods within the same month detected - this may indicate hormonal fluctuations"]
    );
}

#[test]
fn nine_day_gap_is_high_with_short_cycle_warning() {
    let analysis = analyze_cycle(&entry(&["2024-01-01", "2024-01-10"], Flow::Medium, &[], false));
    assert_eq!(analysis.cycle_lengths, vec![9]);
    assert_eq!(analysis.irregularity_risk, RiskLevel::High);
    assert!(
        analysis.warnings[0].starts_with("1 cycle(s) shorter than 14 days"),
        "unexpected warning: {:?}",
        analysis.warnings
    );
    assert!(!analysis
        .warnings
        .iter()
        .any(|w| w.contains("shorter than 21 days")));
}

#[test]
fn two_dates_in_same_month_force_high() {
    // 30-day gap, light flow: only the month rule fires.
    let analysis = analyze_cycle(&entry(&["2024-03-01", "2024-03-31"], Flow::Light, &[], false));
    assert_eq!(analysis.cycle_lengths, vec![30]);
    assert_eq!(analysis.irregularity_risk, RiskLevel::High);
    assert_eq!(analysis.warnings.len(), 1);
    assert!(analysis.warnings[0].starts_with("Multiple periods within the same month"));
}

#[test]
fn same_month_forces_high_even_with_normal_gap_elsewhere() {
    let analysis = analyze_cycle(&entry(
        &["2024-02-01", "2024-02-29", "2024-03-28"],
        Flow::Medium,
        &[],
        false,
    ));
    // Both gaps are 28 days; February holds two start dates.
    assert_eq!(analysis.cycle_lengths, vec![28, 28]);
    assert_eq!(analysis.irregularity_risk, RiskLevel::High);
    assert_eq!(analysis.warnings.len(), 1);
}

#[test]
fn eighteen_day_cycle_is_medium() {
    let analysis = analyze_cycle(&entry(&["2024-01-20", "2024-02-07"], Flow::Medium, &[], false));
    assert_eq!(analysis.cycle_lengths, vec![18]);
    assert_eq!(analysis.irregularity_risk, RiskLevel::Medium);
    assert!(analysis.warnings[0].starts_with("1 cycle(s) shorter than 21 days"));
    assert_eq!(
        analysis.recommendations[0],
        "Continue monitoring for 2-3 more cycles"
    );
}

#[test]
fn long_cycle_is_medium() {
    let analysis = analyze_cycle(&entry(&["2024-01-01", "2024-02-10"], Flow::Medium, &[], false));
    assert_eq!(analysis.cycle_lengths, vec![40]);
    assert_eq!(analysis.irregularity_risk, RiskLevel::Medium);
    assert!(analysis.warnings[0].contains("longer than 35 days"));
}

#[test]
fn short_and_long_cycles_stay_medium() {
    let analysis = analyze_cycle(&entry(
        &["2024-01-25", "2024-02-12", "2024-03-30"],
        Flow::Medium,
        &[],
        false,
    ));
    assert_eq!(analysis.cycle_lengths, vec![18, 47]);
    assert_eq!(analysis.irregularity_risk, RiskLevel::Medium);
    assert_eq!(analysis.warnings.len(), 2);
}

#[test]
fn missed_periods_escalate_low_to_medium() {
    let analysis = analyze_cycle(&entry(&["2024-01-05", "2024-02-02"], Flow::Medium, &[], true));
    assert_eq!(analysis.irregularity_risk, RiskLevel::Medium);
    assert_eq!(analysis.warnings.len(), 1);
    assert!(analysis.warnings[0].starts_with("Recent missed periods detected"));
}

#[test]
fn missed_periods_escalate_medium_to_high() {
    let analysis = analyze_cycle(&entry(&["2024-01-01", "2024-02-10"], Flow::Medium, &[], true));
    assert_eq!(analysis.irregularity_risk, RiskLevel::High);
}

#[test]
fn heavy_flow_with_heavy_bleeding_forces_high() {
    let analysis = analyze_cycle(&entry(
        &["2024-01-05", "2024-02-02"],
        Flow::Heavy,
        &["Heavy bleeding"],
        false,
    ));
    // Regular cycle, nothing missed: only the heavy-flow rule can reach high.
    assert_eq!(analysis.cycle_lengths, vec![28]);
    assert_eq!(analysis.irregularity_risk, RiskLevel::High);
    assert_eq!(
        analysis.warnings,
        vec![
            "Heavy flow with concerning bleeding patterns detected - may require medical attention",
            "Irregular bleeding patterns detected - monitor closely",
        ]
    );
}

#[test]
fn heavy_flow_rule_lifts_low_straight_to_high() {
    let baseline = analyze_cycle(&entry(
        &["2024-01-05", "2024-02-02"],
        Flow::Heavy,
        &[],
        false,
    ));
    assert_eq!(baseline.irregularity_risk, RiskLevel::Low);

    let with_bleeding = analyze_cycle(&entry(
        &["2024-01-05", "2024-02-02"],
        Flow::Heavy,
        &["Heavy bleeding"],
        false,
    ));
    let without_heavy_flow = analyze_cycle(&entry(
        &["2024-01-05", "2024-02-02"],
        Flow::Light,
        &["Heavy bleeding"],
        false,
    ));
    assert_eq!(with_bleeding.irregularity_risk, RiskLevel::High);
    assert_eq!(without_heavy_flow.irregularity_risk, RiskLevel::Medium);
}

#[test]
fn heavy_bleeding_without_heavy_flow_only_escalates() {
    let analysis = analyze_cycle(&entry(
        &["2024-01-05", "2024-02-02"],
        Flow::Medium,
        &["Heavy bleeding"],
        false,
    ));
    assert_eq!(analysis.irregularity_risk, RiskLevel::Medium);
}

#[test]
fn concerning_symptom_escalates_low_to_medium() {
    let analysis = analyze_cycle(&entry(
        &["2024-01-05", "2024-02-02"],
        Flow::Light,
        &["Spotting"],
        false,
    ));
    assert_eq!(analysis.irregularity_risk, RiskLevel::Medium);
    assert_eq!(
        analysis.warnings,
        vec!["Irregular bleeding patterns detected - monitor closely"]
    );
}

#[test]
fn concerning_symptom_escalates_after_missed_period() {
    let analysis = analyze_cycle(&entry(
        &["2024-01-05", "2024-02-02"],
        Flow::Light,
        &["Spotting"],
        true,
    ));
    // missed: low -> medium, spotting: medium -> high
    assert_eq!(analysis.irregularity_risk, RiskLevel::High);
    assert_eq!(
        analysis.recommendations[0],
        "Consult with a healthcare provider or gynecologist immediately"
    );
    assert_eq!(analysis.recommendations.len(), 4);
}

#[test]
fn non_concerning_symptoms_do_not_affect_risk() {
    let analysis = analyze_cycle(&entry(
        &["2024-01-05", "2024-02-02"],
        Flow::Heavy,
        &["Cramps", "Bloating", "Fatigue"],
        false,
    ));
    assert_eq!(analysis.irregularity_risk, RiskLevel::Low);
}

#[test]
fn average_rounds_half_up() {
    // 27 and 28 -> mean 27.5 -> 28
    let analysis = analyze_cycle(&entry(
        &["2024-01-10", "2024-02-06", "2024-03-05"],
        Flow::Medium,
        &[],
        false,
    ));
    assert_eq!(analysis.cycle_lengths, vec![27, 28]);
    assert_eq!(analysis.average_cycle_length, 28);
}

#[test]
fn warnings_follow_rule_order() {
    let analysis = analyze_cycle(&entry(
        &["2024-01-01", "2024-02-15"],
        Flow::Heavy,
        &["Heavy bleeding"],
        true,
    ));
    let prefixes: Vec<&str> = analysis
        .warnings
        .iter()
        .map(|w| w.split(" - ").next().unwrap())
        .collect();
    assert_eq!(
        prefixes,
        vec![
            "1 cycle(s) longer than 35 days detected",
            "Recent missed periods detected",
            "Heavy flow with concerning bleeding patterns detected",
            "Irregular bleeding patterns detected",
        ]
    );
}

#[test]
fn analysis_serializes_risk_in_lowercase() {
    let analysis = analyze_cycle(&entry(&["2024-01-05", "2024-02-02"], Flow::Medium, &[], false));
    let json = serde_json::to_value(&analysis).unwrap();
    assert_eq!(json["irregularity_risk"], "low");
    assert_eq!(json["cycle_lengths"], serde_json::json!([28]));
}
