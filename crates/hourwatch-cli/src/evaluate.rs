//! Offline evaluation of an hours string, for operators checking what the
//! evaluator makes of a listing.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use hourwatch_core::{
    interval::parse_range, status_label, EvaluationContext, Evaluator, Expectation, HoursModel,
    RawHours, DEFAULT_TIMEZONE,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct EvaluateReport {
    pub model: HoursModel,
    pub instant: DateTime<Utc>,
    pub local_time: String,
    pub timezone: String,
    pub expected: &'static str,
    pub expectation: Expectation,
}

/// Builds the report without printing it.
///
/// # Errors
///
/// Returns an error if `at`, `timezone`, or `fallback` cannot be parsed.
pub(crate) fn evaluate_hours(
    hours: &str,
    at: Option<&str>,
    timezone: Option<&str>,
    fallback: Option<&str>,
) -> anyhow::Result<EvaluateReport> {
    let instant = match at {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map_err(|e| anyhow::anyhow!("invalid --at '{raw}': {e}"))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let zone_name = timezone.unwrap_or(DEFAULT_TIMEZONE);
    let zone: Tz = zone_name
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown IANA timezone '{zone_name}'"))?;

    let evaluator = match fallback {
        Some(raw) => Evaluator::new(
            parse_range(raw).map_err(|e| anyhow::anyhow!("invalid --fallback '{raw}': {e}"))?,
        ),
        None => Evaluator::default(),
    };

    let model = HoursModel::from_optional(Some(&RawHours::Text(hours.to_string())));
    let ctx = EvaluationContext::new(instant, zone);
    let expectation = evaluator.explain(&model, &ctx);

    Ok(EvaluateReport {
        model,
        instant,
        local_time: ctx.local().format("%A %Y-%m-%d %H:%M:%S %Z").to_string(),
        timezone: zone.name().to_string(),
        expected: status_label(expectation.open),
        expectation,
    })
}

/// Prints the evaluation report as pretty JSON followed by a one-line verdict.
///
/// # Errors
///
/// Returns an error if the inputs cannot be parsed.
pub(crate) fn run_evaluate(
    hours: &str,
    at: Option<&str>,
    timezone: Option<&str>,
    fallback: Option<&str>,
) -> anyhow::Result<()> {
    let report = evaluate_hours(hours, at, timezone, fallback)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    println!(
        "expected {} at {} ({})",
        report.expected, report.local_time, report.expectation.basis
    );
    Ok(())
}
