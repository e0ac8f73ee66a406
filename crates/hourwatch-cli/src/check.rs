use chrono::Utc;
use hourwatch_core::{status_label, AppConfig, MonitoredLocation};
use hourwatch_pipeline::{
    build_live_monitor, listing_source, load_monitored_locations, CycleReport, LogNotifier,
    MemoryStore, Monitor, MonitorSettings,
};

/// Run one check cycle and print a per-location table.
///
/// With `dry_run`, records go to an in-memory store and alerts only to the
/// log; nothing is written to the database.
///
/// # Errors
///
/// Returns an error if the locations file is invalid, `location` matches no
/// configured id, the pipeline cannot be built, or any location failed.
pub(crate) async fn run_check(
    config: &AppConfig,
    location: Option<&str>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let locations = select_locations(load_monitored_locations(config)?, location)?;
    let total = locations.len();

    let report = if dry_run {
        let settings = MonitorSettings::from_app_config(config, locations);
        let monitor = Monitor::new(listing_source(config)?, MemoryStore::new(), LogNotifier, settings);
        monitor.run_cycle(Utc::now()).await
    } else {
        let pool_config = hourwatch_db::PoolConfig::from_app_config(config);
        let pool = hourwatch_db::connect_pool(&config.database_url, pool_config).await?;
        let monitor = build_live_monitor(config, pool, locations)?;
        monitor.run_cycle(Utc::now()).await
    };

    print_report(&report, dry_run);

    if !report.failures.is_empty() {
        anyhow::bail!("{} of {total} location(s) failed", report.failures.len());
    }
    Ok(())
}

/// Narrows `locations` to the one whose id is `filter`, if given.
fn select_locations(
    locations: Vec<MonitoredLocation>,
    filter: Option<&str>,
) -> anyhow::Result<Vec<MonitoredLocation>> {
    let Some(id) = filter else {
        return Ok(locations);
    };

    let selected: Vec<MonitoredLocation> =
        locations.into_iter().filter(|loc| loc.id == id).collect();
    if selected.is_empty() {
        anyhow::bail!("location '{id}' not found in the locations file");
    }
    Ok(selected)
}

fn print_report(report: &CycleReport, dry_run: bool) {
    if dry_run {
        println!("[dry-run] nothing was written to the database");
    }

    println!(
        "{:<34}{:<10}{:<10}{:<10}NAME",
        "LOCATION", "EXPECTED", "ACTUAL", "MISMATCH"
    );
    for record in &report.records {
        println!(
            "{:<34}{:<10}{:<10}{:<10}{}",
            record.location_id(),
            status_label(record.expected()),
            status_label(record.actual()),
            if record.mismatch() { "yes" } else { "no" },
            record.name()
        );
    }

    for failure in &report.failures {
        println!(
            "{:<34}failed during {:?}: {}",
            failure.location_id, failure.stage, failure.error
        );
    }

    println!(
        "checked {}, mismatches {}, alerts sent {}, alerts failed {}",
        report.records.len(),
        report.mismatches(),
        report.alerts_sent,
        report.alerts_failed
    );
}
