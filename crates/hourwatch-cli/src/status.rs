use hourwatch_core::status_label;

/// Print the latest stored status per restaurant, most recently checked first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_status(pool: &sqlx::PgPool, mismatched_only: bool) -> anyhow::Result<()> {
    let mut rows = hourwatch_db::list_status_records(pool).await?;
    if mismatched_only {
        rows.retain(|row| row.mismatch);
    }

    if rows.is_empty() {
        println!("no status records found; run `check` first");
        return Ok(());
    }

    let summary = hourwatch_db::status_summary(pool).await?;

    println!(
        "{:<22}{:<10}{:<10}{:<10}NAME",
        "LAST CHECKED", "EXPECTED", "ACTUAL", "MISMATCH"
    );
    for row in &rows {
        println!(
            "{:<22}{:<10}{:<10}{:<10}{}",
            row.last_checked_at.format("%Y-%m-%d %H:%M UTC"),
            status_label(row.expected),
            status_label(row.actual),
            if row.mismatch { "yes" } else { "no" },
            row.name
        );
    }
    println!(
        "total {}, open {}, mismatched {}",
        summary.total, summary.open, summary.mismatched
    );

    Ok(())
}
