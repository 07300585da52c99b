//! `facilities` command handler.

use std::process::ExitCode;

use remindher_core::AppConfig;
use remindher_locator::{FacilitySearch, SearchConfig};
use tokio_util::sync::CancellationToken;

/// Runs one facility search and prints the outcome as JSON on stdout.
///
/// Ctrl-C cancels the search, aborting any in-flight request or back-off
/// sleep. Returns exit status 1 when the search does not succeed.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the outcome cannot
/// be serialized.
pub(crate) async fn run_facilities(config: &AppConfig, pincode: &str) -> anyhow::Result<ExitCode> {
    let search = FacilitySearch::new(&SearchConfig::from_app_config(config))?;
    tracing::debug!(
        pincode,
        worst_case_secs = search.worst_case_latency().as_secs(),
        "starting facility search"
    );

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("received ctrl-c, cancelling search");
            on_ctrl_c.cancel();
        }
    });

    let outcome = search
        .search_by_postal_code_with_cancel(pincode, &cancel)
        .await;
    watcher.abort();

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
