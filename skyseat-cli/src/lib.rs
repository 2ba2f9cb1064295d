use anyhow::Context;
use serde_json::Value;
use skyseat_core::Allocation;
use skyseat_store::app_config::{Config, OutputConfig};
use skyseat_store::{JsonFileSource, SeatMapService};
use std::sync::Arc;

/// Read the configured bookings, allocate, and return the seat map as JSON.
pub async fn run(config: &Config) -> anyhow::Result<String> {
    let source = JsonFileSource::new(&config.source.bookings_path);
    let service = SeatMapService::new(Arc::new(source));

    let allocation = service
        .refresh()
        .await
        .with_context(|| format!("Failed to allocate from {}", config.source.bookings_path))?;

    let summary = &allocation.summary;
    tracing::info!(
        "{} seated, {} empty, {} families, {} disabled, {} in the exit row",
        summary.seated,
        summary.empty,
        summary.family_members,
        summary.disabled,
        summary.exit_row_occupied
    );
    let report = &allocation.report;
    if report.is_clean() {
        tracing::info!("Every passenger record was seated");
    } else {
        tracing::warn!("{} unseated, {} malformed records dropped", report.unseated.len(), report.dropped);
        for unseated in &report.unseated {
            tracing::warn!("Unseated: {} ({:?})", unseated.name, unseated.reason);
        }
    }

    render(&allocation, &config.output)
}

pub fn render(allocation: &Allocation, output: &OutputConfig) -> anyhow::Result<String> {
    let table = if output.include_empty {
        serde_json::to_value(&allocation.table)?
    } else {
        Value::Array(
            allocation
                .table
                .occupied()
                .map(serde_json::to_value)
                .collect::<Result<_, _>>()?,
        )
    };

    let text = if output.pretty {
        serde_json::to_string_pretty(&table)?
    } else {
        serde_json::to_string(&table)?
    };
    Ok(text)
}
