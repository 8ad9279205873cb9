use crate::command::Command;
use anyhow::Context;
use in_memory_catalog::repository::Repository;
use lazy_static::lazy_static;
use serde::Deserialize;
use shared_kernel::configuration::config;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use use_cases::query_context::QueryContext;
use use_cases::AppImpl;

mod command;

#[derive(Debug, Deserialize)]
struct Settings {
    queries: QuerySettings,
}

#[derive(Debug, Deserialize)]
struct QuerySettings {
    upstream_timeout_ms: u64,
}

lazy_static! {
    static ref SETTINGS: anyhow::Result<Settings> = config::<Settings>();
}

fn upstream_timeout() -> anyhow::Result<Duration> {
    let settings = SETTINGS
        .as_ref()
        .map_err(|err| anyhow::anyhow!("Invalid configuration: {err:#}"))?;
    Ok(Duration::from_millis(settings.queries.upstream_timeout_ms))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared_kernel::tracing::config_telemetry("query_runner")?;
    let command = Command::parse(std::env::args().skip(1))?;
    tracing::info!(?command, "running query");

    let repository = Repository::new().await?;
    let app = AppImpl::new(repository);

    let cancellation = CancellationToken::new();
    tokio::spawn({
        let cancellation = cancellation.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancellation.cancel();
            }
        }
    });
    let ctx = QueryContext::new(upstream_timeout()?).with_cancellation(cancellation);

    let output = command.run(&app, &ctx).await?;
    let output = serde_json::to_string_pretty(&output).context("Failed to render the result")?;
    println!("{output}");
    Ok(())
}
