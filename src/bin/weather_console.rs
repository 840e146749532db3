//! Weather Proxy - interactive console
//!
//! Same lookup pipeline as the server, driven from a prompt on stdin.

use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;

use weather_proxy::cache::{self, CacheStore};
use weather_proxy::console::{execute, Command, HELP};
use weather_proxy::{init_tracing, Config, SweepTask, WeatherService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("weather_proxy=warn");

    let config = Config::from_env().context("invalid configuration")?;
    let cache = cache::shared(CacheStore::new(config.cache_ttl));
    let service = WeatherService::from_config(&config, cache.clone())
        .context("failed to build lookup pipeline")?;
    let sweep = SweepTask::spawn(cache, Duration::from_secs(config.sweep_interval));

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout.write_all(format!("{}\n", HELP).as_bytes()).await?;

    loop {
        stdout.write_all(b"weather> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let outcome = match Command::parse(&line) {
            Ok(command) => execute(&service, command).await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(Some(output)) if output.is_empty() => {}
            Ok(Some(output)) => stdout.write_all(format!("{}\n", output).as_bytes()).await?,
            Ok(None) => break,
            Err(err) => {
                stdout
                    .write_all(format!("error [{}]: {}\n", err.kind(), err).as_bytes())
                    .await?
            }
        }
    }

    sweep.shutdown().await;
    info!("Console closed");
    Ok(())
}
