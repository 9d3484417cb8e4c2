pub(crate) mod config;
pub(crate) mod error;
pub(crate) mod report;
pub(crate) mod request;

use std::{path::PathBuf, sync::Arc};

use clap::Parser;
use crate::config::{TowerConfig, find_configuration};
use control_tower::{GateAllocator, LandingCoordinator};
use error::ApplicationResult;
use futures::future::join_all;
use report::{LandingOutcome, render_report};
use request::{LandingRequest, read_requests};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[clap(long, short)]
    /// Gate layout file to use instead of the one in the user config directory
    config: Option<PathBuf>,
    #[clap(long)]
    /// Resets the stored config file to the default gate layout
    clean_config: bool,
    #[clap(long, short)]
    /// Landing requests, one `<airline> [<knots>]` per line
    requests: Option<PathBuf>,
    #[clap(long, short)]
    /// Release every granted gate after the report and show the pools again
    depart: bool,
    #[clap(long)]
    /// Log as JSON instead of human readable lines
    json_logs: bool,
}

fn init_logging(json: bool, fallback_filter: Option<&str>) -> ApplicationResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(fallback_filter.unwrap_or("info"))?,
    };
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
    Ok(())
}

async fn land_all(
    coordinator: &LandingCoordinator,
    requests: Vec<LandingRequest>,
) -> ApplicationResult<Vec<LandingOutcome>> {
    // `land` may block on a terminal lock, keep it off the async workers
    let handles = requests.into_iter().map(|request| {
        let coordinator = coordinator.clone();
        tokio::task::spawn_blocking(move || {
            let airline = request.airline();
            let result = coordinator.land(&airline);
            LandingOutcome { airline, result }
        })
    });
    let outcomes = join_all(handles)
        .await
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(outcomes)
}

async fn run(cli: Cli, config: TowerConfig) -> ApplicationResult<()> {
    let allocator = Arc::new(GateAllocator::new(config.layouts())?);
    let coordinator = LandingCoordinator::new(allocator);

    let requests = match &cli.requests {
        Some(path) => read_requests(path)?,
        None => LandingRequest::demo(),
    };
    info!(count = requests.len(), "Dispatching landing requests");

    let outcomes = land_all(&coordinator, requests).await?;
    println!("{}", render_report("Landing report", &outcomes, &coordinator)?);

    let denied = outcomes.iter().filter(|o| o.result.is_err()).count();
    if denied > 0 {
        warn!(denied, "Not every landing was cleared");
    }

    if cli.depart {
        for instructions in outcomes.iter().filter_map(LandingOutcome::instructions) {
            if let Err(e) = coordinator.depart(instructions) {
                warn!(%instructions, "Departure failed: {}", e);
            }
        }
        println!();
        println!("{}", render_report("After departures", &[], &coordinator)?);
    }

    Ok(())
}

fn main() -> ApplicationResult<()> {
    let cli = Cli::parse();
    let (config, config_path) = find_configuration(cli.config.as_deref(), cli.clean_config)?;
    init_logging(cli.json_logs, config.log_filter())?;
    debug!(?config_path, "Loaded configuration");
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli, config))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_land_all_runs_every_request() {
        let coordinator = LandingCoordinator::new(Arc::new(GateAllocator::with_default_layout()));
        let requests = request::parse_requests(include_str!("../demo.requests"));
        let outcomes = land_all(&coordinator, requests).await.unwrap();

        assert_eq!(outcomes.len(), 13);
        // Terminal A has four free gates for five Delta flights
        let delta_cleared = outcomes
            .iter()
            .filter_map(LandingOutcome::instructions)
            .filter(|i| i.terminal == control_tower::Terminal::A)
            .count();
        assert_eq!(delta_cleared, 4);
        assert_eq!(
            outcomes.iter().filter(|o| o.result.is_err()).count(),
            3,
            "one Delta and one international flight are denied, the negative speed is rejected"
        );
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["tower_service", "-r", "demo.requests", "--depart"]);
        assert_eq!(cli.requests, Some(PathBuf::from("demo.requests")));
        assert!(cli.depart);
        assert!(!cli.clean_config);
    }
}
