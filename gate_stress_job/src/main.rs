use std::{
    fs::File,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
    thread,
};

use clap::Parser;
use control_tower::{
    Airline, AirlineClassification, DomesticAirline, GateAllocator, InternationalAirline,
    LandingCoordinator, LandingError, PoolStatus, Terminal,
};
use futures::future::join_all;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::{error, info};

#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[clap(long, default_value_t = 64)]
    /// Number of concurrent landing tasks
    tasks: usize,
    #[clap(long, default_value_t = 50)]
    /// Land/depart cycles per task
    rounds: usize,
    #[clap(long, default_value = "gate_stress_summary.json")]
    output: PathBuf,
}

#[derive(Debug, Default, Clone, Copy, Serialize)]
struct Tally {
    landings: usize,
    denials: usize,
    rejected: usize,
    departures: usize,
    duplicate_grants: usize,
    total_mismatches: usize,
}

impl Tally {
    fn merge(self, other: Self) -> Self {
        Self {
            landings: self.landings + other.landings,
            denials: self.denials + other.denials,
            rejected: self.rejected + other.rejected,
            departures: self.departures + other.departures,
            duplicate_grants: self.duplicate_grants + other.duplicate_grants,
            total_mismatches: self.total_mismatches + other.total_mismatches,
        }
    }
}

#[derive(Debug, Serialize)]
struct StressSummary {
    tasks: usize,
    rounds: usize,
    #[serde(flatten)]
    tally: Tally,
    initial_status: IndexMap<Terminal, PoolStatus>,
    final_status: IndexMap<Terminal, PoolStatus>,
}

fn airline_for(task: usize, round: usize) -> Airline {
    use AirlineClassification::*;
    let rotation = [
        Domestic(DomesticAirline::Delta),
        Domestic(DomesticAirline::American),
        Domestic(DomesticAirline::Southwest),
        International(InternationalAirline::Lufthansa),
        International(InternationalAirline::Klm),
        International(InternationalAirline::AirFrance),
        Other(format!("Charter {task}")),
    ];
    let classification = rotation[(task + round) % rotation.len()].clone();
    Airline::with_speed(classification, ((task * 7 + round * 13) % 180) as i32)
}

fn check_totals(coordinator: &LandingCoordinator, totals: &[usize], task: usize, tally: &mut Tally) {
    let now = coordinator
        .status()
        .values()
        .map(PoolStatus::total)
        .collect::<Vec<_>>();
    if now != totals {
        error!(?now, ?totals, task, "Gate totals changed");
        tally.total_mismatches += 1;
    }
}

/// Gates currently held by some task. A gate showing up twice means the
/// allocator handed it out twice.
type Ledger = Mutex<IndexSet<(Terminal, u32)>>;

fn fly(coordinator: &LandingCoordinator, ledger: &Ledger, task: usize, rounds: usize) -> Tally {
    let totals = coordinator
        .status()
        .values()
        .map(PoolStatus::total)
        .collect::<Vec<_>>();
    let mut tally = Tally::default();
    for round in 0..rounds {
        match coordinator.land(&airline_for(task, round)) {
            Ok(instructions) => {
                tally.landings += 1;
                let key = (instructions.terminal, instructions.gate.0);
                let fresh = ledger
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(key);
                if !fresh {
                    error!(%instructions, task, "Gate granted twice");
                    tally.duplicate_grants += 1;
                }
                thread::yield_now();
                check_totals(coordinator, &totals, task, &mut tally);
                // Off the ledger before the gate is free for someone else.
                ledger
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .shift_remove(&key);
                if coordinator.depart(&instructions).is_ok() {
                    tally.departures += 1;
                }
            }
            Err(LandingError::LandingDenied(_)) => {
                tally.denials += 1;
                check_totals(coordinator, &totals, task, &mut tally);
            }
            Err(LandingError::InvalidSpeed(speed)) => {
                error!(speed, task, "Rotation produced an invalid speed");
                tally.rejected += 1;
            }
        }
    }
    tally
}

async fn run_stress(tasks: usize, rounds: usize) -> Result<StressSummary, tokio::task::JoinError> {
    let coordinator = LandingCoordinator::new(Arc::new(GateAllocator::with_default_layout()));
    let ledger = Arc::new(Ledger::default());
    let initial_status = coordinator.status();

    let handles = (0..tasks).map(|task| {
        let coordinator = coordinator.clone();
        let ledger = ledger.clone();
        tokio::task::spawn_blocking(move || fly(&coordinator, &ledger, task, rounds))
    });
    let tally = join_all(handles)
        .await
        .into_iter()
        .try_fold(Tally::default(), |acc, t| t.map(|t| acc.merge(t)))?;

    Ok(StressSummary {
        tasks,
        rounds,
        tally,
        initial_status,
        final_status: coordinator.status(),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let summary = run_stress(cli.tasks, cli.rounds).await?;
    info!(
        landings = summary.tally.landings,
        denials = summary.tally.denials,
        duplicate_grants = summary.tally.duplicate_grants,
        total_mismatches = summary.tally.total_mismatches,
        "Stress run finished"
    );
    serde_json::to_writer_pretty(File::create(&cli.output)?, &summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_stress_run_keeps_invariants() {
        let summary = run_stress(16, 40).await.unwrap();
        assert_eq!(summary.tally.duplicate_grants, 0);
        assert_eq!(summary.tally.total_mismatches, 0);
        assert_eq!(summary.tally.rejected, 0);
        assert_eq!(summary.tally.landings + summary.tally.denials, 16 * 40);
        assert_eq!(summary.tally.departures, summary.tally.landings);
        assert_eq!(summary.final_status, summary.initial_status);
    }

    #[test]
    fn test_rotation_speeds_are_valid() {
        for task in 0..32 {
            for round in 0..64 {
                assert!(airline_for(task, round).descent_speed >= 0);
            }
        }
    }

    #[test]
    fn test_summary_json_shape() {
        let summary = StressSummary {
            tasks: 1,
            rounds: 1,
            tally: Tally::default(),
            initial_status: IndexMap::from([(Terminal::A, PoolStatus::default())]),
            final_status: IndexMap::new(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["landings"], 0);
        assert_eq!(json["initial_status"]["A"]["available"], 0);
    }
}
