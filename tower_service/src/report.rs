use askama::Template;
use control_tower::{Airline, LandingCoordinator, LandingError, LandingInstructions, Terminal};
use itertools::Itertools;
use jiff::Zoned;

use crate::error::ApplicationResult;

#[derive(Debug, Clone)]
pub(crate) struct LandingOutcome {
    pub airline: Airline,
    pub result: Result<LandingInstructions, LandingError>,
}

impl LandingOutcome {
    pub fn instructions(&self) -> Option<&LandingInstructions> {
        self.result.as_ref().ok()
    }
}

#[derive(Debug)]
struct LandingRow {
    status: &'static str,
    airline: String,
    outcome: String,
}

#[derive(Debug)]
struct TerminalRow {
    terminal: String,
    occupied: String,
    available: String,
    free_gates: String,
}

#[derive(Template)]
#[template(path = "landing_report.txt")]
struct LandingReportTemplate<'a> {
    title: &'a str,
    generated: &'a str,
    landings: &'a [LandingRow],
    terminals: &'a [TerminalRow],
}

fn landing_rows(outcomes: &[LandingOutcome]) -> Vec<LandingRow> {
    let width = outcomes
        .iter()
        .map(|o| o.airline.to_string().chars().count())
        .max()
        .unwrap_or_default();
    outcomes
        .iter()
        .map(|o| {
            let (status, outcome) = match &o.result {
                Ok(instructions) => ("CLEARED", instructions.to_string()),
                Err(e) => ("DENIED ", e.to_string()),
            };
            LandingRow {
                status,
                airline: format!("{:<width$}", o.airline.to_string()),
                outcome,
            }
        })
        .collect()
}

fn terminal_rows(coordinator: &LandingCoordinator) -> Vec<TerminalRow> {
    let width = Terminal::ALL
        .iter()
        .map(|t| t.to_string().len())
        .max()
        .unwrap_or_default();
    coordinator
        .status()
        .into_iter()
        .map(|(terminal, status)| {
            let free = coordinator.allocator().available_gates(terminal);
            TerminalRow {
                terminal: format!("{:<width$}", terminal.to_string()),
                occupied: format!("{:>3}", status.occupied),
                available: format!("{:>3}", status.available),
                free_gates: if free.is_empty() {
                    "none".to_string()
                } else {
                    free.iter().join(" ")
                },
            }
        })
        .collect()
}

pub(crate) fn render_report(
    title: &str,
    outcomes: &[LandingOutcome],
    coordinator: &LandingCoordinator,
) -> ApplicationResult<String> {
    let generated = Zoned::now().strftime("%Y-%m-%d %H:%M:%S %Z").to_string();
    render_report_at(title, &generated, outcomes, coordinator)
}

fn render_report_at(
    title: &str,
    generated: &str,
    outcomes: &[LandingOutcome],
    coordinator: &LandingCoordinator,
) -> ApplicationResult<String> {
    let landings = landing_rows(outcomes);
    let terminals = terminal_rows(coordinator);
    let tpl = LandingReportTemplate {
        title,
        generated,
        landings: &landings,
        terminals: &terminals,
    };
    Ok(tpl.render()?)
}
