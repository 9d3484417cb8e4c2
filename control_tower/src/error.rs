use thiserror::Error;

use crate::{gate::Gate, runway::Knots, terminal::Terminal};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LandingError {
    #[error("Invalid descent speed: {0} knots")]
    InvalidSpeed(Knots),
    #[error("Landing denied: no gate available at {0}")]
    LandingDenied(Terminal),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("No gate available at {0}")]
    NoGateAvailable(Terminal),
    #[error("Gate {gate} is not occupied at {terminal}")]
    GateNotOccupied { terminal: Terminal, gate: Gate },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayoutError {
    #[error("No gate layout configured for {0}")]
    MissingTerminal(Terminal),
    #[error("Gate {gate} at {terminal} is outside 1..={gates}")]
    GateOutOfRange {
        terminal: Terminal,
        gate: u32,
        gates: u32,
    },
    #[error("Occupied fraction {fraction} for {terminal} is not within 0..=1")]
    InvalidFraction { terminal: Terminal, fraction: f64 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AirlineParseError {
    #[error("Unknown airline: {0:?}")]
    UnknownAirline(String),
}
