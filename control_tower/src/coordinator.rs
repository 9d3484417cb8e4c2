use std::{fmt, sync::Arc};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    airline::Airline,
    error::{GateError, LandingError},
    gate::{Gate, GateAllocator, PoolStatus},
    runway::{Runway, select_runway},
    terminal::Terminal,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LandingInstructions {
    pub runway: Runway,
    pub terminal: Terminal,
    pub gate: Gate,
}

impl fmt::Display for LandingInstructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Runway {}, {}, Gate {}",
            self.runway, self.terminal, self.gate
        )
    }
}

/// Turns landing requests into runway and gate assignments.
///
/// The coordinator never retries. A denied landing is returned to the
/// caller, who decides whether to hold, queue or divert. Gates handed out
/// by [`LandingCoordinator::land`] stay occupied until the caller hands
/// them back with [`LandingCoordinator::depart`]; abandoning the
/// instructions leaks the gate.
#[derive(Debug, Clone)]
pub struct LandingCoordinator {
    allocator: Arc<GateAllocator>,
}

impl LandingCoordinator {
    pub fn new(allocator: Arc<GateAllocator>) -> Self {
        Self { allocator }
    }

    pub fn allocator(&self) -> &GateAllocator {
        &self.allocator
    }

    pub fn land(&self, airline: &Airline) -> Result<LandingInstructions, LandingError> {
        let terminal = airline.terminal();
        let runway = select_runway(airline.descent_speed)?;
        let gate = self.allocator.acquire_gate(terminal).map_err(|e| {
            warn!(airline = %airline.classification, %terminal, "Landing denied: {}", e);
            LandingError::LandingDenied(terminal)
        })?;
        let instructions = LandingInstructions {
            runway,
            terminal,
            gate,
        };
        info!(airline = %airline.classification, %instructions, "Landing cleared");
        Ok(instructions)
    }

    /// Frees the gate held by an aircraft that has left.
    pub fn depart(&self, instructions: &LandingInstructions) -> Result<(), GateError> {
        self.allocator
            .release_gate(instructions.terminal, instructions.gate)
    }

    pub fn status(&self) -> IndexMap<Terminal, PoolStatus> {
        Terminal::ALL
            .iter()
            .map(|&terminal| (terminal, self.allocator.snapshot(terminal)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use tracing_test::traced_test;

    use super::*;
    use crate::{
        airline::{AirlineClassification, DomesticAirline, InternationalAirline},
        gate::TerminalLayout,
    };

    fn coordinator() -> LandingCoordinator {
        LandingCoordinator::new(Arc::new(GateAllocator::with_default_layout()))
    }

    fn southwest(speed: i32) -> Airline {
        Airline::with_speed(
            AirlineClassification::Domestic(DomesticAirline::Southwest),
            speed,
        )
    }

    #[test]
    fn test_southwest_lands_at_terminal_c() {
        let tower = coordinator();
        let instructions = tower.land(&southwest(100)).unwrap();
        assert_eq!(
            instructions,
            LandingInstructions {
                runway: Runway::R2,
                terminal: Terminal::C,
                gate: Gate(5),
            }
        );
        assert_eq!(
            tower.allocator().available_gates(Terminal::C),
            (6..=10).map(Gate).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_air_france_default_speed() {
        let tower = coordinator();
        let airline = Airline::new(AirlineClassification::International(
            InternationalAirline::AirFrance,
        ));
        let instructions = tower.land(&airline).unwrap();
        assert_eq!(instructions.runway, Runway::R3);
        assert_eq!(instructions.terminal, Terminal::International);
        assert_eq!(instructions.gate, Gate(4));
    }

    #[test]
    fn test_unknown_operator_goes_to_private_hangars() {
        let tower = coordinator();
        let airline = Airline::with_speed(AirlineClassification::Other("NetJets".into()), 150);
        let instructions = tower.land(&airline).unwrap();
        assert_eq!(instructions.runway, Runway::R4);
        assert_eq!(instructions.terminal, Terminal::Private);
        assert_eq!(instructions.gate, Gate(2));
    }

    #[test]
    fn test_invalid_speed_leaves_pools_untouched() {
        let tower = coordinator();
        let before = tower.status();
        assert_eq!(
            tower.land(&southwest(-5)),
            Err(LandingError::InvalidSpeed(-5))
        );
        assert_eq!(tower.status(), before);
    }

    #[test]
    #[traced_test]
    fn test_denied_when_terminal_full() {
        let tower = coordinator();
        let delta = Airline::new(AirlineClassification::Domestic(DomesticAirline::Delta));
        for _ in 0..4 {
            tower.land(&delta).unwrap();
        }
        let before = tower.status();
        assert_eq!(
            tower.land(&delta),
            Err(LandingError::LandingDenied(Terminal::A))
        );
        assert_eq!(tower.status(), before);
        assert!(logs_contain("Landing denied"));
    }

    #[test]
    fn test_depart_recovers_capacity() {
        let tower = coordinator();
        let first = tower.land(&southwest(100)).unwrap();
        let second = tower.land(&southwest(100)).unwrap();
        assert_eq!(second.gate, Gate(6));

        tower.depart(&first).unwrap();
        assert_eq!(tower.land(&southwest(100)).unwrap().gate, Gate(5));
        assert_eq!(
            tower.depart(&LandingInstructions {
                gate: Gate(7),
                ..first
            }),
            Err(GateError::GateNotOccupied {
                terminal: Terminal::C,
                gate: Gate(7)
            })
        );
    }

    #[test]
    fn test_concurrent_landings_share_coordinator() {
        let mut layouts = TerminalLayout::default_layouts();
        layouts.insert(Terminal::B, TerminalLayout::new(20, []));
        let tower = LandingCoordinator::new(Arc::new(GateAllocator::new(layouts).unwrap()));
        let american = Airline::new(AirlineClassification::Domestic(DomesticAirline::American));

        let results = thread::scope(|s| {
            let handles = (0..30)
                .map(|_| {
                    let tower = tower.clone();
                    let american = &american;
                    s.spawn(move || tower.land(american))
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .collect::<Vec<_>>()
        });

        let mut gates = results
            .iter()
            .filter_map(|r| r.as_ref().ok().map(|i| i.gate))
            .collect::<Vec<_>>();
        gates.sort();
        assert_eq!(gates, (1..=20).map(Gate).collect::<Vec<_>>());
        assert_eq!(
            results
                .iter()
                .filter(|r| **r == Err(LandingError::LandingDenied(Terminal::B)))
                .count(),
            10
        );
    }
}
