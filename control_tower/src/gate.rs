use std::{
    collections::BTreeSet,
    fmt,
    sync::{Mutex, MutexGuard, PoisonError},
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    error::{GateError, LayoutError},
    terminal::Terminal,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Gate(pub u32);

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PoolStatus {
    pub occupied: usize,
    pub available: usize,
}

impl PoolStatus {
    pub fn total(&self) -> usize {
        self.occupied + self.available
    }
}

/// Which gates start out occupied: either explicit gate numbers, or a
/// fraction of the terminal that is filled from gate 1 upwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InitialOccupancy {
    Gates(Vec<u32>),
    Fraction(f64),
}

impl Default for InitialOccupancy {
    fn default() -> Self {
        Self::Gates(Vec::new())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalLayout {
    pub gates: u32,
    #[serde(default)]
    pub occupied: InitialOccupancy,
}

impl TerminalLayout {
    pub fn new(gates: u32, occupied: impl IntoIterator<Item = u32>) -> Self {
        Self {
            gates,
            occupied: InitialOccupancy::Gates(occupied.into_iter().collect()),
        }
    }

    pub fn with_fraction(gates: u32, fraction: f64) -> Self {
        Self {
            gates,
            occupied: InitialOccupancy::Fraction(fraction),
        }
    }

    /// The partition the tower opens with when nothing else is configured.
    pub fn default_layouts() -> IndexMap<Terminal, TerminalLayout> {
        IndexMap::from([
            (Terminal::A, Self::new(12, 1..=8)),
            (Terminal::B, Self::new(8, [1])),
            (Terminal::C, Self::new(10, 1..=4)),
            (Terminal::International, Self::new(6, 1..=3)),
            (Terminal::Private, Self::new(3, [1])),
        ])
    }

    fn occupied_gates(&self, terminal: Terminal) -> Result<BTreeSet<Gate>, LayoutError> {
        match &self.occupied {
            InitialOccupancy::Gates(gates) => gates
                .iter()
                .map(|&gate| {
                    if (1..=self.gates).contains(&gate) {
                        Ok(Gate(gate))
                    } else {
                        Err(LayoutError::GateOutOfRange {
                            terminal,
                            gate,
                            gates: self.gates,
                        })
                    }
                })
                .collect(),
            InitialOccupancy::Fraction(fraction) => {
                let fraction = *fraction;
                if !(0.0..=1.0).contains(&fraction) {
                    return Err(LayoutError::InvalidFraction { terminal, fraction });
                }
                let count = (f64::from(self.gates) * fraction).floor() as u32;
                Ok((1..=count).map(Gate).collect())
            }
        }
    }
}

/// One terminal's gates. `available` and `occupied` are disjoint and their
/// union never changes after construction.
#[derive(Debug)]
struct GatePool {
    available: BTreeSet<Gate>,
    occupied: BTreeSet<Gate>,
}

impl GatePool {
    fn new(gates: u32, occupied: BTreeSet<Gate>) -> Self {
        let available = (1..=gates)
            .map(Gate)
            .filter(|gate| !occupied.contains(gate))
            .collect();
        Self {
            available,
            occupied,
        }
    }

    fn from_layout(terminal: Terminal, layout: &TerminalLayout) -> Result<Self, LayoutError> {
        Ok(Self::new(layout.gates, layout.occupied_gates(terminal)?))
    }

    fn acquire(&mut self) -> Option<Gate> {
        let gate = self.available.pop_first()?;
        self.occupied.insert(gate);
        Some(gate)
    }

    fn release(&mut self, gate: Gate) -> bool {
        if self.occupied.remove(&gate) {
            self.available.insert(gate);
            true
        } else {
            false
        }
    }

    fn status(&self) -> PoolStatus {
        PoolStatus {
            occupied: self.occupied.len(),
            available: self.available.len(),
        }
    }
}

/// Hands out gates per terminal. Every terminal has its own lock, so
/// traffic at one terminal never waits on another.
#[derive(Debug)]
pub struct GateAllocator {
    // indexed by `Terminal::index`, one entry per terminal
    pools: Box<[Mutex<GatePool>]>,
}

impl GateAllocator {
    pub fn new(layouts: IndexMap<Terminal, TerminalLayout>) -> Result<Self, LayoutError> {
        let pools = Terminal::ALL
            .iter()
            .map(|&terminal| {
                let layout = layouts
                    .get(&terminal)
                    .ok_or(LayoutError::MissingTerminal(terminal))?;
                let pool = GatePool::from_layout(terminal, layout)?;
                debug!(%terminal, gates = layout.gates, occupied = pool.occupied.len(), "Gate pool ready");
                Ok(Mutex::new(pool))
            })
            .collect::<Result<Vec<_>, LayoutError>>()?;
        Ok(Self {
            pools: pools.into_boxed_slice(),
        })
    }

    pub fn with_default_layout() -> Self {
        let pools = TerminalLayout::default_layouts()
            .iter()
            .map(|(&terminal, layout)| {
                let occupied = layout.occupied_gates(terminal).unwrap_or_default();
                Mutex::new(GatePool::new(layout.gates, occupied))
            })
            .collect::<Vec<_>>();
        Self {
            pools: pools.into_boxed_slice(),
        }
    }

    // Every pool mutation is a single set move, so a panic elsewhere while
    // holding the lock cannot leave the partition half-updated.
    fn pool(&self, terminal: Terminal) -> MutexGuard<'_, GatePool> {
        self.pools[terminal.index()]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes the lowest numbered free gate at `terminal`. Never waits for a
    /// gate to free up.
    pub fn acquire_gate(&self, terminal: Terminal) -> Result<Gate, GateError> {
        let gate = self.pool(terminal).acquire();
        match gate {
            Some(gate) => {
                debug!(%terminal, %gate, "Gate acquired");
                Ok(gate)
            }
            None => {
                debug!(%terminal, "No gate available");
                Err(GateError::NoGateAvailable(terminal))
            }
        }
    }

    pub fn release_gate(&self, terminal: Terminal, gate: Gate) -> Result<(), GateError> {
        let released = self.pool(terminal).release(gate);
        if released {
            debug!(%terminal, %gate, "Gate released");
            Ok(())
        } else {
            warn!(%terminal, %gate, "Release of a gate that is not occupied");
            Err(GateError::GateNotOccupied { terminal, gate })
        }
    }

    pub fn snapshot(&self, terminal: Terminal) -> PoolStatus {
        self.pool(terminal).status()
    }

    pub fn available_gates(&self, terminal: Terminal) -> Vec<Gate> {
        self.pool(terminal).available.iter().copied().collect()
    }

    pub fn occupied_gates(&self, terminal: Terminal) -> Vec<Gate> {
        self.pool(terminal).occupied.iter().copied().collect()
    }
}
