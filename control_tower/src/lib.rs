pub mod airline;
pub mod coordinator;
pub mod error;
pub mod gate;
pub mod runway;
pub mod terminal;

pub use airline::{Airline, AirlineClassification, DomesticAirline, InternationalAirline};
pub use coordinator::{LandingCoordinator, LandingInstructions};
pub use error::{AirlineParseError, GateError, LandingError, LayoutError};
pub use gate::{Gate, GateAllocator, InitialOccupancy, PoolStatus, TerminalLayout};
pub use runway::{Knots, Runway, select_runway};
pub use terminal::Terminal;
