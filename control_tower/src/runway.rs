use std::fmt;

use serde::Serialize;

use crate::error::LandingError;

/// Descent speed in knots.
pub type Knots = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Runway {
    R1,
    R2,
    R3,
    R4,
}

impl Runway {
    pub const ALL: [Runway; 4] = [Runway::R1, Runway::R2, Runway::R3, Runway::R4];

    /// Picks the runway for a descent speed. Anything at or above 141 knots
    /// goes to R4.
    pub fn for_speed(speed: Knots) -> Result<Self, LandingError> {
        match speed {
            ..0 => Err(LandingError::InvalidSpeed(speed)),
            0..91 => Ok(Self::R1),
            91..121 => Ok(Self::R2),
            121..141 => Ok(Self::R3),
            141.. => Ok(Self::R4),
        }
    }

    /// Physical designator painted on the threshold.
    pub const fn designator(self) -> &'static str {
        match self {
            Self::R1 => "22L",
            Self::R2 => "31R",
            Self::R3 => "52J",
            Self::R4 => "19E",
        }
    }
}

impl fmt::Display for Runway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::R1 => "R1",
            Self::R2 => "R2",
            Self::R3 => "R3",
            Self::R4 => "R4",
        };
        write!(f, "{} ({})", name, self.designator())
    }
}

pub fn select_runway(speed: Knots) -> Result<Runway, LandingError> {
    Runway::for_speed(speed)
}
