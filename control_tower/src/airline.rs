use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{error::AirlineParseError, runway::Knots, terminal::Terminal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DomesticAirline {
    Delta,
    American,
    Southwest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InternationalAirline {
    Lufthansa,
    Klm,
    AirFrance,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum AirlineClassification {
    Domestic(DomesticAirline),
    International(InternationalAirline),
    /// Charter, cargo, private operators and anyone else we don't have a
    /// terminal for. They park at the private hangars.
    Other(String),
}

impl AirlineClassification {
    pub fn terminal(&self) -> Terminal {
        match self {
            Self::Domestic(DomesticAirline::Delta) => Terminal::A,
            Self::Domestic(DomesticAirline::American) => Terminal::B,
            Self::Domestic(DomesticAirline::Southwest) => Terminal::C,
            Self::International(_) => Terminal::International,
            Self::Other(_) => Terminal::Private,
        }
    }

    pub fn default_descent_speed(&self) -> Knots {
        match self {
            Self::Domestic(_) => 100,
            Self::International(_) => 130,
            Self::Other(_) => 80,
        }
    }
}

impl FromStr for AirlineClassification {
    type Err = AirlineParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        if name.is_empty() {
            return Err(AirlineParseError::UnknownAirline(s.to_string()));
        }
        let key = name
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        Ok(match key.as_str() {
            "delta" => Self::Domestic(DomesticAirline::Delta),
            "american" => Self::Domestic(DomesticAirline::American),
            "southwest" => Self::Domestic(DomesticAirline::Southwest),
            "lufthansa" => Self::International(InternationalAirline::Lufthansa),
            "klm" => Self::International(InternationalAirline::Klm),
            "airfrance" => Self::International(InternationalAirline::AirFrance),
            _ => Self::Other(name.to_string()),
        })
    }
}

impl fmt::Display for AirlineClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domestic(DomesticAirline::Delta) => f.write_str("Delta"),
            Self::Domestic(DomesticAirline::American) => f.write_str("American"),
            Self::Domestic(DomesticAirline::Southwest) => f.write_str("Southwest"),
            Self::International(InternationalAirline::Lufthansa) => f.write_str("Lufthansa"),
            Self::International(InternationalAirline::Klm) => f.write_str("KLM"),
            Self::International(InternationalAirline::AirFrance) => f.write_str("Air France"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Airline {
    pub classification: AirlineClassification,
    pub descent_speed: Knots,
}

impl Airline {
    /// An airline descending at the usual speed for its classification.
    pub fn new(classification: AirlineClassification) -> Self {
        let descent_speed = classification.default_descent_speed();
        Self {
            classification,
            descent_speed,
        }
    }

    pub fn with_speed(classification: AirlineClassification, descent_speed: Knots) -> Self {
        Self {
            classification,
            descent_speed,
        }
    }

    pub fn terminal(&self) -> Terminal {
        self.classification.terminal()
    }
}

impl fmt::Display for Airline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}kt", self.classification, self.descent_speed)
    }
}
