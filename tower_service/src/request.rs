use std::{fs, path::Path, str::FromStr};

use control_tower::{
    Airline, AirlineClassification, DomesticAirline, InternationalAirline, Knots,
};
use nom::{
    Finish, IResult, Parser,
    bytes::complete::take_till1,
    character::complete::{i32, space0, space1},
    combinator::{all_consuming, opt, recognize, verify},
    multi::separated_list1,
    sequence::preceded,
};
use tracing::debug;
use tracing_unwrap::ResultExt;

use crate::error::ApplicationResult;

/// One line of a request batch: `<airline name> [<knots>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LandingRequest {
    pub classification: AirlineClassification,
    pub descent_speed: Option<Knots>,
}

impl LandingRequest {
    pub fn airline(&self) -> Airline {
        match self.descent_speed {
            Some(speed) => Airline::with_speed(self.classification.clone(), speed),
            None => Airline::new(self.classification.clone()),
        }
    }

    /// The two flights the tower has always opened with.
    pub fn demo() -> Vec<Self> {
        vec![
            Self {
                classification: AirlineClassification::Domestic(DomesticAirline::Southwest),
                descent_speed: None,
            },
            Self {
                classification: AirlineClassification::International(
                    InternationalAirline::AirFrance,
                ),
                descent_speed: None,
            },
        ]
    }
}

impl FromStr for LandingRequest {
    type Err = nom::error::Error<String>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, request) = all_consuming(nom_landing_request).parse(s.trim()).finish()?;
        Ok(request)
    }
}

fn nom_airline_word(input: &str) -> IResult<&str, &str> {
    verify(take_till1(char::is_whitespace), |word: &str| {
        word.parse::<Knots>().is_err()
    })
    .parse(input)
}

pub(crate) fn nom_landing_request(input: &str) -> IResult<&str, LandingRequest> {
    (
        recognize(separated_list1(space1, nom_airline_word))
            .map_res(str::parse::<AirlineClassification>),
        opt(preceded(space1, i32)),
        space0,
    )
        .map(|(classification, descent_speed, _)| LandingRequest {
            classification,
            descent_speed,
        })
        .parse(input)
}

pub(crate) fn parse_requests(input: &str) -> Vec<LandingRequest> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(LandingRequest::from_str)
        .filter_map(Result::ok_or_log)
        .collect()
}

pub(crate) fn read_requests(path: &Path) -> ApplicationResult<Vec<LandingRequest>> {
    let raw = fs::read_to_string(path)?;
    let requests = parse_requests(&raw);
    debug!(?path, count = requests.len(), "Read landing requests");
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_only() {
        let request: LandingRequest = "Southwest".parse().unwrap();
        assert_eq!(
            request.classification,
            AirlineClassification::Domestic(DomesticAirline::Southwest)
        );
        assert_eq!(request.descent_speed, None);
        assert_eq!(request.airline().descent_speed, 100);
    }

    #[test]
    fn test_multi_word_name_with_speed() {
        let request: LandingRequest = "Air France   125 ".parse().unwrap();
        assert_eq!(
            request.classification,
            AirlineClassification::International(InternationalAirline::AirFrance)
        );
        assert_eq!(request.descent_speed, Some(125));
    }

    #[test]
    fn test_negative_speed_is_kept_for_the_tower_to_reject() {
        let request: LandingRequest = "Cessna Citation -10".parse().unwrap();
        assert_eq!(
            request.classification,
            AirlineClassification::Other("Cessna Citation".to_string())
        );
        assert_eq!(request.airline().descent_speed, -10);
    }

    #[test]
    fn test_trailing_garbage_fails() {
        assert!("Delta 100 fast".parse::<LandingRequest>().is_err());
        assert!("100".parse::<LandingRequest>().is_err());
        assert!("".parse::<LandingRequest>().is_err());
    }

    #[test]
    fn test_parse_requests_skips_comments_and_bad_lines() {
        let input = "# arrivals\nDelta 88\n\n   \nKLM\n120\nNetJets 60\n";
        let requests = parse_requests(input);
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[0].descent_speed, Some(88));
        assert_eq!(requests[2].classification.terminal(), control_tower::Terminal::Private);
    }

    #[test]
    fn test_demo_requests_file_parses() {
        let requests = parse_requests(include_str!("../demo.requests"));
        assert_eq!(requests.len(), 13);
        assert_eq!(requests[..2], LandingRequest::demo()[..]);
    }
}
