use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Terminal {
    A,
    B,
    C,
    International,
    Private,
}

impl Terminal {
    pub const ALL: [Terminal; 5] = [
        Terminal::A,
        Terminal::B,
        Terminal::C,
        Terminal::International,
        Terminal::Private,
    ];

    /// Position of the terminal's pool in the allocator.
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::International => 3,
            Self::Private => 4,
        }
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::A => "Terminal A",
            Self::B => "Terminal B",
            Self::C => "Terminal C",
            Self::International => "International Terminal",
            Self::Private => "Private Hangars",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, terminal) in Terminal::ALL.iter().enumerate() {
            assert_eq!(terminal.index(), i);
        }
    }
}
