use std::{error::Error, fmt, str::FromStr};

use glam::Vec2;

/// Tile a tower should be placed on, given as `column,row`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct TowerSpot {
    column: u32,
    row: u32,
}

impl TowerSpot {
    /// Centre of the tile, which is where the placement request aims.
    #[must_use]
    pub(crate) fn position(self) -> Vec2 {
        Vec2::new(self.column as f32 + 0.5, self.row as f32 + 0.5)
    }
}

impl fmt::Display for TowerSpot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.column, self.row)
    }
}

impl FromStr for TowerSpot {
    type Err = TowerSpotError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (column, row) = value
            .trim()
            .split_once(',')
            .ok_or_else(|| TowerSpotError::MissingSeparator(value.to_owned()))?;

        let column = column
            .trim()
            .parse::<u32>()
            .map_err(|_| TowerSpotError::InvalidCoordinate(value.to_owned()))?;
        let row = row
            .trim()
            .parse::<u32>()
            .map_err(|_| TowerSpotError::InvalidCoordinate(value.to_owned()))?;

        Ok(Self { column, row })
    }
}

/// Errors raised while parsing a `--tower` argument.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum TowerSpotError {
    /// The value did not contain a comma.
    MissingSeparator(String),
    /// A coordinate was not a non-negative integer.
    InvalidCoordinate(String),
}

impl fmt::Display for TowerSpotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSeparator(value) => {
                write!(f, "expected COLUMN,ROW but found '{value}'")
            }
            Self::InvalidCoordinate(value) => {
                write!(f, "could not parse tile coordinates '{value}'")
            }
        }
    }
}

impl Error for TowerSpotError {}
