//! Static tile grid decoded from level codes.

use corridor_defence_core::{CellCoord, MapError, Tile, TileGrid, TileKind};

/// Immutable, validated tile layout of a level.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    dimensions: TileGrid,
    tiles: Vec<Tile>,
    objective: CellCoord,
}

impl Grid {
    /// Decodes row-major tile codes into a grid with exactly one objective.
    pub(crate) fn from_codes(rows: &[Vec<u8>]) -> Result<Self, MapError> {
        let expected = rows.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(MapError::Empty);
        }

        let mut tiles = Vec::with_capacity(expected.saturating_mul(rows.len()));
        let mut objective: Option<CellCoord> = None;

        for (row_index, row) in rows.iter().enumerate() {
            let row_number = to_i32(row_index);
            if row.len() != expected {
                return Err(MapError::Ragged {
                    row: to_u32(row_index),
                    expected: to_u32(expected),
                    found: to_u32(row.len()),
                });
            }

            for (column_index, &code) in row.iter().enumerate() {
                let cell = CellCoord::new(to_i32(column_index), row_number);
                let kind = TileKind::from_code(code).ok_or(MapError::UnknownTile { code, cell })?;

                if kind == TileKind::Objective {
                    if let Some(first) = objective {
                        return Err(MapError::MultipleObjectives {
                            first,
                            second: cell,
                        });
                    }
                    objective = Some(cell);
                }

                tiles.push(Tile::new(cell, kind));
            }
        }

        let objective = objective.ok_or(MapError::MissingObjective)?;

        Ok(Self {
            dimensions: TileGrid::new(to_u32(expected), to_u32(rows.len())),
            tiles,
            objective,
        })
    }

    pub(crate) const fn dimensions(&self) -> TileGrid {
        self.dimensions
    }

    pub(crate) fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub(crate) const fn objective(&self) -> CellCoord {
        self.objective
    }

    /// Behaviour of the tile at `cell`, or `None` outside the grid.
    pub(crate) fn kind(&self, cell: CellCoord) -> Option<TileKind> {
        self.dimensions
            .index(cell)
            .and_then(|index| self.tiles.get(index))
            .map(Tile::kind)
    }

    /// Reports whether an enemy may enter `cell`.
    pub(crate) fn is_open(&self, cell: CellCoord) -> bool {
        matches!(
            self.kind(cell),
            Some(TileKind::Path | TileKind::Objective)
        )
    }
}

fn to_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_codes_in_row_major_order() {
        let grid = Grid::from_codes(&[vec![1, 0], vec![1, 2]]).expect("valid grid");

        assert_eq!(grid.dimensions(), TileGrid::new(2, 2));
        assert_eq!(grid.objective(), CellCoord::new(1, 1));
        assert_eq!(grid.kind(CellCoord::new(1, 0)), Some(TileKind::Wall));
        assert_eq!(grid.tiles()[2].cell(), CellCoord::new(0, 1));
        assert!(grid.is_open(CellCoord::new(0, 1)));
        assert!(!grid.is_open(CellCoord::new(-1, 0)));
    }

    #[test]
    fn rejects_empty_grids() {
        assert_eq!(Grid::from_codes(&[]).unwrap_err(), MapError::Empty);
        assert_eq!(Grid::from_codes(&[Vec::new()]).unwrap_err(), MapError::Empty);
    }

    #[test]
    fn rejects_ragged_rows() {
        let error = Grid::from_codes(&[vec![1, 1, 2], vec![0, 0]]).unwrap_err();
        assert_eq!(
            error,
            MapError::Ragged {
                row: 1,
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn rejects_unknown_codes() {
        let error = Grid::from_codes(&[vec![1, 7, 2]]).unwrap_err();
        assert_eq!(
            error,
            MapError::UnknownTile {
                code: 7,
                cell: CellCoord::new(1, 0),
            }
        );
    }

    #[test]
    fn requires_exactly_one_objective() {
        assert_eq!(
            Grid::from_codes(&[vec![1, 1]]).unwrap_err(),
            MapError::MissingObjective
        );
        assert_eq!(
            Grid::from_codes(&[vec![2, 1, 2]]).unwrap_err(),
            MapError::MultipleObjectives {
                first: CellCoord::new(0, 0),
                second: CellCoord::new(2, 0),
            }
        );
    }
}
