//! Static direction field traced once from the level's spawn point.

use corridor_defence_core::{CellCoord, Direction, DirectionFieldView, MapError, TileGrid};

use crate::grid::Grid;

/// Per-cell headings that lead from the spawn point to the objective.
///
/// The field is traced with a wall follower: keep the current heading while the
/// next cell is open, otherwise turn counter-clockwise, otherwise turn the other
/// way. Only cells on the corridor receive a heading. Cells outside the grid
/// resolve to the inward `entry` heading when the spawn point lies outside.
#[derive(Clone, Debug)]
pub(crate) struct DirectionField {
    dimensions: TileGrid,
    headings: Vec<Option<Direction>>,
    entry: Option<Direction>,
    objective: CellCoord,
}

impl DirectionField {
    /// Traces the corridor from `spawn` to the grid's objective.
    ///
    /// Every path cell is entered once in a single corridor, so the walk is
    /// given one step per grid cell before the map is declared unreachable.
    pub(crate) fn trace(grid: &Grid, spawn: CellCoord) -> Result<Self, MapError> {
        let dimensions = grid.dimensions();
        let objective = grid.objective();
        let budget = usize::try_from(u64::from(dimensions.columns()) * u64::from(dimensions.rows()))
            .unwrap_or(usize::MAX);

        let (start, mut heading, entry) = if dimensions.contains(spawn) {
            (spawn, nearest_inward_heading(dimensions, spawn), None)
        } else {
            let (start, heading) = entry_from_outside(dimensions, spawn)?;
            (start, heading, Some(heading))
        };

        if !grid.is_open(start) {
            return Err(MapError::SpawnBlocked { cell: start });
        }
        if dimensions.contains(spawn) && spawn == objective {
            return Err(MapError::SpawnOnObjective { cell: spawn });
        }

        let mut headings = vec![None; budget];
        let mut cell = start;
        let mut steps = 0;

        while cell != objective {
            if steps == budget {
                return Err(MapError::Unreachable { budget });
            }

            // Nothing lies behind an in-grid spawn, so its first step may reverse.
            let turned = heading.rotate_counter_clockwise();
            let candidates = [heading, turned, turned.opposite(), heading.opposite()];
            let tried = if steps == 0 && entry.is_none() { 4 } else { 3 };
            let choice = candidates[..tried]
                .iter()
                .copied()
                .find(|candidate| grid.is_open(cell.step(*candidate)))
                .ok_or(MapError::DeadEnd { cell })?;

            if let Some(slot) = dimensions.index(cell).and_then(|index| headings.get_mut(index)) {
                *slot = Some(choice);
            }

            heading = choice;
            cell = cell.step(choice);
            steps += 1;
        }

        Ok(Self {
            dimensions,
            headings,
            entry,
            objective,
        })
    }

    /// Borrows the field as the read-only view consumed by systems.
    pub(crate) fn view(&self) -> DirectionFieldView<'_> {
        DirectionFieldView::new(&self.headings, self.dimensions, self.entry, self.objective)
    }
}

/// Heading pointing into the grid from the boundary closest to `cell`.
///
/// Ties are broken in the order left, right, top, bottom.
fn nearest_inward_heading(dimensions: TileGrid, cell: CellCoord) -> Direction {
    let last_column = i64::from(dimensions.columns()) - 1;
    let last_row = i64::from(dimensions.rows()) - 1;
    let column = i64::from(cell.column());
    let row = i64::from(cell.row());

    let candidates = [
        (column, Direction::East),
        (last_column - column, Direction::West),
        (row, Direction::South),
        (last_row - row, Direction::North),
    ];

    candidates
        .into_iter()
        .min_by_key(|(distance, _)| *distance)
        .map_or(Direction::East, |(_, heading)| heading)
}

/// First in-grid cell reached by walking inward from an outside spawn point.
fn entry_from_outside(
    dimensions: TileGrid,
    spawn: CellCoord,
) -> Result<(CellCoord, Direction), MapError> {
    let columns = i32::try_from(dimensions.columns()).unwrap_or(i32::MAX);
    let rows = i32::try_from(dimensions.rows()).unwrap_or(i32::MAX);
    let column_inside = (0..columns).contains(&spawn.column());
    let row_inside = (0..rows).contains(&spawn.row());
    let unreachable = MapError::SpawnOutsideReach { cell: spawn };

    if row_inside {
        if spawn.column() < 0 {
            return Ok((CellCoord::new(0, spawn.row()), Direction::East));
        }
        return Ok((CellCoord::new(columns - 1, spawn.row()), Direction::West));
    }

    if column_inside {
        if spawn.row() < 0 {
            return Ok((CellCoord::new(spawn.column(), 0), Direction::South));
        }
        return Ok((CellCoord::new(spawn.column(), rows - 1), Direction::North));
    }

    Err(unreachable)
}
