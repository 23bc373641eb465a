//! Sparse occupancy lookup: at most one cell per grid position.

use crate::error::{NetworkError, Result};
use std::collections::HashMap;
use sylva_data::{CellId, Position};

#[derive(Debug, Clone, Default)]
pub struct PlacementGrid {
    width: u32,
    height: u32,
    occupants: HashMap<Position, CellId>,
}

impl PlacementGrid {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            occupants: HashMap::new(),
        }
    }

    #[must_use]
    pub fn in_bounds(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    /// In bounds and unoccupied.
    #[must_use]
    pub fn is_free(&self, position: Position) -> bool {
        self.in_bounds(position) && !self.occupants.contains_key(&position)
    }

    #[must_use]
    pub fn occupant(&self, position: Position) -> Option<CellId> {
        self.occupants.get(&position).copied()
    }

    pub fn place(&mut self, position: Position, id: CellId) -> Result<()> {
        if !self.in_bounds(position) {
            return Err(NetworkError::OutOfBounds(position));
        }
        if self.occupants.contains_key(&position) {
            return Err(NetworkError::Occupied(position));
        }
        self.occupants.insert(position, id);
        Ok(())
    }

    /// Frees `position` if `id` is the one standing there.
    pub fn vacate(&mut self, position: Position, id: CellId) -> bool {
        if self.occupants.get(&position) == Some(&id) {
            self.occupants.remove(&position);
            true
        } else {
            false
        }
    }

    /// Moves `id` from `from` to `to`, refusing occupied or out-of-bounds targets.
    pub fn relocate(&mut self, from: Position, to: Position, id: CellId) -> Result<()> {
        if from == to {
            return Ok(());
        }
        if !self.in_bounds(to) {
            return Err(NetworkError::OutOfBounds(to));
        }
        if self.occupants.contains_key(&to) {
            return Err(NetworkError::Occupied(to));
        }
        self.vacate(from, id);
        self.occupants.insert(to, id);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    pub fn clear(&mut self) {
        self.occupants.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_and_vacate() {
        let mut grid = PlacementGrid::new(4, 4);
        let a = CellId::from_u128(1);
        let b = CellId::from_u128(2);
        let pos = Position::new(1, 2);

        grid.place(pos, a).unwrap();
        assert_eq!(grid.occupant(pos), Some(a));
        assert_eq!(grid.place(pos, b), Err(NetworkError::Occupied(pos)));
        assert!(!grid.vacate(pos, b));
        assert!(grid.vacate(pos, a));
        assert!(grid.is_free(pos));
    }

    #[test]
    fn test_bounds_are_checked() {
        let mut grid = PlacementGrid::new(4, 4);
        let id = CellId::from_u128(1);
        for pos in [Position::new(-1, 0), Position::new(0, 4), Position::new(4, 0)] {
            assert!(!grid.is_free(pos));
            assert_eq!(grid.place(pos, id), Err(NetworkError::OutOfBounds(pos)));
        }
    }

    #[test]
    fn test_relocate_refuses_occupied_target() {
        let mut grid = PlacementGrid::new(4, 4);
        let a = CellId::from_u128(1);
        let b = CellId::from_u128(2);
        grid.place(Position::new(0, 0), a).unwrap();
        grid.place(Position::new(1, 0), b).unwrap();

        assert!(grid
            .relocate(Position::new(0, 0), Position::new(1, 0), a)
            .is_err());
        grid.relocate(Position::new(0, 0), Position::new(2, 0), a)
            .unwrap();
        assert_eq!(grid.occupant(Position::new(2, 0)), Some(a));
        assert!(grid.is_free(Position::new(0, 0)));
    }
}
