//! World-owned storage of every live cell.
//!
//! Cells are ECS entities carrying `(Identity, Cell)`. Other cells refer to
//! them by `CellId` only; the registry is the sole owner of cell lifetime, and
//! despawning a cell is what makes every link to it resolve to nothing.

use crate::cell::CellLogic;
use std::collections::HashMap;
use sylva_data::{Cell, CellId, CellInfo, CellType, Identity};

pub struct CellRegistry {
    ecs: hecs::World,
    index: HashMap<CellId, hecs::Entity>,
}

impl Default for CellRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CellRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            ecs: hecs::World::new(),
            index: HashMap::new(),
        }
    }

    /// Registers a cell. An existing cell with the same id is replaced.
    pub fn spawn(&mut self, identity: Identity, cell: Cell) -> CellId {
        let id = identity.id;
        if let Some(old) = self.index.remove(&id) {
            let _ = self.ecs.despawn(old);
        }
        let handle = self.ecs.spawn((identity, cell));
        self.index.insert(id, handle);
        id
    }

    /// Removes a cell, handing back its final state.
    pub fn despawn(&mut self, id: CellId) -> Option<Cell> {
        let handle = self.index.remove(&id)?;
        let cell = self
            .ecs
            .query_one_mut::<&Cell>(handle)
            .ok()
            .map(|c| c.clone());
        let _ = self.ecs.despawn(handle);
        cell
    }

    #[must_use]
    pub fn contains(&self, id: CellId) -> bool {
        self.index.contains_key(&id)
    }

    #[must_use]
    pub fn get(&self, id: CellId) -> Option<hecs::Ref<'_, Cell>> {
        let handle = *self.index.get(&id)?;
        self.ecs.get::<&Cell>(handle).ok()
    }

    pub fn get_mut(&mut self, id: CellId) -> Option<&mut Cell> {
        let handle = *self.index.get(&id)?;
        self.ecs.query_one_mut::<&mut Cell>(handle).ok()
    }

    /// Owned copy of one cell's state.
    #[must_use]
    pub fn cloned(&self, id: CellId) -> Option<Cell> {
        self.get(id).map(|c| Cell::clone(&c))
    }

    #[must_use]
    pub fn cell_type(&self, id: CellId) -> Option<CellType> {
        self.get(id).map(|c| c.cell_type())
    }

    #[must_use]
    pub fn parent_of(&self, id: CellId) -> Option<CellId> {
        let handle = *self.index.get(&id)?;
        self.ecs
            .get::<&Identity>(handle)
            .ok()
            .and_then(|identity| identity.parent_id)
    }

    /// Live ids in ascending order; this is the stable per-tick visiting order.
    #[must_use]
    pub fn ids(&self) -> Vec<CellId> {
        let mut ids: Vec<CellId> = self.index.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Owned copy of every live cell, sorted by id.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(CellId, Cell)> {
        let mut query = self.ecs.query::<(&Identity, &Cell)>();
        let mut cells: Vec<(CellId, Cell)> = query
            .iter()
            .map(|(_, (identity, cell))| (identity.id, cell.clone()))
            .collect();
        cells.sort_unstable_by_key(|(id, _)| *id);
        cells
    }

    /// Info for every live cell, sorted by id.
    #[must_use]
    pub fn iter_infos(&self) -> Vec<CellInfo> {
        self.snapshot()
            .iter()
            .map(|(id, cell)| cell.info(*id))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn clear(&mut self) {
        self.ecs.clear();
        self.index.clear();
    }
}
