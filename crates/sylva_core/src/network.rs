//! Wiring of the transport network and its propagation order.
//!
//! Every setter checks its preconditions against the registry: the ids must be
//! live cells of the right variant, a conduit forwards to exactly one target,
//! and conduit chains never loop back on themselves.

use crate::error::{NetworkError, Result};
use crate::registry::CellRegistry;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use sylva_data::{AntennaMode, CellId, CellKind, CellType, ConduitTarget};

fn expect_type(cells: &CellRegistry, id: CellId, expected: CellType) -> Result<()> {
    let found = cells
        .cell_type(id)
        .ok_or(NetworkError::UnknownCell(id))?;
    if found == expected {
        Ok(())
    } else {
        Err(NetworkError::wrong_type(id, expected, found))
    }
}

/// Attaches a leaf or root to the conduit it feeds.
pub fn connect_to_conduit(cells: &mut CellRegistry, producer: CellId, conduit: CellId) -> Result<()> {
    expect_type(cells, conduit, CellType::Conduit)?;
    let cell = cells
        .get_mut(producer)
        .ok_or(NetworkError::UnknownCell(producer))?;
    match &mut cell.kind {
        CellKind::Leaf { conduit: link } | CellKind::Root { conduit: link } => {
            *link = Some(conduit);
            Ok(())
        }
        other => Err(NetworkError::wrong_type(
            producer,
            CellType::Leaf,
            other.cell_type(),
        )),
    }
}

fn set_antenna_mode(
    cells: &mut CellRegistry,
    antenna: CellId,
    conduit: CellId,
    new_mode: AntennaMode,
) -> Result<()> {
    expect_type(cells, conduit, CellType::Conduit)?;
    let cell = cells
        .get_mut(antenna)
        .ok_or(NetworkError::UnknownCell(antenna))?;
    match &mut cell.kind {
        CellKind::Antenna {
            conduit: link,
            mode,
            ..
        } => {
            *link = Some(conduit);
            *mode = new_mode;
            Ok(())
        }
        other => Err(NetworkError::wrong_type(
            antenna,
            CellType::Antenna,
            other.cell_type(),
        )),
    }
}

/// Switches an antenna to energy gathering, re-binding its conduit.
pub fn gather_mode(cells: &mut CellRegistry, antenna: CellId, conduit: CellId) -> Result<()> {
    set_antenna_mode(cells, antenna, conduit, AntennaMode::Gather)
}

/// Switches an antenna to signal handling, re-binding its conduit.
pub fn communicate_mode(cells: &mut CellRegistry, antenna: CellId, conduit: CellId) -> Result<()> {
    set_antenna_mode(cells, antenna, conduit, AntennaMode::Communicate)
}

fn conduit_target(cells: &CellRegistry, conduit: CellId) -> Result<Option<ConduitTarget>> {
    let cell = cells.get(conduit).ok_or(NetworkError::UnknownCell(conduit))?;
    match &cell.kind {
        CellKind::Conduit { target } => Ok(*target),
        other => Err(NetworkError::wrong_type(
            conduit,
            CellType::Conduit,
            other.cell_type(),
        )),
    }
}

fn bind(cells: &mut CellRegistry, conduit: CellId, target: ConduitTarget) -> Result<()> {
    if let Some(CellKind::Conduit { target: slot }) = cells.get_mut(conduit).map(|c| &mut c.kind) {
        *slot = Some(target);
        Ok(())
    } else {
        Err(NetworkError::UnknownCell(conduit))
    }
}

/// Makes `brain` the terminus of `conduit`.
///
/// Refused while the conduit still forwards to a next conduit.
pub fn connect_to_brain(cells: &mut CellRegistry, conduit: CellId, brain: CellId) -> Result<()> {
    expect_type(cells, brain, CellType::Brain)?;
    if let Some(ConduitTarget::Next(existing)) = conduit_target(cells, conduit)? {
        return Err(NetworkError::ConduitAlreadyBound {
            id: conduit,
            existing,
        });
    }
    bind(cells, conduit, ConduitTarget::Brain(brain))
}

/// Chains `conduit` onto `next`.
///
/// Refused while the conduit still forwards to a brain, or if `next`
/// already leads back to `conduit`.
pub fn connect_to_next_conduit(
    cells: &mut CellRegistry,
    conduit: CellId,
    next: CellId,
) -> Result<()> {
    expect_type(cells, next, CellType::Conduit)?;
    if let Some(ConduitTarget::Brain(existing)) = conduit_target(cells, conduit)? {
        return Err(NetworkError::ConduitAlreadyBound {
            id: conduit,
            existing,
        });
    }
    if chain_reaches(cells, next, conduit) {
        return Err(NetworkError::Cycle {
            from: conduit,
            to: next,
        });
    }
    bind(cells, conduit, ConduitTarget::Next(next))
}

/// Clears whatever target the conduit had.
pub fn disconnect_conduit(cells: &mut CellRegistry, conduit: CellId) -> Result<()> {
    conduit_target(cells, conduit)?;
    if let Some(CellKind::Conduit { target }) = cells.get_mut(conduit).map(|c| &mut c.kind) {
        *target = None;
    }
    Ok(())
}

/// Whether following `Next` links from `start` arrives at `goal`.
fn chain_reaches(cells: &CellRegistry, start: CellId, goal: CellId) -> bool {
    let mut current = start;
    for _ in 0..=cells.len() {
        if current == goal {
            return true;
        }
        match conduit_target(cells, current) {
            Ok(Some(ConduitTarget::Next(next))) => current = next,
            _ => return false,
        }
    }
    // Walked further than there are cells: already looping.
    true
}

/// Conduit that delivers straight into `brain`, lowest id first.
#[must_use]
pub fn feeding_conduit(cells: &CellRegistry, brain: CellId) -> Option<CellId> {
    cells.ids().into_iter().find(|&id| {
        matches!(
            cells.get(id).map(|c| c.kind.clone()),
            Some(CellKind::Conduit {
                target: Some(ConduitTarget::Brain(b))
            }) if b == brain
        )
    })
}

/// Live conduits ordered so that every conduit comes before the conduit it
/// forwards to: energy handed downstream is forwarded again in the same pass.
pub fn propagation_order(cells: &CellRegistry) -> Result<Vec<CellId>> {
    let mut graph: DiGraphMap<CellId, ()> = DiGraphMap::new();
    let mut links = Vec::new();
    for id in cells.ids() {
        let Some(cell) = cells.get(id) else { continue };
        if let CellKind::Conduit { target } = &cell.kind {
            graph.add_node(id);
            if let Some(ConduitTarget::Next(next)) = target {
                links.push((id, *next));
            }
        }
    }
    for (from, to) in links {
        if graph.contains_node(to) {
            graph.add_edge(from, to, ());
        }
    }
    toposort(&graph, None).map_err(|cycle| {
        let at = cycle.node_id();
        NetworkError::Cycle { from: at, to: at }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{new_brain, new_cell};
    use sylva_data::{Cell, Genome, Identity, Position};

    fn spawn(cells: &mut CellRegistry, n: u128, cell: Cell) -> CellId {
        cells.spawn(
            Identity {
                id: CellId::from_u128(n),
                parent_id: None,
            },
            cell,
        )
    }

    fn conduit(cells: &mut CellRegistry, n: u128) -> CellId {
        spawn(
            cells,
            n,
            new_cell(
                CellKind::Conduit { target: None },
                Position::new(n as i32, 0),
                0.0,
                Genome::default(),
                0,
            ),
        )
    }

    fn target_of(cells: &CellRegistry, id: CellId) -> Option<ConduitTarget> {
        conduit_target(cells, id).unwrap()
    }

    #[test]
    fn test_conduit_targets_are_exclusive() {
        let mut cells = CellRegistry::new();
        let brain = spawn(&mut cells, 1, new_brain(Position::default(), 10.0, None, 0));
        let a = conduit(&mut cells, 2);
        let b = conduit(&mut cells, 3);

        connect_to_brain(&mut cells, a, brain).unwrap();
        assert_eq!(
            connect_to_next_conduit(&mut cells, a, b),
            Err(NetworkError::ConduitAlreadyBound {
                id: a,
                existing: brain
            })
        );
        assert_eq!(target_of(&cells, a), Some(ConduitTarget::Brain(brain)));

        connect_to_next_conduit(&mut cells, b, a).unwrap();
        assert!(matches!(
            connect_to_brain(&mut cells, b, brain),
            Err(NetworkError::ConduitAlreadyBound { .. })
        ));

        disconnect_conduit(&mut cells, b).unwrap();
        connect_to_brain(&mut cells, b, brain).unwrap();
        assert_eq!(target_of(&cells, b), Some(ConduitTarget::Brain(brain)));
    }

    #[test]
    fn test_cycles_are_refused() {
        let mut cells = CellRegistry::new();
        let a = conduit(&mut cells, 1);
        let b = conduit(&mut cells, 2);
        let c = conduit(&mut cells, 3);
        connect_to_next_conduit(&mut cells, a, b).unwrap();
        connect_to_next_conduit(&mut cells, b, c).unwrap();
        assert_eq!(
            connect_to_next_conduit(&mut cells, c, a),
            Err(NetworkError::Cycle { from: c, to: a })
        );
        assert!(matches!(
            connect_to_next_conduit(&mut cells, a, a),
            Err(NetworkError::Cycle { .. })
        ));
    }

    #[test]
    fn test_wrong_variants_are_refused() {
        let mut cells = CellRegistry::new();
        let brain = spawn(&mut cells, 1, new_brain(Position::default(), 10.0, None, 0));
        let a = conduit(&mut cells, 2);
        assert!(matches!(
            connect_to_conduit(&mut cells, brain, a),
            Err(NetworkError::WrongCellType { .. })
        ));
        assert!(matches!(
            connect_to_next_conduit(&mut cells, a, brain),
            Err(NetworkError::WrongCellType { .. })
        ));
        assert_eq!(
            connect_to_brain(&mut cells, a, CellId::from_u128(99)),
            Err(NetworkError::UnknownCell(CellId::from_u128(99)))
        );
    }

    #[test]
    fn test_antenna_mode_switch_rebinds_conduit() {
        let mut cells = CellRegistry::new();
        let a = conduit(&mut cells, 1);
        let b = conduit(&mut cells, 2);
        let antenna = spawn(
            &mut cells,
            3,
            new_cell(
                CellKind::Antenna {
                    conduit: None,
                    mode: AntennaMode::Gather,
                    radio_frequency: 1.0,
                },
                Position::default(),
                0.0,
                Genome::default(),
                0,
            ),
        );
        communicate_mode(&mut cells, antenna, a).unwrap();
        assert!(matches!(
            cells.get(antenna).unwrap().kind,
            CellKind::Antenna { conduit: Some(c), mode: AntennaMode::Communicate, .. } if c == a
        ));
        gather_mode(&mut cells, antenna, b).unwrap();
        assert!(matches!(
            cells.get(antenna).unwrap().kind,
            CellKind::Antenna { conduit: Some(c), mode: AntennaMode::Gather, .. } if c == b
        ));
    }

    #[test]
    fn test_propagation_order_is_upstream_first() {
        let mut cells = CellRegistry::new();
        let brain = spawn(&mut cells, 1, new_brain(Position::default(), 10.0, None, 0));
        // Ids chosen so that id order is the reverse of flow order.
        let head = conduit(&mut cells, 2);
        let middle = conduit(&mut cells, 3);
        let tail = conduit(&mut cells, 4);
        connect_to_brain(&mut cells, head, brain).unwrap();
        connect_to_next_conduit(&mut cells, middle, head).unwrap();
        connect_to_next_conduit(&mut cells, tail, middle).unwrap();

        let order = propagation_order(&cells).unwrap();
        let pos = |id| order.iter().position(|&x| x == id).unwrap();
        assert_eq!(order.len(), 3);
        assert!(pos(tail) < pos(middle));
        assert!(pos(middle) < pos(head));
        assert_eq!(feeding_conduit(&cells, brain), Some(head));
    }
}
