/// Asserts that a cell with the given id is no longer in the registry.
#[macro_export]
macro_rules! assert_cell_dead {
    ($world:expr, $id:expr) => {
        assert!(
            !$world.cells.contains($id),
            "Cell {} should be dead but was found alive",
            $id
        );
    };
}

/// Asserts that a cell is alive and of the given type.
#[macro_export]
macro_rules! assert_cell_type {
    ($world:expr, $id:expr, $cell_type:expr) => {
        assert_eq!(
            $world.cells.cell_type($id),
            Some($cell_type),
            "Cell {} has the wrong type or is gone",
            $id
        );
    };
}
