//! Tests for grid dimensions, lattice coordinates and assignment bookkeeping

#[cfg(test)]
mod tests {
    use mosaicmap::MosaicError;
    use mosaicmap::io::configuration::{CELL_RATIOS, OUTPUT_ASPECT, SOURCE_IMAGE_SIZE};
    use mosaicmap::spatial::{Assignment, CellCoord, GridSpec, ProjectedPoint};

    // Tests zero-sized grids are rejected
    // Verified by allowing a zero height
    #[test]
    fn test_new_rejects_empty() {
        assert!(matches!(
            GridSpec::new(0, 3),
            Err(MosaicError::InvalidGridSpec { width: 0, height: 3 })
        ));
        assert!(GridSpec::new(3, 0).is_err());
        assert_eq!(GridSpec::new(3, 2).unwrap().cell_count(), 6);
    }

    // Tests the number of rows derived from the output aspect
    // Verified by rounding the row count down
    #[test]
    fn test_fitting_aspect() {
        let fit = |columns| {
            GridSpec::fitting_aspect(columns, SOURCE_IMAGE_SIZE, CELL_RATIOS, OUTPUT_ASPECT)
        };
        let grid = fit(14).unwrap();
        assert_eq!((grid.width(), grid.height()), (14, 22));
        assert!(fit(0).is_err());
        assert!(GridSpec::fitting_aspect(4, SOURCE_IMAGE_SIZE, CELL_RATIOS, -1.0).is_err());
    }

    // Tests row-major indexing in both directions
    // Verified by using column-major indices
    #[test]
    fn test_index_round_trip() {
        let grid = GridSpec::new(3, 2).unwrap();
        assert_eq!(grid.index_of(CellCoord::new(2, 1)), Some(5));
        assert_eq!(grid.index_of(CellCoord::new(3, 0)), None);
        assert_eq!(grid.coord_of(4), Some(CellCoord::new(1, 1)));
        assert_eq!(grid.coord_of(6), None);
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(cells.first(), Some(&CellCoord::new(0, 0)));
        assert_eq!(cells.get(1), Some(&CellCoord::new(1, 0)));
        assert_eq!(cells.len(), 6);
    }

    // Tests lattice sites span the unit square, single-cell axes sit at 0
    // Verified by swapping the row and column coordinates
    #[test]
    fn test_lattice_points() {
        let grid = GridSpec::new(3, 2).unwrap();
        assert_eq!(grid.lattice_point(CellCoord::new(0, 0)), [0.0, 0.0]);
        assert_eq!(grid.lattice_point(CellCoord::new(1, 1)), [0.5, 1.0]);
        assert_eq!(grid.lattice_point(CellCoord::new(2, 0)), [1.0, 0.0]);

        let column = GridSpec::new(1, 3).unwrap();
        assert_eq!(column.lattice(), vec![[0.0, 0.0], [0.0, 0.5], [0.0, 1.0]]);
    }

    // Tests the assignment answers lookups in both directions
    // Verified by storing cell indices without the reverse table
    #[test]
    fn test_assignment_lookups() {
        let grid = GridSpec::new(2, 2).unwrap();
        let cells = vec![Some(1), None, None, Some(0)];
        let assignment = Assignment::from_cells(grid, cells, 3).unwrap();

        assert_eq!(assignment.item_at(CellCoord::new(0, 0)), Some(1));
        assert_eq!(assignment.item_at(CellCoord::new(1, 0)), None);
        assert_eq!(assignment.cell_of(0), Some(CellCoord::new(1, 1)));
        assert_eq!(assignment.cell_of(2), None);
        assert_eq!(assignment.filled(), 2);
        assert_eq!(assignment.item_count(), 3);
        assert_eq!(
            assignment.empty_cells(),
            vec![CellCoord::new(1, 0), CellCoord::new(0, 1)]
        );
    }

    // Tests invalid item tables are rejected
    // Verified by removing the duplicate item check
    #[test]
    fn test_assignment_validation() {
        let grid = GridSpec::new(2, 1).unwrap();
        assert!(Assignment::from_cells(grid, vec![Some(0)], 1).is_err());
        assert!(Assignment::from_cells(grid, vec![Some(0), Some(0)], 1).is_err());
        assert!(Assignment::from_cells(grid, vec![Some(0), Some(4)], 2).is_err());
        assert!(Assignment::from_cells(grid, vec![None, None], 0).is_ok());
    }

    // Tests the total cost sums squared displacements of placed items only
    // Verified by counting dropped items at the origin
    #[test]
    fn test_total_cost() {
        let grid = GridSpec::new(2, 1).unwrap();
        let points = [
            ProjectedPoint::new(0.5, 0.0),
            ProjectedPoint::new(1.0, 0.5),
            ProjectedPoint::new(0.3, 0.3),
        ];
        let assignment = Assignment::from_cells(grid, vec![Some(0), Some(1)], 3).unwrap();
        assert!((assignment.total_cost(&points) - 0.5).abs() < 1e-12);
    }
}
