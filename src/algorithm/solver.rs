//! Snap projected points onto the grid lattice with minimum total displacement
//!
//! The lattice-to-point squared distances form an `M × N` cost matrix
//! (M cells, N points). Costs are rescaled so the largest is a fixed constant,
//! padded with zero-cost dummy columns up to `M × M`, and solved exactly. A
//! cell matched to a dummy column stays empty.

use crate::algorithm::assignment::solve_square;
use crate::io::configuration::COST_SCALE;
use crate::io::error::{MosaicError, Result, computation_error};
use crate::math::geometry::squared_distance;
use crate::spatial::grid::{Assignment, GridSpec};
use crate::spatial::projection::ProjectedPoint;
use ndarray::Array2;
use tracing::{debug, warn};

/// Optimal one-to-one placement of points on a fixed lattice
#[derive(Debug, Clone, Copy)]
pub struct GridAssignmentSolver {
    grid: GridSpec,
    truncate_surplus: bool,
    cost_scale: f64,
}

impl GridAssignmentSolver {
    /// Solver for the given grid, dropping surplus points by default
    pub const fn new(grid: GridSpec) -> Self {
        Self {
            grid,
            truncate_surplus: true,
            cost_scale: COST_SCALE,
        }
    }

    /// Choose whether surplus points are dropped (`true`) or rejected
    #[must_use]
    pub const fn with_truncation(mut self, truncate_surplus: bool) -> Self {
        self.truncate_surplus = truncate_surplus;
        self
    }

    /// Grid this solver places points on
    pub const fn grid(&self) -> GridSpec {
        self.grid
    }

    /// Raw `cells × points` matrix of squared lattice-to-point distances
    pub fn cost_matrix(&self, points: &[ProjectedPoint]) -> Array2<f64> {
        let lattice = self.grid.lattice();
        Array2::from_shape_fn((lattice.len(), points.len()), |(cell, point)| {
            match (lattice.get(cell), points.get(point)) {
                (Some(site), Some(p)) => squared_distance(*site, p.to_array()),
                _ => 0.0,
            }
        })
    }

    /// Compute the assignment minimizing total squared displacement
    ///
    /// When points outnumber cells the trailing points are dropped (or
    /// rejected, see [`Self::with_truncation`]); dropped points have no cell
    /// in the returned assignment.
    ///
    /// # Errors
    ///
    /// Returns `EmptyInput` for zero points, `SurplusItems` when truncation is
    /// disabled and points outnumber cells, and `AssignmentSolver` for a
    /// degenerate cost matrix
    pub fn solve(&self, points: &[ProjectedPoint]) -> Result<Assignment> {
        if points.is_empty() {
            return Err(MosaicError::EmptyInput);
        }

        let cells = self.grid.cell_count();
        let kept = if points.len() > cells {
            if !self.truncate_surplus {
                return Err(MosaicError::SurplusItems {
                    items: points.len(),
                    cells,
                });
            }
            warn!(
                items = points.len(),
                cells,
                dropped = points.len() - cells,
                "More items than grid cells, dropping surplus"
            );
            points.get(..cells).unwrap_or(points)
        } else {
            points
        };

        let mut cost = self.cost_matrix(kept);
        condition_costs(&mut cost, self.cost_scale)?;
        let square = pad_to_square(&cost);
        debug!(
            rows = square.nrows(),
            points = kept.len(),
            "Solving lattice assignment"
        );

        let col_for_row = solve_square(&square)?;
        let table = col_for_row
            .into_iter()
            .map(|col| (col < kept.len()).then_some(col))
            .collect();

        Assignment::from_cells(self.grid, table, points.len())
    }
}

/// Rescale costs so the largest entry equals `scale`
///
/// The rescale only conditions the numbers; it does not change which
/// matching is optimal. An all-zero matrix is left untouched.
///
/// # Errors
///
/// Returns `AssignmentSolver` if any cost is negative or not finite
pub fn condition_costs(cost: &mut Array2<f64>, scale: f64) -> Result<()> {
    if cost.iter().any(|c| !c.is_finite() || *c < 0.0) {
        return Err(computation_error(&"costs must be finite and non-negative"));
    }
    let max = cost.iter().copied().fold(0.0, f64::max);
    if max > 0.0 {
        let factor = scale / max;
        cost.mapv_inplace(|c| c * factor);
    }
    Ok(())
}

/// Append zero-cost dummy columns until the matrix is square
///
/// A matrix with at least as many columns as rows is returned unchanged.
pub fn pad_to_square(cost: &Array2<f64>) -> Array2<f64> {
    let (rows, cols) = cost.dim();
    if cols >= rows {
        return cost.clone();
    }
    Array2::from_shape_fn((rows, rows), |(row, col)| {
        cost.get([row, col]).copied().unwrap_or(0.0)
    })
}
