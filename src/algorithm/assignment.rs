//! Exact minimum-cost perfect matching on a square cost matrix
//!
//! Jonker-Volgenant style shortest augmenting path method: rows are added
//! one at a time, and for each new row a Dijkstra-like search over reduced
//! costs finds the cheapest augmenting path to a free column. Dual variables
//! on rows and columns keep reduced costs non-negative between searches.
//!
//! Complexity is O(n³) time and O(n) extra memory beyond the cost matrix.
//! Ties are broken by preferring free columns, then by scan order, which makes
//! the result a pure function of the matrix.

use crate::io::error::{Result, computation_error};
use ndarray::Array2;

const UNASSIGNED: usize = usize::MAX;

/// Solve the linear assignment problem for a square cost matrix
///
/// Returns, for every row, the column it is matched to. The matching
/// minimizes the sum of `cost[[row, col]]` over all rows.
///
/// # Errors
///
/// Returns `AssignmentSolver` if the matrix is not square or contains
/// non-finite costs
// Hot inner loops index dual and path vectors whose lengths are fixed to `n`
#[allow(clippy::indexing_slicing)]
pub fn solve_square(cost: &Array2<f64>) -> Result<Vec<usize>> {
    let (rows, cols) = cost.dim();
    if rows != cols {
        return Err(computation_error(&format!(
            "cost matrix must be square, got {rows}x{cols}"
        )));
    }
    if cost.iter().any(|c| !c.is_finite()) {
        return Err(computation_error(&"cost matrix contains non-finite entries"));
    }

    let n = rows;
    let mut row_dual = vec![0.0_f64; n];
    let mut col_dual = vec![0.0_f64; n];
    let mut col_for_row = vec![UNASSIGNED; n];
    let mut row_for_col = vec![UNASSIGNED; n];

    let mut shortest = vec![f64::INFINITY; n];
    let mut path = vec![UNASSIGNED; n];
    let mut scanned_rows = vec![false; n];
    let mut scanned_cols = vec![false; n];
    let mut remaining: Vec<usize> = Vec::with_capacity(n);

    for current_row in 0..n {
        shortest.fill(f64::INFINITY);
        path.fill(UNASSIGNED);
        scanned_rows.fill(false);
        scanned_cols.fill(false);
        remaining.clear();
        remaining.extend((0..n).rev());

        let mut min_value = 0.0_f64;
        let mut row = current_row;
        let sink = loop {
            scanned_rows[row] = true;

            let mut lowest = f64::INFINITY;
            let mut lowest_at = UNASSIGNED;
            for (position, &col) in remaining.iter().enumerate() {
                let reduced = min_value + cost[[row, col]] - row_dual[row] - col_dual[col];
                if reduced < shortest[col] {
                    path[col] = row;
                    shortest[col] = reduced;
                }
                if shortest[col] < lowest
                    || (shortest[col] == lowest && row_for_col[col] == UNASSIGNED)
                {
                    lowest = shortest[col];
                    lowest_at = position;
                }
            }

            if lowest_at == UNASSIGNED || !lowest.is_finite() {
                return Err(computation_error(&format!(
                    "no augmenting path for row {current_row}"
                )));
            }

            min_value = lowest;
            let col = remaining.swap_remove(lowest_at);
            scanned_cols[col] = true;
            if row_for_col[col] == UNASSIGNED {
                break col;
            }
            row = row_for_col[col];
        };

        row_dual[current_row] += min_value;
        for r in 0..n {
            if scanned_rows[r] && r != current_row {
                row_dual[r] += min_value - shortest[col_for_row[r]];
            }
        }
        for c in 0..n {
            if scanned_cols[c] {
                col_dual[c] -= min_value - shortest[c];
            }
        }

        // Flip matched and unmatched edges along the path back to `current_row`
        let mut col = sink;
        loop {
            let r = path[col];
            row_for_col[col] = r;
            let previous = std::mem::replace(&mut col_for_row[r], col);
            if r == current_row {
                break;
            }
            col = previous;
        }
    }

    Ok(col_for_row)
}

/// Total cost of a row-to-column matching
pub fn matching_cost(cost: &Array2<f64>, col_for_row: &[usize]) -> f64 {
    col_for_row
        .iter()
        .enumerate()
        .filter_map(|(row, &col)| cost.get([row, col]))
        .sum()
}
