//! Optimal (minimum-cost) one-to-one assignment via the Hungarian
//! algorithm, used to match clusters to tracks. The assignment is
//! global, not greedy, which is what assignment optimality requires.

const PADDING_COST: f64 = 1e18;

/// Solves minimum-cost assignment over a possibly-rectangular `rows x cols`
/// cost matrix (padded internally to a square). Returns, for each row, the
/// assigned column, or `None` if that row was matched to padding (only
/// possible when `rows != cols`).
pub fn assignment(cost: &[Vec<f64>], rows: usize, cols: usize) -> Vec<Option<usize>> {
    if rows == 0 || cols == 0 {
        return vec![None; rows];
    }

    let n = rows.max(cols);
    let mut padded = vec![vec![PADDING_COST; n]; n];
    for r in 0..rows {
        for c in 0..cols {
            padded[r][c] = cost[r][c];
        }
    }

    let assigned_col_for_row = solve_square(&padded, n);

    (0..rows)
        .map(|r| {
            let c = assigned_col_for_row[r];
            if c < cols {
                Some(c)
            } else {
                None
            }
        })
        .collect()
}

/// Classic O(n^3) Kuhn-Munkres over an `n x n` matrix (1-indexed
/// internally), returning `row -> col` (0-indexed).
fn solve_square(cost: &[Vec<f64>], n: usize) -> Vec<usize> {
    const INF: f64 = f64::MAX / 4.0;

    let mut u = vec![0.0_f64; n + 1];
    let mut v = vec![0.0_f64; n + 1];
    let mut p = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0usize;
        let mut minv = vec![INF; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = INF;
            let mut j1 = 0usize;

            for j in 1..=n {
                if !used[j] {
                    let cur = cost[i0 - 1][j - 1] - u[i0] - v[j];
                    if cur < minv[j] {
                        minv[j] = cur;
                        way[j] = j0;
                    }
                    if minv[j] < delta {
                        delta = minv[j];
                        j1 = j;
                    }
                }
            }

            for j in 0..=n {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }

            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut result = vec![0usize; n];
    for j in 1..=n {
        if p[j] != 0 {
            result[p[j] - 1] = j - 1;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_matrix_picks_minimum_total_cost() {
        let cost = vec![vec![4.0, 1.0], vec![2.0, 3.0]];
        let result = assignment(&cost, 2, 2);
        assert_eq!(result, vec![Some(1), Some(0)]);
    }

    #[test]
    fn more_rows_than_columns_leaves_one_row_unassigned() {
        let cost = vec![vec![1.0], vec![5.0], vec![2.0]];
        let result = assignment(&cost, 3, 1);
        assert_eq!(result.iter().filter(|r| r.is_some()).count(), 1);
        assert_eq!(result[0], Some(0));
    }

    #[test]
    fn empty_matrix_yields_no_assignments() {
        assert_eq!(assignment(&[], 0, 0), Vec::<Option<usize>>::new());
    }

    #[test]
    fn result_is_globally_optimal_not_greedy() {
        // Greedily matching row 0 to its cheapest column (col 0, cost 1)
        // would force row 1 into col 1 at cost 100, total 101. The optimal
        // assignment is row0->col1, row1->col0, total 2+3=5.
        let cost = vec![vec![1.0, 2.0], vec![3.0, 100.0]];
        let result = assignment(&cost, 2, 2);
        let total: f64 = result
            .iter()
            .enumerate()
            .map(|(r, c)| cost[r][c.unwrap()])
            .sum();
        assert_eq!(total, 5.0);
    }
}
