//! Density clustering over raster coordinates, grounded on `clustering.py`'s
//! `cluster_clouds`. A uniform grid keyed by `eps`
//! answers neighbourhood queries without an `O(n^2)` scan.

use std::collections::HashMap;

const NOISE: i64 = -1;
const UNASSIGNED: i64 = -2;

fn cell_of(point: (f64, f64), eps: f64) -> (i64, i64) {
    ((point.0 / eps).floor() as i64, (point.1 / eps).floor() as i64)
}

fn region_query(points: &[(f64, f64)], grid: &HashMap<(i64, i64), Vec<usize>>, idx: usize, eps: f64) -> Vec<usize> {
    let (cr, cc) = cell_of(points[idx], eps);
    let mut neighbours = Vec::new();
    for dr in -1..=1 {
        for dc in -1..=1 {
            if let Some(bucket) = grid.get(&(cr + dr, cc + dc)) {
                for &other in bucket {
                    let (y1, x1) = points[idx];
                    let (y2, x2) = points[other];
                    let dist = ((y1 - y2).powi(2) + (x1 - x2).powi(2)).sqrt();
                    if dist <= eps {
                        neighbours.push(other);
                    }
                }
            }
        }
    }
    neighbours
}

/// Returns a label per point: a non-negative cluster id, or `-1` for noise.
pub fn dbscan(points: &[(f64, f64)], eps: f64, min_samples: usize) -> Vec<i64> {
    if points.is_empty() {
        return Vec::new();
    }

    let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
    for (idx, &point) in points.iter().enumerate() {
        grid.entry(cell_of(point, eps)).or_default().push(idx);
    }

    let mut labels = vec![UNASSIGNED; points.len()];
    let mut next_cluster = 0i64;

    for idx in 0..points.len() {
        if labels[idx] != UNASSIGNED {
            continue;
        }

        let neighbours = region_query(points, &grid, idx, eps);
        if neighbours.len() < min_samples {
            labels[idx] = NOISE;
            continue;
        }

        let cluster_id = next_cluster;
        next_cluster += 1;
        labels[idx] = cluster_id;

        let mut seeds = neighbours;
        let mut i = 0;
        while i < seeds.len() {
            let q = seeds[i];
            i += 1;

            if labels[q] == NOISE {
                labels[q] = cluster_id;
            }
            if labels[q] != UNASSIGNED {
                continue;
            }
            labels[q] = cluster_id;

            let q_neighbours = region_query(points, &grid, q, eps);
            if q_neighbours.len() >= min_samples {
                for n in q_neighbours {
                    if !seeds.contains(&n) {
                        seeds.push(n);
                    }
                }
            }
        }
    }

    labels
}
