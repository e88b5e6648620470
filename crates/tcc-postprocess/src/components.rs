//! Step 3 of the post-processor pipeline: 8-connectivity connected-component
//! labelling over a binary mask.

use tcc_common::Mask;

const NEIGHBOURS_8: &[(i32, i32)] = &[
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 1),
    (1, -1), (1, 0), (1, 1),
];

/// Returns each foreground component as its member `(row, col)` pixels, in
/// discovery order (smallest linear index of any member pixel, ascending),
/// giving a deterministic tie-break for downstream area filtering.
pub fn label_components(mask: &Mask) -> Vec<Vec<(usize, usize)>> {
    let mut visited = vec![false; mask.data.len()];
    let mut components = Vec::new();

    for row in 0..mask.height {
        for col in 0..mask.width {
            let idx = row * mask.width + col;
            if visited[idx] || mask.data[idx] == 0 {
                continue;
            }

            let mut component = Vec::new();
            let mut stack = vec![(row, col)];
            visited[idx] = true;

            while let Some((r, c)) = stack.pop() {
                component.push((r, c));
                for (dr, dc) in NEIGHBOURS_8 {
                    let nr = r as i32 + dr;
                    let nc = c as i32 + dc;
                    if nr < 0 || nc < 0 {
                        continue;
                    }
                    let (nr, nc) = (nr as usize, nc as usize);
                    if nr >= mask.height || nc >= mask.width {
                        continue;
                    }
                    let nidx = nr * mask.width + nc;
                    if !visited[nidx] && mask.data[nidx] == 1 {
                        visited[nidx] = true;
                        stack.push((nr, nc));
                    }
                }
            }

            component.sort_unstable();
            components.push(component);
        }
    }

    components
}
