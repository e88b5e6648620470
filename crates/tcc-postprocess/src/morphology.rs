//! Step 2 of the post-processor pipeline: morphological clean-up with a
//! 5x5 elliptical structuring element. Closing runs before opening, in
//! that fixed order, to fill interior gaps before nibbling spurs;
//! reversing this order changes the expected component count.

use tcc_common::Mask;

/// OpenCV's `MORPH_ELLIPSE` approximation at 5x5: full rows at the centre,
/// single-pixel rows at the poles.
const STRUCTURING_ELEMENT: &[(i32, i32)] = &[
    (-2, 0),
    (-1, -2), (-1, -1), (-1, 0), (-1, 1), (-1, 2),
    (0, -2), (0, -1), (0, 0), (0, 1), (0, 2),
    (1, -2), (1, -1), (1, 0), (1, 1), (1, 2),
    (2, 0),
];

fn at(mask: &Mask, row: i32, col: i32) -> bool {
    if row < 0 || col < 0 || row as usize >= mask.height || col as usize >= mask.width {
        return false;
    }
    mask.get(row as usize, col as usize) == Some(1)
}

fn dilate_once(mask: &Mask) -> Mask {
    let mut out = Mask::zeros(mask.width, mask.height);
    for row in 0..mask.height {
        for col in 0..mask.width {
            let hit = STRUCTURING_ELEMENT
                .iter()
                .any(|(dr, dc)| at(mask, row as i32 + dr, col as i32 + dc));
            if hit {
                out.set(row, col, 1);
            }
        }
    }
    out
}

fn erode_once(mask: &Mask) -> Mask {
    let mut out = Mask::zeros(mask.width, mask.height);
    for row in 0..mask.height {
        for col in 0..mask.width {
            let all_hit = STRUCTURING_ELEMENT
                .iter()
                .all(|(dr, dc)| at(mask, row as i32 + dr, col as i32 + dc));
            if all_hit {
                out.set(row, col, 1);
            }
        }
    }
    out
}

fn dilate(mask: &Mask, iterations: usize) -> Mask {
    let mut cur = mask.clone();
    for _ in 0..iterations {
        cur = dilate_once(&cur);
    }
    cur
}

fn erode(mask: &Mask, iterations: usize) -> Mask {
    let mut cur = mask.clone();
    for _ in 0..iterations {
        cur = erode_once(&cur);
    }
    cur
}

fn close(mask: &Mask, iterations: usize) -> Mask {
    erode(&dilate(mask, iterations), iterations)
}

fn open(mask: &Mask, iterations: usize) -> Mask {
    dilate(&erode(mask, iterations), iterations)
}

/// Applies closing (2 iterations) then opening (1 iteration).
pub fn clean(mask: &Mask) -> Mask {
    let closed = close(mask, 2);
    open(&closed, 1)
}
