use std::collections::VecDeque;

use crate::detect::BinaryMask;
use crate::foundation::core::GoalBox;

/// Bounding rectangle of one outer blob in a mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlobBounds {
    /// Left column.
    pub x: u32,
    /// Top row.
    pub y: u32,
    /// Width in pixels (inclusive extent).
    pub w: u32,
    /// Height in pixels (inclusive extent).
    pub h: u32,
}

impl BlobBounds {
    /// `w * h`.
    pub fn area(self) -> u64 {
        u64::from(self.w) * u64::from(self.h)
    }

    /// `w / h`, or `0.0` for a zero-height rectangle.
    pub fn aspect_ratio(self) -> f64 {
        if self.h == 0 {
            0.0
        } else {
            f64::from(self.w) / f64::from(self.h)
        }
    }
}

/// Bounding rectangles of the outer blobs in `mask`, in scan order.
///
/// Foreground is 8-connected. A blob sitting entirely inside a hole of another blob is not an
/// outer blob and is skipped.
pub fn outer_blobs(mask: &BinaryMask) -> Vec<BlobBounds> {
    let (w, h) = (mask.width as usize, mask.height as usize);
    if w == 0 || h == 0 {
        return Vec::new();
    }
    let outside = outside_background(mask);

    let mut visited = vec![false; w * h];
    let mut queue = VecDeque::new();
    let mut out = Vec::new();

    for start in 0..w * h {
        if visited[start] || mask.data[start] == 0 {
            continue;
        }
        visited[start] = true;
        queue.push_back(start);

        let (mut min_x, mut min_y) = (usize::MAX, usize::MAX);
        let (mut max_x, mut max_y) = (0usize, 0usize);
        let mut is_outer = false;

        while let Some(idx) = queue.pop_front() {
            let (x, y) = (idx % w, idx / w);
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);

            if x == 0 || y == 0 || x + 1 == w || y + 1 == h {
                is_outer = true;
            }

            for (dx, dy) in NEIGHBORS_8 {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
                    continue;
                }
                let n = ny as usize * w + nx as usize;
                if mask.data[n] == 0 {
                    // Only edge-adjacent background counts as touching the outside.
                    if (dx == 0 || dy == 0) && outside[n] {
                        is_outer = true;
                    }
                    continue;
                }
                if !visited[n] {
                    visited[n] = true;
                    queue.push_back(n);
                }
            }
        }

        if is_outer {
            out.push(BlobBounds {
                x: min_x as u32,
                y: min_y as u32,
                w: (max_x - min_x + 1) as u32,
                h: (max_y - min_y + 1) as u32,
            });
        }
    }

    out
}

/// Pick the largest outer blob passing `area > min_area && aspect > min_aspect`.
///
/// Ties keep the first blob in scan order.
pub fn locate_goal(mask: &BinaryMask, min_area: u64, min_aspect: f64) -> Option<GoalBox> {
    let mut best: Option<BlobBounds> = None;
    for blob in outer_blobs(mask) {
        if blob.area() <= min_area || blob.aspect_ratio() <= min_aspect {
            continue;
        }
        if best.is_none_or(|b| blob.area() > b.area()) {
            best = Some(blob);
        }
    }
    best.map(|b| GoalBox {
        x1: b.x,
        y1: b.y,
        x2: b.x + b.w,
        y2: b.y + b.h,
    })
}

const NEIGHBORS_8: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

// Background pixels 4-connected to the frame border.
fn outside_background(mask: &BinaryMask) -> Vec<bool> {
    let (w, h) = (mask.width as usize, mask.height as usize);
    let mut outside = vec![false; w * h];
    let mut queue = VecDeque::new();

    let seed = |idx: usize, outside: &mut Vec<bool>, queue: &mut VecDeque<usize>| {
        if mask.data[idx] == 0 && !outside[idx] {
            outside[idx] = true;
            queue.push_back(idx);
        }
    };
    for x in 0..w {
        seed(x, &mut outside, &mut queue);
        seed((h - 1) * w + x, &mut outside, &mut queue);
    }
    for y in 0..h {
        seed(y * w, &mut outside, &mut queue);
        seed(y * w + w - 1, &mut outside, &mut queue);
    }

    while let Some(idx) = queue.pop_front() {
        let (x, y) = (idx % w, idx / w);
        let mut visit = |n: usize| {
            if mask.data[n] == 0 && !outside[n] {
                outside[n] = true;
                queue.push_back(n);
            }
        };
        if x > 0 {
            visit(idx - 1);
        }
        if x + 1 < w {
            visit(idx + 1);
        }
        if y > 0 {
            visit(idx - w);
        }
        if y + 1 < h {
            visit(idx + w);
        }
    }

    outside
}

#[cfg(test)]
#[path = "../../tests/unit/detect/locate.rs"]
mod tests;
