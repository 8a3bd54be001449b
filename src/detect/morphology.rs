use crate::detect::BinaryMask;

/// Morphological closing (dilate, then erode) with a `kernel x kernel` square.
///
/// Pixels outside the mask never contribute to dilation and never erode it, so closing does not
/// eat into blobs touching the frame edge. `kernel <= 1` returns the input unchanged.
pub fn close(mask: &BinaryMask, kernel: u32) -> BinaryMask {
    if kernel <= 1 {
        return mask.clone();
    }
    let dilated = dilate(mask, kernel);
    erode(&dilated, kernel)
}

/// Square dilation, separable into a row pass and a column pass.
pub fn dilate(mask: &BinaryMask, kernel: u32) -> BinaryMask {
    filter_separable(mask, kernel, Extremum::Max)
}

/// Square erosion, separable into a row pass and a column pass.
pub fn erode(mask: &BinaryMask, kernel: u32) -> BinaryMask {
    filter_separable(mask, kernel, Extremum::Min)
}

#[derive(Clone, Copy)]
enum Extremum {
    Max,
    Min,
}

fn filter_separable(mask: &BinaryMask, kernel: u32, op: Extremum) -> BinaryMask {
    let (w, h) = (mask.width as usize, mask.height as usize);
    if w == 0 || h == 0 {
        return mask.clone();
    }
    let radius = (kernel / 2) as usize;

    let mut rows = vec![0u8; w * h];
    for y in 0..h {
        let src = &mask.data[y * w..(y + 1) * w];
        let dst = &mut rows[y * w..(y + 1) * w];
        filter_line(src, dst, radius, op);
    }

    let mut out = vec![0u8; w * h];
    let mut col = vec![0u8; h];
    let mut col_out = vec![0u8; h];
    for x in 0..w {
        for y in 0..h {
            col[y] = rows[y * w + x];
        }
        filter_line(&col, &mut col_out, radius, op);
        for y in 0..h {
            out[y * w + x] = col_out[y];
        }
    }

    BinaryMask {
        width: mask.width,
        height: mask.height,
        data: out,
    }
}

// Window is clipped to the line, which gives the "outside never matters" border rule.
fn filter_line(src: &[u8], dst: &mut [u8], radius: usize, op: Extremum) {
    let n = src.len();
    for (i, d) in dst.iter_mut().enumerate() {
        let lo = i.saturating_sub(radius);
        let hi = (i + radius + 1).min(n);
        let window = &src[lo..hi];
        *d = match op {
            Extremum::Max => window.iter().copied().max().unwrap_or(0),
            Extremum::Min => window.iter().copied().min().unwrap_or(0),
        };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/detect/morphology.rs"]
mod tests;
