use crate::detect::BinaryMask;
use crate::foundation::core::Rgb8;
use crate::render::frame::VideoFrame;

/// Weighted "redmean" squared distance between a pixel and the reference color.
///
/// Red and blue are weighted by the mean red level, green by a constant 4.
pub fn redmean_distance(px: Rgb8, reference: Rgb8) -> u32 {
    let rmean = (u32::from(px.r) + u32::from(reference.r)) / 2;
    let dr = i32::from(px.r) - i32::from(reference.r);
    let dg = i32::from(px.g) - i32::from(reference.g);
    let db = i32::from(px.b) - i32::from(reference.b);
    let r2 = (dr * dr) as u32;
    let g2 = (dg * dg) as u32;
    let b2 = (db * db) as u32;
    (((512 + rmean) * r2) >> 8) + 4 * g2 + (((767 - rmean) * b2) >> 8)
}

/// Per-pixel distance rescaled so the closest pixel maps to 0 and the farthest to 255.
///
/// A flat distance field maps to 0 when every pixel is exactly the reference color and to 255
/// otherwise.
pub fn normalized_distance_map(frame: &VideoFrame, reference: Rgb8) -> Vec<u8> {
    let raw: Vec<u32> = frame
        .data
        .chunks_exact(3)
        .map(|p| redmean_distance(Rgb8::new(p[0], p[1], p[2]), reference))
        .collect();

    let Some(&min) = raw.iter().min() else {
        return Vec::new();
    };
    let max = raw.iter().copied().max().unwrap_or(min);
    let range = u64::from(max - min);

    if range == 0 {
        let v = if min == 0 { 0 } else { 255 };
        return vec![v; raw.len()];
    }

    raw.into_iter()
        .map(|d| ((u64::from(d - min) * 255) / range) as u8)
        .collect()
}

/// Pixels whose normalized distance to `reference` is strictly below `threshold`.
pub fn color_mask(frame: &VideoFrame, reference: Rgb8, threshold: u8) -> BinaryMask {
    let data = normalized_distance_map(frame, reference)
        .into_iter()
        .map(|d| if d < threshold { 255 } else { 0 })
        .collect();
    BinaryMask {
        width: frame.width,
        height: frame.height,
        data,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/detect/color_distance.rs"]
mod tests;
